pub mod handlers;
pub mod middleware;
pub mod movies;
pub mod routes;

pub use middleware::KeepAlive;
pub use routes::create_router;
