pub mod api;
pub mod cli;
pub mod metrics;
pub mod state;
pub mod web;

pub use cli::Cli;
pub use web::WebServer;
