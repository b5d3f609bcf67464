use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{keep_alive_middleware, metrics_middleware, KeepAlive};
use super::{handlers, movies};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>, keep_alive: KeepAlive) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Catalog
        .route("/movies", get(movies::list_movies))
        .route("/movies/{id}", get(movies::get_movie))
        .route("/movies/{id}/subtitles", get(movies::list_subtitles))
        .route("/catalog/stats", get(movies::get_stats))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(metrics_middleware))
        .layer(axum_middleware::from_fn_with_state(
            keep_alive,
            keep_alive_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
