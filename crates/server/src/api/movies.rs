//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use voodio_core::{CatalogError, CatalogStats, Movie, MovieFilter, Subtitle, SubtitleFilter};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct MovieQueryParams {
    /// Only movies in (or outside) a group directory.
    #[serde(default)]
    pub group: Option<bool>,
    #[serde(default)]
    pub dir_name: Option<String>,
    #[serde(default)]
    pub dir_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SubtitleListResponse {
    pub subtitles: Vec<Subtitle>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: CatalogError, id: i64) -> ApiError {
    match e {
        CatalogError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Movie not found: {}", id),
            }),
        ),
        e => internal_error(e),
    }
}

fn internal_error(e: CatalogError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/movies
///
/// List movies in insertion order.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MovieQueryParams>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let filter = MovieFilter {
        dir_name: params.dir_name,
        dir_path: params.dir_path,
        is_group_dir: params.group,
    };

    match state.catalog().movies(&filter) {
        Ok(movies) => {
            let total = movies.len();
            Ok(Json(MovieListResponse { movies, total }))
        }
        Err(e) => Err(internal_error(e)),
    }
}

/// GET /api/v1/movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Movie>, ApiError> {
    state
        .catalog()
        .get_movie(id)
        .map(Json)
        .map_err(|e| error_response(e, id))
}

/// GET /api/v1/movies/{id}/subtitles
///
/// Subtitles found in the same directory as the movie.
pub async fn list_subtitles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SubtitleListResponse>, ApiError> {
    let catalog = state.catalog();
    let movie = catalog.get_movie(id).map_err(|e| error_response(e, id))?;
    let key = movie.directory();

    let filter = SubtitleFilter {
        dir_name: Some(key.dir_name),
        dir_path: Some(key.dir_path),
    };

    match catalog.subtitles(&filter) {
        Ok(subtitles) => {
            let total = subtitles.len();
            Ok(Json(SubtitleListResponse { subtitles, total }))
        }
        Err(e) => Err(internal_error(e)),
    }
}

/// GET /api/v1/catalog/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogStats>, ApiError> {
    state.catalog().stats().map(Json).map_err(internal_error)
}
