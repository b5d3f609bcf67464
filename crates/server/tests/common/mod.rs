//! Common test utilities for in-process API testing.
//!
//! Builds the real router over an in-memory catalog seeded through the
//! same writer and group detector the supervisor uses.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use voodio_core::{
    CatalogWriter, Config, DirectoryEntry, EntryKind, GroupDetector, MediaCatalog,
    ReleaseNameParser, SanitizedConfig, SqliteCatalog,
};
use voodio_server::api::{create_router, KeepAlive};
use voodio_server::state::AppState;

/// Test fixture holding a router and handles into its state.
pub struct TestFixture {
    pub router: Router,
    pub catalog: Arc<SqliteCatalog>,
    pub keep_alive: KeepAlive,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

pub fn entry(dir_name: &str, file_name: &str, kind: EntryKind) -> DirectoryEntry {
    let mime_type = match kind {
        EntryKind::Movie => "video/x-matroska",
        EntryKind::Subtitle => "application/x-subrip",
    };
    DirectoryEntry {
        dir_path: format!("/movies/{}", dir_name),
        dir_name: dir_name.to_string(),
        file_name: file_name.to_string(),
        size_bytes: 1000,
        mime_type: mime_type.to_string(),
        kind,
    }
}

impl TestFixture {
    /// Fixture with a season directory (two episodes) and a single film.
    pub fn new() -> Self {
        Self::with_entries(
            &[
                entry("Show.S01", "ep1.mkv", EntryKind::Movie),
                entry("Show.S01", "ep2.mkv", EntryKind::Movie),
                entry("Film.2020.1080p.WEB", "Film.2020.1080p.WEB.mkv", EntryKind::Movie),
            ],
            &[entry(
                "Film.2020.1080p.WEB",
                "Film.2020.1080p.WEB.srt",
                EntryKind::Subtitle,
            )],
        )
    }

    pub fn with_entries(movies: &[DirectoryEntry], subtitles: &[DirectoryEntry]) -> Self {
        let catalog = Arc::new(SqliteCatalog::in_memory().expect("Failed to open catalog"));
        CatalogWriter::new(catalog.clone(), Arc::new(ReleaseNameParser::new()))
            .ingest(movies, subtitles)
            .expect("ingest failed");
        GroupDetector::new(catalog.clone())
            .detect()
            .expect("group detection failed");

        let mut config = Config::default();
        config.movie_path = PathBuf::from("/movies");
        config.tmdb.api_key = "secret-key".to_string();

        let shared: Arc<dyn MediaCatalog> = catalog.clone();
        let state = Arc::new(AppState::new(SanitizedConfig::from(&config), shared));
        let keep_alive = KeepAlive::default();
        let router = create_router(state, keep_alive.clone());

        Self {
            router,
            catalog,
            keep_alive,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}
