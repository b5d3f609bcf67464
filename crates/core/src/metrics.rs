//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ingestion (files classified, records written, normalization misses)
//! - Group detection
//! - Shutdown outcomes

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Ingestion Metrics
// =============================================================================

/// Catalog records written, by kind.
pub static RECORDS_INGESTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("voodio_records_ingested_total", "Total catalog records written"),
        &["kind"], // "movie", "subtitle"
    )
    .unwrap()
});

/// Files under the movie root that were neither movies nor subtitles.
pub static FILES_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "voodio_files_skipped_total",
        "Files ignored during the directory scan",
    )
    .unwrap()
});

/// Names for which no clean title could be extracted.
pub static NORMALIZATION_MISSES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "voodio_normalization_misses_total",
        "Names that yielded no clean title",
    )
    .unwrap()
});

// =============================================================================
// Grouping Metrics
// =============================================================================

/// Movie records currently flagged as part of a group directory.
pub static GROUPED_MOVIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "voodio_grouped_movies",
        "Movie records flagged as part of a group directory",
    )
    .unwrap()
});

// =============================================================================
// Lifecycle Metrics
// =============================================================================

/// Shutdowns by outcome.
pub static SHUTDOWNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("voodio_shutdowns_total", "Service shutdowns by outcome"),
        &["outcome"], // "graceful", "deadline_exceeded", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Ingestion
        Box::new(RECORDS_INGESTED.clone()),
        Box::new(FILES_SKIPPED.clone()),
        Box::new(NORMALIZATION_MISSES.clone()),
        // Grouping
        Box::new(GROUPED_MOVIES.clone()),
        // Lifecycle
        Box::new(SHUTDOWNS.clone()),
    ]
}
