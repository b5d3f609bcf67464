//! Catalog writer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{CatalogError, MediaCatalog, NewMovie, NewSubtitle};
use crate::metrics::{NORMALIZATION_MISSES, RECORDS_INGESTED};
use crate::scanner::DirectoryEntry;
use crate::title::{normalize, TitleParser};

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub movies: usize,
    pub subtitles: usize,
    /// Names (directory or file) for which no clean title was found.
    pub normalization_misses: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl IngestSummary {
    pub fn total(&self) -> usize {
        self.movies + self.subtitles
    }
}

/// Writes one catalog record per classified entry.
pub struct CatalogWriter {
    catalog: Arc<dyn MediaCatalog>,
    parser: Arc<dyn TitleParser>,
}

impl CatalogWriter {
    pub fn new(catalog: Arc<dyn MediaCatalog>, parser: Arc<dyn TitleParser>) -> Self {
        Self { catalog, parser }
    }

    /// Insert movies then subtitles, in input order.
    ///
    /// Stops at the first failed insert; the caller discards the catalog.
    pub fn ingest(
        &self,
        movies: &[DirectoryEntry],
        subtitles: &[DirectoryEntry],
    ) -> Result<IngestSummary, CatalogError> {
        let started_at = Utc::now();
        let mut misses = 0;

        for entry in movies {
            let (clean_dir_name, clean_base_name) = self.clean_names(entry, &mut misses);
            self.catalog.insert_movie(&NewMovie {
                dir_path: entry.dir_path.clone(),
                dir_name: entry.dir_name.clone(),
                clean_dir_name,
                base_name: entry.file_name.clone(),
                clean_base_name,
                size_bytes: entry.size_bytes,
                mime_type: entry.mime_type.clone(),
            })?;
            RECORDS_INGESTED.with_label_values(&["movie"]).inc();
        }

        for entry in subtitles {
            let (clean_dir_name, clean_base_name) = self.clean_names(entry, &mut misses);
            self.catalog.insert_subtitle(&NewSubtitle {
                dir_path: entry.dir_path.clone(),
                dir_name: entry.dir_name.clone(),
                clean_dir_name,
                base_name: entry.file_name.clone(),
                clean_base_name,
            })?;
            RECORDS_INGESTED.with_label_values(&["subtitle"]).inc();
        }

        let summary = IngestSummary {
            movies: movies.len(),
            subtitles: subtitles.len(),
            normalization_misses: misses,
            started_at,
            finished_at: Utc::now(),
        };

        if misses > 0 {
            info!("{} names had no recognisable title", misses);
        }
        info!(
            "Saved {} records ({} movies, {} subtitles)",
            summary.total(),
            summary.movies,
            summary.subtitles
        );

        Ok(summary)
    }

    fn clean_names(&self, entry: &DirectoryEntry, misses: &mut usize) -> (String, String) {
        let clean_dir_name = self.clean(&entry.dir_name, misses);
        let clean_base_name = self.clean(&entry.file_name, misses);
        (clean_dir_name, clean_base_name)
    }

    fn clean(&self, raw: &str, misses: &mut usize) -> String {
        let title = normalize(self.parser.as_ref(), raw);
        if title.is_empty() {
            debug!("No clean title for '{}'", raw);
            NORMALIZATION_MISSES.inc();
            *misses += 1;
        }
        title
    }
}
