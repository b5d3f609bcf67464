//! Types produced by the filesystem classifier.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// What a discovered file was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Movie,
    Subtitle,
}

/// A classified file, grouped by the directory that directly contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Full path of the containing directory.
    pub dir_path: String,
    /// Base name of the containing directory.
    pub dir_name: String,
    /// Base name of the file itself.
    pub file_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub kind: EntryKind,
}

/// Result of one walk over the movie root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub movies: Vec<DirectoryEntry>,
    pub subtitles: Vec<DirectoryEntry>,
    /// Regular files that matched neither extension table.
    pub skipped: usize,
}

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}
