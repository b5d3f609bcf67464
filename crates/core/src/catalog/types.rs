//! Types for the media catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A movie file ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovie {
    pub dir_path: String,
    pub dir_name: String,
    /// Normalized title of `dir_name`, empty when none was found.
    pub clean_dir_name: String,
    pub base_name: String,
    /// Normalized title of `base_name`, empty when none was found.
    pub clean_base_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

/// A stored movie record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub dir_path: String,
    pub dir_name: String,
    pub clean_dir_name: String,
    pub base_name: String,
    pub clean_base_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    /// Set when the directory holds two or more movies (series, box set).
    pub is_group_dir: bool,
    /// Reserved for transcoding status.
    pub is_prepared: bool,
}

impl Movie {
    pub fn directory(&self) -> DirectoryKey {
        DirectoryKey {
            dir_name: self.dir_name.clone(),
            dir_path: self.dir_path.clone(),
        }
    }
}

/// A subtitle file ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubtitle {
    pub dir_path: String,
    pub dir_name: String,
    pub clean_dir_name: String,
    pub base_name: String,
    pub clean_base_name: String,
}

/// A stored subtitle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    pub id: i64,
    pub dir_path: String,
    pub dir_name: String,
    pub clean_dir_name: String,
    pub base_name: String,
    pub clean_base_name: String,
}

/// Identifies the directory a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectoryKey {
    pub dir_name: String,
    pub dir_path: String,
}

/// A directory with more than one movie record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateDirectory {
    #[serde(flatten)]
    pub key: DirectoryKey,
    pub count: u64,
}

/// Movie query; unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieFilter {
    #[serde(default)]
    pub dir_name: Option<String>,
    #[serde(default)]
    pub dir_path: Option<String>,
    #[serde(default)]
    pub is_group_dir: Option<bool>,
}

impl MovieFilter {
    pub fn in_directory(key: &DirectoryKey) -> Self {
        Self {
            dir_name: Some(key.dir_name.clone()),
            dir_path: Some(key.dir_path.clone()),
            is_group_dir: None,
        }
    }
}

/// Subtitle query; unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubtitleFilter {
    #[serde(default)]
    pub dir_name: Option<String>,
    #[serde(default)]
    pub dir_path: Option<String>,
}

/// Catalog statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_movies: u64,
    pub total_subtitles: u64,
    pub grouped_movies: u64,
    pub group_directories: u64,
    pub total_size_bytes: u64,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}
