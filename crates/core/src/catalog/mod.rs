//! Media catalog - the movies and subtitles found in one ingestion run.
//!
//! The catalog is rebuilt from scratch every run; nothing here needs to
//! survive a restart.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

/// Trait for media catalog storage.
pub trait MediaCatalog: Send + Sync {
    /// Insert one movie record. Group and prepared flags start out false.
    fn insert_movie(&self, movie: &NewMovie) -> Result<Movie, CatalogError>;

    /// Insert one subtitle record.
    fn insert_subtitle(&self, subtitle: &NewSubtitle) -> Result<Subtitle, CatalogError>;

    /// Get a movie by its id.
    fn get_movie(&self, id: i64) -> Result<Movie, CatalogError>;

    /// List movies matching every set field of the filter, in insertion order.
    fn movies(&self, filter: &MovieFilter) -> Result<Vec<Movie>, CatalogError>;

    /// List subtitles matching every set field of the filter, in insertion order.
    fn subtitles(&self, filter: &SubtitleFilter) -> Result<Vec<Subtitle>, CatalogError>;

    /// Directories that hold more than one movie record.
    ///
    /// Keys compare exactly and case-sensitively.
    fn duplicate_directories(&self) -> Result<Vec<DuplicateDirectory>, CatalogError>;

    /// Flag every movie in the directory as part of a group.
    ///
    /// Returns the number of records matched.
    fn mark_group_directory(&self, key: &DirectoryKey) -> Result<usize, CatalogError>;

    /// Get catalog statistics.
    fn stats(&self) -> Result<CatalogStats, CatalogError>;
}
