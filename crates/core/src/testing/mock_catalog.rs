//! Catalog double whose inserts fail on demand.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::catalog::{
    CatalogError, CatalogStats, DirectoryKey, DuplicateDirectory, MediaCatalog, Movie,
    MovieFilter, NewMovie, NewSubtitle, SqliteCatalog, Subtitle, SubtitleFilter,
};

/// In-memory catalog that fails the Nth movie or subtitle insert.
///
/// Attempts are counted whether they succeed or not, so tests can assert
/// that ingestion stopped at the failure.
///
/// # Example
///
/// ```rust,ignore
/// use voodio_core::testing::FailingCatalog;
///
/// let catalog = Arc::new(FailingCatalog::new().fail_movie_insert(2));
/// assert!(writer.ingest(&movies, &subtitles).is_err());
/// assert_eq!(catalog.movie_attempts(), 2);
/// ```
pub struct FailingCatalog {
    inner: SqliteCatalog,
    fail_movie_at: Option<usize>,
    fail_subtitle_at: Option<usize>,
    movie_attempts: AtomicUsize,
    subtitle_attempts: AtomicUsize,
}

impl Default for FailingCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FailingCatalog {
    pub fn new() -> Self {
        Self {
            inner: SqliteCatalog::in_memory().unwrap(),
            fail_movie_at: None,
            fail_subtitle_at: None,
            movie_attempts: AtomicUsize::new(0),
            subtitle_attempts: AtomicUsize::new(0),
        }
    }

    /// Fail the `nth` movie insert (1-based).
    pub fn fail_movie_insert(mut self, nth: usize) -> Self {
        self.fail_movie_at = Some(nth);
        self
    }

    /// Fail the `nth` subtitle insert (1-based).
    pub fn fail_subtitle_insert(mut self, nth: usize) -> Self {
        self.fail_subtitle_at = Some(nth);
        self
    }

    pub fn movie_attempts(&self) -> usize {
        self.movie_attempts.load(Ordering::SeqCst)
    }

    pub fn subtitle_attempts(&self) -> usize {
        self.subtitle_attempts.load(Ordering::SeqCst)
    }
}

fn attempt(counter: &AtomicUsize, fail_at: Option<usize>, what: &str) -> Result<(), CatalogError> {
    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
    if fail_at == Some(n) {
        return Err(CatalogError::Database(format!("disk I/O error on {} insert {}", what, n)));
    }
    Ok(())
}

impl MediaCatalog for FailingCatalog {
    fn insert_movie(&self, movie: &NewMovie) -> Result<Movie, CatalogError> {
        attempt(&self.movie_attempts, self.fail_movie_at, "movie")?;
        self.inner.insert_movie(movie)
    }

    fn insert_subtitle(&self, subtitle: &NewSubtitle) -> Result<Subtitle, CatalogError> {
        attempt(&self.subtitle_attempts, self.fail_subtitle_at, "subtitle")?;
        self.inner.insert_subtitle(subtitle)
    }

    fn get_movie(&self, id: i64) -> Result<Movie, CatalogError> {
        self.inner.get_movie(id)
    }

    fn movies(&self, filter: &MovieFilter) -> Result<Vec<Movie>, CatalogError> {
        self.inner.movies(filter)
    }

    fn subtitles(&self, filter: &SubtitleFilter) -> Result<Vec<Subtitle>, CatalogError> {
        self.inner.subtitles(filter)
    }

    fn duplicate_directories(&self) -> Result<Vec<DuplicateDirectory>, CatalogError> {
        self.inner.duplicate_directories()
    }

    fn mark_group_directory(&self, key: &DirectoryKey) -> Result<usize, CatalogError> {
        self.inner.mark_group_directory(key)
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        self.inner.stats()
    }
}
