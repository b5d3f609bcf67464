//! Duplicate-group detection.

use std::sync::Arc;

use tracing::info;

use crate::catalog::{CatalogError, MediaCatalog};
use crate::metrics::GROUPED_MOVIES;

/// Flags movies that share a directory with at least one other movie.
///
/// Subtitles are never considered. Running it again recomputes the same
/// aggregate and sets the same flags.
pub struct GroupDetector {
    catalog: Arc<dyn MediaCatalog>,
}

impl GroupDetector {
    pub fn new(catalog: Arc<dyn MediaCatalog>) -> Self {
        Self { catalog }
    }

    /// Returns the number of movie records flagged.
    pub fn detect(&self) -> Result<usize, CatalogError> {
        let groups = self.catalog.duplicate_directories()?;

        let mut affected = 0;
        for group in &groups {
            affected += self.catalog.mark_group_directory(&group.key)?;
        }

        GROUPED_MOVIES.set(affected as i64);
        info!(
            "Found {} group directories covering {} movies",
            groups.len(),
            affected
        );

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Movie, MovieFilter, NewMovie, NewSubtitle, SqliteCatalog};

    fn insert(catalog: &SqliteCatalog, dir_name: &str, dir_path: &str, file: &str) {
        catalog
            .insert_movie(&NewMovie {
                dir_path: dir_path.to_string(),
                dir_name: dir_name.to_string(),
                clean_dir_name: String::new(),
                base_name: file.to_string(),
                clean_base_name: String::new(),
                size_bytes: 1,
                mime_type: "video/mp4".to_string(),
            })
            .unwrap();
    }

    fn flags(catalog: &SqliteCatalog) -> Vec<(String, bool)> {
        catalog
            .movies(&MovieFilter::default())
            .unwrap()
            .into_iter()
            .map(|m: Movie| (m.base_name, m.is_group_dir))
            .collect()
    }

    #[test]
    fn test_flags_exactly_shared_directories() {
        let catalog = Arc::new(SqliteCatalog::in_memory().unwrap());
        insert(&catalog, "A", "dir1", "f1");
        insert(&catalog, "A", "dir1", "f2");
        insert(&catalog, "B", "dir2", "f3");

        let affected = GroupDetector::new(catalog.clone()).detect().unwrap();
        assert_eq!(affected, 2);
        assert_eq!(
            flags(&catalog),
            vec![
                ("f1".to_string(), true),
                ("f2".to_string(), true),
                ("f3".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_detect_is_idempotent() {
        let catalog = Arc::new(SqliteCatalog::in_memory().unwrap());
        insert(&catalog, "A", "dir1", "f1");
        insert(&catalog, "A", "dir1", "f2");
        insert(&catalog, "B", "dir2", "f3");

        let detector = GroupDetector::new(catalog.clone());
        let first_count = detector.detect().unwrap();
        let first = flags(&catalog);
        let second_count = detector.detect().unwrap();
        let second = flags(&catalog);

        assert_eq!(first, second);
        assert_eq!(first_count, second_count);
    }

    #[test]
    fn test_single_movie_with_subtitles_not_flagged() {
        let catalog = Arc::new(SqliteCatalog::in_memory().unwrap());
        insert(&catalog, "Film", "/m/Film", "Film.mkv");
        for name in ["Film.en.srt", "Film.fr.srt"] {
            catalog
                .insert_subtitle(&NewSubtitle {
                    dir_path: "/m/Film".to_string(),
                    dir_name: "Film".to_string(),
                    clean_dir_name: String::new(),
                    base_name: name.to_string(),
                    clean_base_name: String::new(),
                })
                .unwrap();
        }

        assert_eq!(GroupDetector::new(catalog.clone()).detect().unwrap(), 0);
        assert_eq!(flags(&catalog), vec![("Film.mkv".to_string(), false)]);
    }

    #[test]
    fn test_same_name_different_path_not_grouped() {
        let catalog = Arc::new(SqliteCatalog::in_memory().unwrap());
        insert(&catalog, "Extras", "/m/One/Extras", "a.mkv");
        insert(&catalog, "Extras", "/m/Two/Extras", "b.mkv");

        assert_eq!(GroupDetector::new(catalog.clone()).detect().unwrap(), 0);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Arc::new(SqliteCatalog::in_memory().unwrap());
        assert_eq!(GroupDetector::new(catalog).detect().unwrap(), 0);
    }
}
