//! SQLite-backed media catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use super::{
    CatalogError, CatalogStats, DirectoryKey, DuplicateDirectory, MediaCatalog, Movie,
    MovieFilter, NewMovie, NewSubtitle, Subtitle, SubtitleFilter,
};

const MOVIE_COLUMNS: &str = "id, dir_path, dir_name, clean_dir_name, base_name, clean_base_name,
     file_size, mime_type, is_group_dir, is_prepared";

const SUBTITLE_COLUMNS: &str =
    "id, dir_path, dir_name, clean_dir_name, base_name, clean_base_name";

/// SQLite-backed media catalog.
///
/// Text columns use SQLite's default BINARY collation, so directory names
/// and paths compare byte-for-byte.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open the catalog at `path`, creating the tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            -- One row per movie file found during the scan
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                dir_path TEXT NOT NULL,
                dir_name TEXT NOT NULL,
                clean_dir_name TEXT NOT NULL DEFAULT '',
                base_name TEXT NOT NULL,
                clean_base_name TEXT NOT NULL DEFAULT '',
                file_size INTEGER NOT NULL,
                mime_type TEXT NOT NULL,
                is_group_dir INTEGER NOT NULL DEFAULT 0,
                is_prepared INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_movies_dir ON movies(dir_name, dir_path);

            -- One row per subtitle file found during the scan
            CREATE TABLE IF NOT EXISTS subtitles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                dir_path TEXT NOT NULL,
                dir_name TEXT NOT NULL,
                clean_dir_name TEXT NOT NULL DEFAULT '',
                base_name TEXT NOT NULL,
                clean_base_name TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_subtitles_dir ON subtitles(dir_name, dir_path);
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection lock poisoned".to_string()))
    }

    fn row_to_movie(row: &rusqlite::Row) -> rusqlite::Result<Movie> {
        Ok(Movie {
            id: row.get(0)?,
            dir_path: row.get(1)?,
            dir_name: row.get(2)?,
            clean_dir_name: row.get(3)?,
            base_name: row.get(4)?,
            clean_base_name: row.get(5)?,
            size_bytes: row.get::<_, i64>(6)? as u64,
            mime_type: row.get(7)?,
            is_group_dir: row.get(8)?,
            is_prepared: row.get(9)?,
        })
    }

    fn row_to_subtitle(row: &rusqlite::Row) -> rusqlite::Result<Subtitle> {
        Ok(Subtitle {
            id: row.get(0)?,
            dir_path: row.get(1)?,
            dir_name: row.get(2)?,
            clean_dir_name: row.get(3)?,
            base_name: row.get(4)?,
            clean_base_name: row.get(5)?,
        })
    }
}

/// Build a `WHERE` clause from `(column, value)` pairs that are set.
fn where_clause(conditions: Vec<(&str, Option<Value>)>) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    for (column, value) in conditions {
        if let Some(value) = value {
            clauses.push(format!("{} = ?", column));
            values.push(value);
        }
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

impl MediaCatalog for SqliteCatalog {
    fn insert_movie(&self, movie: &NewMovie) -> Result<Movie, CatalogError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO movies (dir_path, dir_name, clean_dir_name, base_name, clean_base_name,
                                 file_size, mime_type, is_group_dir, is_prepared)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0)",
            params![
                &movie.dir_path,
                &movie.dir_name,
                &movie.clean_dir_name,
                &movie.base_name,
                &movie.clean_base_name,
                movie.size_bytes as i64,
                &movie.mime_type,
            ],
        )?;

        Ok(Movie {
            id: conn.last_insert_rowid(),
            dir_path: movie.dir_path.clone(),
            dir_name: movie.dir_name.clone(),
            clean_dir_name: movie.clean_dir_name.clone(),
            base_name: movie.base_name.clone(),
            clean_base_name: movie.clean_base_name.clone(),
            size_bytes: movie.size_bytes,
            mime_type: movie.mime_type.clone(),
            is_group_dir: false,
            is_prepared: false,
        })
    }

    fn insert_subtitle(&self, subtitle: &NewSubtitle) -> Result<Subtitle, CatalogError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO subtitles (dir_path, dir_name, clean_dir_name, base_name, clean_base_name)
             VALUES (?, ?, ?, ?, ?)",
            params![
                &subtitle.dir_path,
                &subtitle.dir_name,
                &subtitle.clean_dir_name,
                &subtitle.base_name,
                &subtitle.clean_base_name,
            ],
        )?;

        Ok(Subtitle {
            id: conn.last_insert_rowid(),
            dir_path: subtitle.dir_path.clone(),
            dir_name: subtitle.dir_name.clone(),
            clean_dir_name: subtitle.clean_dir_name.clone(),
            base_name: subtitle.base_name.clone(),
            clean_base_name: subtitle.clean_base_name.clone(),
        })
    }

    fn get_movie(&self, id: i64) -> Result<Movie, CatalogError> {
        let conn = self.conn()?;

        conn.query_row(
            &format!("SELECT {} FROM movies WHERE id = ?", MOVIE_COLUMNS),
            params![id],
            Self::row_to_movie,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(format!("movie {}", id)),
            _ => CatalogError::Database(e.to_string()),
        })
    }

    fn movies(&self, filter: &MovieFilter) -> Result<Vec<Movie>, CatalogError> {
        let conn = self.conn()?;

        let (where_sql, values) = where_clause(vec![
            ("dir_name", filter.dir_name.clone().map(Value::Text)),
            ("dir_path", filter.dir_path.clone().map(Value::Text)),
            (
                "is_group_dir",
                filter.is_group_dir.map(|b| Value::Integer(b as i64)),
            ),
        ]);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies{} ORDER BY id",
            MOVIE_COLUMNS, where_sql
        ))?;

        let rows = stmt.query_map(params_from_iter(values), Self::row_to_movie)?;

        let mut movies = Vec::new();
        for row in rows {
            movies.push(row?);
        }
        Ok(movies)
    }

    fn subtitles(&self, filter: &SubtitleFilter) -> Result<Vec<Subtitle>, CatalogError> {
        let conn = self.conn()?;

        let (where_sql, values) = where_clause(vec![
            ("dir_name", filter.dir_name.clone().map(Value::Text)),
            ("dir_path", filter.dir_path.clone().map(Value::Text)),
        ]);

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM subtitles{} ORDER BY id",
            SUBTITLE_COLUMNS, where_sql
        ))?;

        let rows = stmt.query_map(params_from_iter(values), Self::row_to_subtitle)?;

        let mut subtitles = Vec::new();
        for row in rows {
            subtitles.push(row?);
        }
        Ok(subtitles)
    }

    fn duplicate_directories(&self) -> Result<Vec<DuplicateDirectory>, CatalogError> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT dir_name, dir_path, COUNT(*) AS count
             FROM movies
             GROUP BY dir_name, dir_path
             HAVING count > 1
             ORDER BY MIN(id)",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(DuplicateDirectory {
                key: DirectoryKey {
                    dir_name: row.get(0)?,
                    dir_path: row.get(1)?,
                },
                count: row.get::<_, i64>(2)? as u64,
            })
        })?;

        let mut groups = Vec::new();
        for row in rows {
            groups.push(row?);
        }
        Ok(groups)
    }

    fn mark_group_directory(&self, key: &DirectoryKey) -> Result<usize, CatalogError> {
        let conn = self.conn()?;

        let rows_affected = conn.execute(
            "UPDATE movies SET is_group_dir = 1 WHERE dir_name = ? AND dir_path = ?",
            params![&key.dir_name, &key.dir_path],
        )?;

        Ok(rows_affected)
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let conn = self.conn()?;

        let total_movies: i64 =
            conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;

        let total_subtitles: i64 =
            conn.query_row("SELECT COUNT(*) FROM subtitles", [], |row| row.get(0))?;

        let grouped_movies: i64 = conn.query_row(
            "SELECT COUNT(*) FROM movies WHERE is_group_dir = 1",
            [],
            |row| row.get(0),
        )?;

        let group_directories: i64 = conn.query_row(
            "SELECT COUNT(*) FROM (SELECT 1 FROM movies WHERE is_group_dir = 1
                                   GROUP BY dir_name, dir_path)",
            [],
            |row| row.get(0),
        )?;

        let total_size_bytes: i64 = conn.query_row(
            "SELECT COALESCE(SUM(file_size), 0) FROM movies",
            [],
            |row| row.get(0),
        )?;

        Ok(CatalogStats {
            total_movies: total_movies as u64,
            total_subtitles: total_subtitles as u64,
            grouped_movies: grouped_movies as u64,
            group_directories: group_directories as u64,
            total_size_bytes: total_size_bytes as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_catalog() -> SqliteCatalog {
        SqliteCatalog::in_memory().unwrap()
    }

    fn new_movie(dir_name: &str, dir_path: &str, base_name: &str) -> NewMovie {
        NewMovie {
            dir_path: dir_path.to_string(),
            dir_name: dir_name.to_string(),
            clean_dir_name: dir_name.to_string(),
            base_name: base_name.to_string(),
            clean_base_name: base_name.to_string(),
            size_bytes: 700 * 1024 * 1024,
            mime_type: "video/x-matroska".to_string(),
        }
    }

    fn new_subtitle(dir_name: &str, dir_path: &str, base_name: &str) -> NewSubtitle {
        NewSubtitle {
            dir_path: dir_path.to_string(),
            dir_name: dir_name.to_string(),
            clean_dir_name: dir_name.to_string(),
            base_name: base_name.to_string(),
            clean_base_name: String::new(),
        }
    }

    #[test]
    fn test_movie_round_trip() {
        let catalog = create_test_catalog();
        let input = NewMovie {
            dir_path: "/movies/Film.2020.1080p.WEB".to_string(),
            dir_name: "Film.2020.1080p.WEB".to_string(),
            clean_dir_name: "Film".to_string(),
            base_name: "Film.2020.1080p.WEB.mkv".to_string(),
            clean_base_name: "Film".to_string(),
            size_bytes: 4_294_967_296 + 17,
            mime_type: "video/x-matroska".to_string(),
        };

        let inserted = catalog.insert_movie(&input).unwrap();
        let stored = catalog.get_movie(inserted.id).unwrap();

        assert_eq!(stored, inserted);
        assert_eq!(stored.dir_path, input.dir_path);
        assert_eq!(stored.dir_name, input.dir_name);
        assert_eq!(stored.clean_dir_name, input.clean_dir_name);
        assert_eq!(stored.base_name, input.base_name);
        assert_eq!(stored.clean_base_name, input.clean_base_name);
        assert_eq!(stored.size_bytes, input.size_bytes);
        assert_eq!(stored.mime_type, input.mime_type);
        assert!(!stored.is_group_dir);
        assert!(!stored.is_prepared);
    }

    #[test]
    fn test_subtitle_round_trip() {
        let catalog = create_test_catalog();
        let input = new_subtitle("Film", "/movies/Film", "Film.srt");

        let inserted = catalog.insert_subtitle(&input).unwrap();
        let stored = catalog.subtitles(&SubtitleFilter::default()).unwrap();

        assert_eq!(stored, vec![inserted]);
        assert_eq!(stored[0].base_name, "Film.srt");
        assert_eq!(stored[0].clean_base_name, "");
    }

    #[test]
    fn test_get_nonexistent_movie() {
        let catalog = create_test_catalog();
        assert!(matches!(
            catalog.get_movie(42),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicates_allowed_at_insert() {
        let catalog = create_test_catalog();
        let movie = new_movie("A", "/m/A", "f.mkv");

        let first = catalog.insert_movie(&movie).unwrap();
        let second = catalog.insert_movie(&movie).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(catalog.movies(&MovieFilter::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_movies_filter_and_order() {
        let catalog = create_test_catalog();
        catalog.insert_movie(&new_movie("A", "/m/A", "f2.mkv")).unwrap();
        catalog.insert_movie(&new_movie("B", "/m/B", "f3.mkv")).unwrap();
        catalog.insert_movie(&new_movie("A", "/m/A", "f1.mkv")).unwrap();

        let key = DirectoryKey {
            dir_name: "A".to_string(),
            dir_path: "/m/A".to_string(),
        };
        let in_a = catalog.movies(&MovieFilter::in_directory(&key)).unwrap();

        let names: Vec<_> = in_a.iter().map(|m| m.base_name.as_str()).collect();
        assert_eq!(names, vec!["f2.mkv", "f1.mkv"]);
    }

    #[test]
    fn test_duplicate_directories_having_more_than_one() {
        let catalog = create_test_catalog();
        catalog.insert_movie(&new_movie("A", "/m/A", "f1.mkv")).unwrap();
        catalog.insert_movie(&new_movie("A", "/m/A", "f2.mkv")).unwrap();
        catalog.insert_movie(&new_movie("B", "/m/B", "f3.mkv")).unwrap();
        // Same name, different path: separate directories.
        catalog.insert_movie(&new_movie("A", "/other/A", "f4.mkv")).unwrap();

        let dups = catalog.duplicate_directories().unwrap();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].key.dir_name, "A");
        assert_eq!(dups[0].key.dir_path, "/m/A");
        assert_eq!(dups[0].count, 2);
    }

    #[test]
    fn test_directory_key_is_case_sensitive() {
        let catalog = create_test_catalog();
        catalog.insert_movie(&new_movie("Show", "/m/Show", "e1.mkv")).unwrap();
        catalog.insert_movie(&new_movie("show", "/m/show", "e2.mkv")).unwrap();

        assert!(catalog.duplicate_directories().unwrap().is_empty());
    }

    #[test]
    fn test_mark_group_directory() {
        let catalog = create_test_catalog();
        catalog.insert_movie(&new_movie("A", "/m/A", "f1.mkv")).unwrap();
        catalog.insert_movie(&new_movie("A", "/m/A", "f2.mkv")).unwrap();
        catalog.insert_movie(&new_movie("B", "/m/B", "f3.mkv")).unwrap();

        let key = DirectoryKey {
            dir_name: "A".to_string(),
            dir_path: "/m/A".to_string(),
        };
        assert_eq!(catalog.mark_group_directory(&key).unwrap(), 2);

        let grouped = catalog
            .movies(&MovieFilter {
                is_group_dir: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(grouped.len(), 2);
        assert!(grouped.iter().all(|m| m.dir_name == "A"));
    }

    #[test]
    fn test_stats() {
        let catalog = create_test_catalog();

        let stats = catalog.stats().unwrap();
        assert_eq!(stats, CatalogStats::default());

        catalog.insert_movie(&new_movie("A", "/m/A", "f1.mkv")).unwrap();
        catalog.insert_movie(&new_movie("A", "/m/A", "f2.mkv")).unwrap();
        catalog.insert_subtitle(&new_subtitle("A", "/m/A", "f1.srt")).unwrap();
        catalog
            .mark_group_directory(&DirectoryKey {
                dir_name: "A".to_string(),
                dir_path: "/m/A".to_string(),
            })
            .unwrap();

        let stats = catalog.stats().unwrap();
        assert_eq!(stats.total_movies, 2);
        assert_eq!(stats.total_subtitles, 1);
        assert_eq!(stats.grouped_movies, 2);
        assert_eq!(stats.group_directories, 1);
        assert_eq!(stats.total_size_bytes, 2 * 700 * 1024 * 1024);
    }

    #[test]
    fn test_file_backed_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("voodio.db");

        let catalog = SqliteCatalog::new(&path).unwrap();
        catalog.insert_movie(&new_movie("A", "/m/A", "f1.mkv")).unwrap();
        drop(catalog);

        let reopened = SqliteCatalog::new(&path).unwrap();
        assert_eq!(reopened.stats().unwrap().total_movies, 1);
    }
}
