//! Filesystem classifier.
//!
//! Walks the movie root once and sorts every regular file into movies,
//! subtitles or skipped, keyed by the directory that contains it.

mod types;

pub use types::*;

use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::metrics;

/// Movie container extensions with their MIME types.
const MOVIE_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("ts", "video/mp2t"),
    ("m2ts", "video/mp2t"),
    ("3gp", "video/3gpp"),
    ("ogv", "video/ogg"),
];

/// Subtitle extensions with their MIME types.
const SUBTITLE_TYPES: &[(&str, &str)] = &[
    ("srt", "application/x-subrip"),
    ("vtt", "text/vtt"),
    ("ass", "text/x-ssa"),
    ("ssa", "text/x-ssa"),
    ("sub", "text/x-microdvd"),
];

/// Classify a file name by extension, case-insensitively.
pub fn classify(file_name: &str) -> Option<(EntryKind, &'static str)> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();

    let lookup = |table: &[(&str, &'static str)]| {
        table
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, mime)| *mime)
    };

    lookup(MOVIE_TYPES)
        .map(|mime| (EntryKind::Movie, mime))
        .or_else(|| lookup(SUBTITLE_TYPES).map(|mime| (EntryKind::Subtitle, mime)))
}

/// Walk `root` and classify every regular file below it.
///
/// Entries come out in lexicographic order per directory. Any unreadable
/// directory or file aborts the whole scan.
pub fn scan_dir(root: &Path) -> Result<ScanReport, ScanError> {
    let metadata = std::fs::metadata(root).map_err(|source| ScanError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    info!("Scanning movies under {}", root.display());

    let mut report = ScanReport::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some((kind, mime_type)) = classify(&file_name) else {
            debug!("Skipping unrecognized file {}", entry.path().display());
            report.skipped += 1;
            continue;
        };

        let size_bytes = entry.metadata()?.len();

        let parent = entry.path().parent().unwrap_or(root);
        let dir_name = parent
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let dir_entry = DirectoryEntry {
            dir_path: parent.to_string_lossy().into_owned(),
            dir_name,
            file_name,
            size_bytes,
            mime_type: mime_type.to_string(),
            kind,
        };

        match kind {
            EntryKind::Movie => report.movies.push(dir_entry),
            EntryKind::Subtitle => report.subtitles.push(dir_entry),
        }
    }

    metrics::FILES_SKIPPED.inc_by(report.skipped as u64);

    info!(
        "Scanning movies finished: {} movies, {} subtitles, {} skipped",
        report.movies.len(),
        report.subtitles.len(),
        report.skipped
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, bytes: usize) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; bytes]).unwrap();
    }

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(
            classify("Film.2020.mkv"),
            Some((EntryKind::Movie, "video/x-matroska"))
        );
        assert_eq!(
            classify("FILM.MP4"),
            Some((EntryKind::Movie, "video/mp4"))
        );
        assert_eq!(
            classify("Film.en.srt"),
            Some((EntryKind::Subtitle, "application/x-subrip"))
        );
        assert_eq!(classify("poster.jpg"), None);
        assert_eq!(classify("README"), None);
    }

    #[test]
    fn test_scan_splits_movies_and_subtitles() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Film.2020.1080p.WEB/Film.2020.1080p.WEB.mkv", 42);
        touch(dir.path(), "Film.2020.1080p.WEB/Film.2020.1080p.WEB.srt", 3);
        touch(dir.path(), "Film.2020.1080p.WEB/cover.jpg", 3);
        touch(dir.path(), "Show.S01/ep1.mkv", 1);
        touch(dir.path(), "Show.S01/ep2.mkv", 1);
        touch(dir.path(), "notes.txt", 1);

        let report = scan_dir(dir.path()).unwrap();

        let movies: HashSet<_> = report.movies.iter().map(|e| e.file_name.as_str()).collect();
        let subs: HashSet<_> = report
            .subtitles
            .iter()
            .map(|e| e.file_name.as_str())
            .collect();

        assert_eq!(
            movies,
            HashSet::from(["Film.2020.1080p.WEB.mkv", "ep1.mkv", "ep2.mkv"])
        );
        assert_eq!(subs, HashSet::from(["Film.2020.1080p.WEB.srt"]));
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_scan_records_directory_provenance() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Film.2020/Film.2020.mkv", 1234);

        let report = scan_dir(dir.path()).unwrap();
        let movie = &report.movies[0];

        assert_eq!(movie.dir_name, "Film.2020");
        assert_eq!(
            movie.dir_path,
            dir.path().join("Film.2020").to_string_lossy()
        );
        assert_eq!(movie.size_bytes, 1234);
        assert_eq!(movie.mime_type, "video/x-matroska");
        assert_eq!(movie.kind, EntryKind::Movie);
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["c.mkv", "a.mkv", "b.mkv"] {
            touch(dir.path(), &format!("Series/{}", name), 1);
        }

        let first = scan_dir(dir.path()).unwrap();
        let second = scan_dir(dir.path()).unwrap();

        let names: Vec<_> = first.movies.iter().map(|e| e.file_name.clone()).collect();
        assert_eq!(names, vec!["a.mkv", "b.mkv", "c.mkv"]);
        assert_eq!(first.movies, second.movies);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let result = scan_dir(Path::new("/nonexistent/movies/root"));
        assert!(matches!(result, Err(ScanError::Io { .. })));
    }

    #[test]
    fn test_scan_file_root_fails() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "movie.mkv", 1);

        let result = scan_dir(&dir.path().join("movie.mkv"));
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_aborts_scan() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Open/a.mkv", 1);
        touch(dir.path(), "Locked/b.mkv", 1);
        let locked = dir.path().join("Locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits, nothing to assert there.
        let readable = fs::read_dir(&locked).is_ok();
        let result = scan_dir(dir.path());

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            assert!(matches!(result, Err(ScanError::Walk(_))));
        }
    }
}
