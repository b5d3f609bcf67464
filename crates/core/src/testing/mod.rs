//! Testing utilities and mock implementations for lifecycle tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use voodio_core::testing::{fixtures, MockService};
//!
//! let tree = tempfile::tempdir()?;
//! fixtures::write_files(tree.path(), &["Show.S01/ep1.mkv", "Show.S01/ep2.mkv"]);
//!
//! let service = Arc::new(MockService::new(1818));
//! ```

mod mock_catalog;
mod mock_service;

pub use mock_catalog::FailingCatalog;
pub use mock_service::{MockService, ServiceCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::config::Config;

    /// Create every relative path under `root`, with a few bytes of content.
    pub fn write_files(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, file.as_bytes()).unwrap();
        }
    }

    /// Place an executable stand-in for ffmpeg in `dir`.
    pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
        let path = dir.join("ffmpeg");
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    /// A valid config pointing at `movie_path` and the given ffmpeg.
    pub fn config(movie_path: &Path, ffmpeg: &Path) -> Config {
        let mut config = Config::default();
        config.movie_path = movie_path.to_path_buf();
        config.tmdb.api_key = "test-key".to_string();
        config.ffmpeg.path = ffmpeg.to_path_buf();
        config
    }
}
