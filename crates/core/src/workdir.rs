//! Process-owned working directory.
//!
//! Holds the catalog database for one run. The directory is created fresh
//! on acquisition and removed when the guard is released or dropped, so
//! nothing survives between runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

/// Directory name under the user cache root.
pub const APP_DIR_NAME: &str = "voodioapp";

/// Catalog database file name inside the working directory.
pub const DB_FILE_NAME: &str = "voodio.db";

#[derive(Debug, Error)]
pub enum WorkDirError {
    #[error("No user cache directory available on this platform")]
    NoCacheRoot,

    #[error("Unable to create app dir on {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Unable to remove obsolete database {path}: {source}")]
    RemoveStaleDb { path: PathBuf, source: io::Error },

    #[error("Unable to init db file {path}: {source}")]
    CreateDb { path: PathBuf, source: io::Error },
}

/// Guard over the working directory and its database file.
#[derive(Debug)]
pub struct WorkDir {
    root: PathBuf,
    released: bool,
}

impl WorkDir {
    /// Acquire `<user cache dir>/voodioapp`.
    pub fn in_user_cache() -> Result<Self, WorkDirError> {
        let cache_root = dirs::cache_dir().ok_or(WorkDirError::NoCacheRoot)?;
        Self::acquire(&cache_root)
    }

    /// Acquire `<cache_root>/voodioapp`, creating it if absent and replacing
    /// any database left behind by an earlier run with an empty file.
    pub fn acquire(cache_root: &Path) -> Result<Self, WorkDirError> {
        let root = cache_root.join(APP_DIR_NAME);

        if !root.exists() {
            create_dir(&root).map_err(|source| WorkDirError::CreateDir {
                path: root.clone(),
                source,
            })?;
            info!("Created app dir at {}", root.display());
        }

        // From here on the guard owns the directory, so failures clean up.
        let guard = Self {
            root,
            released: false,
        };

        let db_path = guard.db_path();
        if db_path.exists() {
            info!("Obsolete DB detected, removing...");
            fs::remove_file(&db_path).map_err(|source| WorkDirError::RemoveStaleDb {
                path: db_path.clone(),
                source,
            })?;
        }

        fs::File::create(&db_path).map_err(|source| WorkDirError::CreateDb {
            path: db_path.clone(),
            source,
        })?;
        info!("DB initialized at {}", db_path.display());

        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE_NAME)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Remove the whole directory tree. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        info!("Cleaning up artifacts");
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", self.root.display(), e),
        }
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(unix)]
fn create_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o777).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}
