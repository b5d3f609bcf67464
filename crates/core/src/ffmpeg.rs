//! Transcoder binary discovery.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FfmpegError {
    /// No executable found for the configured name or path.
    #[error("FFmpeg not found at path: {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: which::Error,
    },
}

/// Resolve the ffmpeg binary.
///
/// A bare name is searched on `PATH`; a path is checked in place. Either
/// way the result must be an executable file.
pub fn locate_ffmpeg(configured: &Path) -> Result<PathBuf, FfmpegError> {
    which::which(configured)
        .inspect(|found| debug!("Using ffmpeg at {}", found.display()))
        .map_err(|source| FfmpegError::NotFound {
            path: configured.to_path_buf(),
            source,
        })
}
