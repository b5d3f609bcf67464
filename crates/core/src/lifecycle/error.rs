use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::ffmpeg::FfmpegError;
use crate::scanner::ScanError;
use crate::workdir::WorkDirError;

/// Failures before ingestion starts.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WorkDir(#[from] WorkDirError),

    #[error("sorry, you haven't installed ffmpeg: {0}")]
    FfmpegNotFound(#[from] FfmpegError),

    #[error("Unable to create DB connection: {0}")]
    Storage(CatalogError),
}

/// Any failure that aborts the run before serving.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("Error while scanning movies: {0}")]
    Scan(#[from] ScanError),

    #[error("Unable to save catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Interrupted before the server started")]
    Interrupted,
}
