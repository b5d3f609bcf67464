use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::MediaCatalog;
use crate::config::{Config, Resolution, SanitizedConfig};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unable to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(String),

    #[error("Shutdown did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

/// Everything a network service needs after ingestion finished.
#[derive(Clone)]
pub struct ServiceContext {
    pub catalog: Arc<dyn MediaCatalog>,
    pub host: IpAddr,
    pub port: u16,
    pub work_dir: PathBuf,
    pub tmdb_api_key: String,
    pub resolutions: Vec<Resolution>,
    pub config: SanitizedConfig,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("work_dir", &self.work_dir)
            .field("resolutions", &self.resolutions)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServiceContext {
    pub fn new(config: &Config, catalog: Arc<dyn MediaCatalog>, work_dir: PathBuf) -> Self {
        Self {
            catalog,
            host: config.server.host,
            port: config.server.port,
            work_dir,
            tmdb_api_key: config.tmdb.api_key.clone(),
            resolutions: config.resolutions.clone(),
            config: SanitizedConfig::from(config),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// A long-running listener driven by the supervisor.
#[async_trait]
pub trait NetworkService: Send + Sync {
    fn port(&self) -> u16;

    /// Claim the listening socket. The supervisor only reports the service
    /// as serving once this succeeds.
    async fn bind(&self) -> Result<(), ServiceError>;

    /// Serve until stopped, binding first if `bind` was not called.
    /// `Ok(())` means a requested stop, not a failure.
    async fn listen_and_serve(&self) -> Result<(), ServiceError>;

    /// Stop reusing idle connections. Takes effect for in-flight requests.
    fn disable_keep_alives(&self);

    /// Stop accepting, then wait for in-flight work to drain, up to
    /// `deadline`. Past the deadline remaining connections are dropped and
    /// `ServiceError::DeadlineExceeded` is returned.
    async fn shutdown(&self, deadline: Duration) -> Result<(), ServiceError>;
}
