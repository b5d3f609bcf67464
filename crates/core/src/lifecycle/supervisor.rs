//! Supervisor owning the working directory from acquisition to release.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tracing::{error, info, warn};

use super::addresses::local_ipv4_urls;
use super::error::{SetupError, SupervisorError};
use super::service::{NetworkService, ServiceContext};
use super::state::{LifecycleState, LifecycleTracker};
use crate::catalog::{CatalogError, MediaCatalog, SqliteCatalog};
use crate::config::{validate_config, Config};
use crate::ffmpeg::locate_ffmpeg;
use crate::ingest::{CatalogWriter, GroupDetector};
use crate::metrics::SHUTDOWNS;
use crate::scanner::scan_dir;
use crate::title::ReleaseNameParser;
use crate::workdir::WorkDir;

/// Upper bound on draining in-flight requests after an interrupt.
pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(30);

/// What ended the serving phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownTrigger {
    Interrupt,
    ServiceExited,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServeOutcome {
    pub trigger: ShutdownTrigger,
    /// Whether in-flight work drained within the deadline.
    pub graceful: bool,
    /// Set when the serve loop failed instead of being stopped.
    pub serve_error: Option<String>,
}

impl ServeOutcome {
    pub fn is_clean(&self) -> bool {
        self.serve_error.is_none()
    }
}

struct ShutdownReport {
    trigger: ShutdownTrigger,
    graceful: bool,
}

/// Opens the catalog backing one run, given the database path.
type CatalogFactory =
    Box<dyn Fn(&Path) -> Result<Arc<dyn MediaCatalog>, CatalogError> + Send + Sync>;

pub struct Supervisor {
    workdir: WorkDir,
    tracker: LifecycleTracker,
    shutdown_deadline: Duration,
    open_catalog: CatalogFactory,
    interrupt: Option<watch::Receiver<bool>>,
}

impl Supervisor {
    pub fn new(workdir: WorkDir) -> Self {
        Self {
            workdir,
            tracker: LifecycleTracker::new(),
            shutdown_deadline: SHUTDOWN_DEADLINE,
            open_catalog: Box::new(|path: &Path| {
                let catalog: Arc<dyn MediaCatalog> = Arc::new(SqliteCatalog::new(path)?);
                Ok(catalog)
            }),
            interrupt: None,
        }
    }

    pub fn with_shutdown_deadline(mut self, deadline: Duration) -> Self {
        self.shutdown_deadline = deadline;
        self
    }

    /// Replace the SQLite catalog opened by `prepare`.
    pub fn with_catalog_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Path) -> Result<Arc<dyn MediaCatalog>, CatalogError> + Send + Sync + 'static,
    {
        self.open_catalog = Box::new(factory);
        self
    }

    /// Abort `prepare` between phases once `interrupt` holds `true`.
    pub fn with_interrupt(mut self, interrupt: watch::Receiver<bool>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.tracker.current()
    }

    pub fn history(&self) -> Vec<LifecycleState> {
        self.tracker.history()
    }

    pub fn tracker(&self) -> LifecycleTracker {
        self.tracker.clone()
    }

    pub fn work_dir(&self) -> &Path {
        self.workdir.path()
    }

    /// Validate, scan, ingest and detect groups.
    ///
    /// On success the supervisor is `Starting` and the returned context is
    /// ready to build a service from. On failure it is `Aborted` and the
    /// working directory is already gone.
    pub fn prepare(&mut self, config: &Config) -> Result<ServiceContext, SupervisorError> {
        match self.ingest(config) {
            Ok(catalog) => {
                self.tracker.transition(LifecycleState::Starting);
                Ok(ServiceContext::new(
                    config,
                    catalog,
                    self.workdir.path().to_path_buf(),
                ))
            }
            Err(e) => {
                error!("{}", e);
                self.abort();
                Err(e)
            }
        }
    }

    fn ingest(&self, config: &Config) -> Result<Arc<dyn MediaCatalog>, SupervisorError> {
        self.check_interrupt()?;
        validate_config(config).map_err(SetupError::from)?;
        let ffmpeg = locate_ffmpeg(&config.ffmpeg.path).map_err(SetupError::from)?;
        info!("Using ffmpeg at {}", ffmpeg.display());

        let catalog = (self.open_catalog)(&self.workdir.db_path()).map_err(SetupError::Storage)?;

        self.check_interrupt()?;
        info!("Scanning movies in {}", config.movie_path.display());
        let report = scan_dir(&config.movie_path)?;
        info!(
            "Found {} movies and {} subtitles ({} other files skipped)",
            report.movies.len(),
            report.subtitles.len(),
            report.skipped
        );

        self.check_interrupt()?;
        let writer = CatalogWriter::new(Arc::clone(&catalog), Arc::new(ReleaseNameParser::new()));
        writer.ingest(&report.movies, &report.subtitles)?;

        self.check_interrupt()?;
        GroupDetector::new(Arc::clone(&catalog)).detect()?;

        self.check_interrupt()?;
        Ok(catalog)
    }

    fn check_interrupt(&self) -> Result<(), SupervisorError> {
        match &self.interrupt {
            Some(rx) if *rx.borrow() => Err(SupervisorError::Interrupted),
            _ => Ok(()),
        }
    }

    fn abort(&mut self) {
        self.tracker.transition(LifecycleState::Aborted);
        self.workdir.release();
    }

    /// Run `service` until `interrupt` resolves or the service stops on its
    /// own, then shut it down within the deadline and release the working
    /// directory.
    pub async fn serve<S, F>(mut self, service: Arc<S>, interrupt: F) -> ServeOutcome
    where
        S: NetworkService + 'static,
        F: Future<Output = ()> + Send + 'static,
    {
        if let Err(e) = service.bind().await {
            SHUTDOWNS.with_label_values(&["error"]).inc();
            error!("Unable to start server on port {}: {}", service.port(), e);
            self.abort();
            return ServeOutcome {
                trigger: ShutdownTrigger::ServiceExited,
                graceful: false,
                serve_error: Some(e.to_string()),
            };
        }

        let port = service.port();
        self.tracker.transition(LifecycleState::Serving);
        info!("Server is alive");
        for url in local_ipv4_urls(port) {
            info!("{}", url);
        }

        let (done_tx, done_rx) = oneshot::channel::<ShutdownReport>();
        // Dropped when the serve loop returns, whatever the reason.
        let (exited_tx, exited_rx) = oneshot::channel::<()>();

        let watcher = Arc::clone(&service);
        let tracker = self.tracker.clone();
        let deadline = self.shutdown_deadline;
        tokio::spawn(async move {
            let trigger = tokio::select! {
                _ = interrupt => {
                    info!("Shutting down...");
                    ShutdownTrigger::Interrupt
                }
                _ = exited_rx => ShutdownTrigger::ServiceExited,
            };
            tracker.transition(LifecycleState::ShuttingDown);

            watcher.disable_keep_alives();
            let graceful = match watcher.shutdown(deadline).await {
                Ok(()) => {
                    SHUTDOWNS.with_label_values(&["graceful"]).inc();
                    true
                }
                Err(e) => {
                    SHUTDOWNS.with_label_values(&["deadline_exceeded"]).inc();
                    error!("Couldn't gracefully shutdown: {}", e);
                    false
                }
            };

            if done_tx.send(ShutdownReport { trigger, graceful }).is_err() {
                warn!("Supervisor went away before shutdown completed");
            }
        });

        let serve_error = match service.listen_and_serve().await {
            Ok(()) => None,
            Err(e) => {
                SHUTDOWNS.with_label_values(&["error"]).inc();
                error!("Unable to start server on port {}: {}", port, e);
                Some(e.to_string())
            }
        };
        drop(exited_tx);

        let report = match done_rx.await {
            Ok(report) => report,
            Err(_) => {
                error!("Shutdown watcher ended without reporting");
                ShutdownReport {
                    trigger: ShutdownTrigger::ServiceExited,
                    graceful: false,
                }
            }
        };

        self.workdir.release();
        self.tracker.transition(LifecycleState::Stopped);
        info!("Server closed");

        ServeOutcome {
            trigger: report.trigger,
            graceful: report.graceful,
            serve_error,
        }
    }
}
