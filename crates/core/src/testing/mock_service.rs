//! Mock network service for lifecycle tests.

use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use crate::lifecycle::{NetworkService, ServiceError};

/// A call observed by the mock, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Bind,
    ListenAndServe,
    DisableKeepAlives,
    Shutdown(Duration),
}

/// Mock implementation of the NetworkService trait.
///
/// Provides controllable behavior for testing:
/// - Record calls for ordering assertions
/// - Fail at bind time
/// - Hang on shutdown until the deadline forces it
///
/// # Example
///
/// ```rust,ignore
/// use voodio_core::testing::MockService;
///
/// let service = Arc::new(MockService::new(1818));
/// service.set_hang_on_shutdown(true);
///
/// let outcome = supervisor.serve(service.clone(), interrupt).await;
/// assert!(!outcome.graceful);
/// ```
#[derive(Debug, Clone)]
pub struct MockService {
    port: u16,
    calls: Arc<Mutex<Vec<ServiceCall>>>,
    keep_alives: Arc<AtomicBool>,
    hang_on_shutdown: Arc<AtomicBool>,
    fail_bind: Arc<AtomicBool>,
    stop_tx: Arc<watch::Sender<bool>>,
}

impl Default for MockService {
    fn default() -> Self {
        Self::new(1818)
    }
}

impl MockService {
    pub fn new(port: u16) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            port,
            calls: Arc::new(Mutex::new(Vec::new())),
            keep_alives: Arc::new(AtomicBool::new(true)),
            hang_on_shutdown: Arc::new(AtomicBool::new(false)),
            fail_bind: Arc::new(AtomicBool::new(false)),
            stop_tx: Arc::new(stop_tx),
        }
    }

    /// Make `shutdown` wait out its whole deadline.
    pub fn set_hang_on_shutdown(&self, hang: bool) {
        self.hang_on_shutdown.store(hang, Ordering::SeqCst);
    }

    /// Make `bind` (and `listen_and_serve` without a prior bind) fail.
    pub fn set_fail_bind(&self, fail: bool) {
        self.fail_bind.store(fail, Ordering::SeqCst);
    }

    pub fn keep_alives_enabled(&self) -> bool {
        self.keep_alives.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    fn record(&self, call: ServiceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_bind(&self) -> Result<(), ServiceError> {
        if self.fail_bind.load(Ordering::SeqCst) {
            return Err(ServiceError::Bind {
                addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port)),
                source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
            });
        }
        Ok(())
    }

    fn stop(&self) {
        self.stop_tx.send_replace(true);
    }
}

#[async_trait]
impl NetworkService for MockService {
    fn port(&self) -> u16 {
        self.port
    }

    async fn bind(&self) -> Result<(), ServiceError> {
        self.record(ServiceCall::Bind);
        self.check_bind()
    }

    async fn listen_and_serve(&self) -> Result<(), ServiceError> {
        self.record(ServiceCall::ListenAndServe);
        self.check_bind()?;

        let mut rx = self.stop_tx.subscribe();
        let _ = rx.wait_for(|stopped| *stopped).await;
        Ok(())
    }

    fn disable_keep_alives(&self) {
        self.record(ServiceCall::DisableKeepAlives);
        self.keep_alives.store(false, Ordering::SeqCst);
    }

    async fn shutdown(&self, deadline: Duration) -> Result<(), ServiceError> {
        self.record(ServiceCall::Shutdown(deadline));

        if self.hang_on_shutdown.load(Ordering::SeqCst) {
            tokio::time::sleep(deadline).await;
            self.stop();
            return Err(ServiceError::DeadlineExceeded(deadline));
        }

        self.stop();
        Ok(())
    }
}
