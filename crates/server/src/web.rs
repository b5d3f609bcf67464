//! HTTP implementation of the supervised network service.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};
use voodio_core::{NetworkService, ServiceContext, ServiceError};

use crate::api::{create_router, KeepAlive};
use crate::state::AppState;

pub struct WebServer {
    addr: SocketAddr,
    router: Router,
    keep_alive: KeepAlive,
    local_addr: OnceLock<SocketAddr>,
    /// Bound by `bind`, taken by `listen_and_serve`.
    listener: Mutex<Option<TcpListener>>,
    /// Stop accepting and drain.
    shutdown_tx: watch::Sender<bool>,
    /// Drop whatever is still open.
    force_tx: watch::Sender<bool>,
    stopped_tx: watch::Sender<bool>,
}

impl WebServer {
    pub fn new(context: ServiceContext) -> Self {
        let keep_alive = KeepAlive::default();
        let state = Arc::new(AppState::from_context(&context));
        let router = create_router(state, keep_alive.clone());
        Self::with_router(context.addr(), router, keep_alive)
    }

    pub fn with_router(addr: SocketAddr, router: Router, keep_alive: KeepAlive) -> Self {
        Self {
            addr,
            router,
            keep_alive,
            local_addr: OnceLock::new(),
            listener: Mutex::new(None),
            shutdown_tx: watch::channel(false).0,
            force_tx: watch::channel(false).0,
            stopped_tx: watch::channel(false).0,
        }
    }

    /// Address actually bound, once listening.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    pub fn keep_alives_enabled(&self) -> bool {
        self.keep_alive.is_enabled()
    }

    async fn bind_listener(&self) -> Result<TcpListener, ServiceError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServiceError::Bind {
                addr: self.addr,
                source,
            })?;
        let bound = listener.local_addr().unwrap_or(self.addr);
        let _ = self.local_addr.set(bound);
        info!("Listening on {}", bound);
        Ok(listener)
    }

    async fn run(&self) -> Result<(), ServiceError> {
        let bound = self.listener.lock().await.take();
        let listener = match bound {
            Some(listener) => listener,
            None => self.bind_listener().await?,
        };
        info!("Starting server on {}", self.local_addr().unwrap_or(self.addr));

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut force_rx = self.force_tx.subscribe();

        let server = axum::serve(listener, self.router.clone()).with_graceful_shutdown(async move {
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
        });

        tokio::select! {
            result = server.into_future() => result.map_err(|e| ServiceError::Serve(e.to_string())),
            _ = async move { let _ = force_rx.wait_for(|force| *force).await; } => {
                warn!("Closing remaining connections");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl NetworkService for WebServer {
    fn port(&self) -> u16 {
        self.local_addr().unwrap_or(self.addr).port()
    }

    async fn bind(&self) -> Result<(), ServiceError> {
        let mut slot = self.listener.lock().await;
        if slot.is_none() {
            *slot = Some(self.bind_listener().await?);
        }
        Ok(())
    }

    async fn listen_and_serve(&self) -> Result<(), ServiceError> {
        let result = self.run().await;
        self.stopped_tx.send_replace(true);
        result
    }

    fn disable_keep_alives(&self) {
        self.keep_alive.disable();
    }

    async fn shutdown(&self, deadline: Duration) -> Result<(), ServiceError> {
        self.shutdown_tx.send_replace(true);

        let mut stopped_rx = self.stopped_tx.subscribe();
        let drained = tokio::time::timeout(deadline, async move {
            let _ = stopped_rx.wait_for(|stopped| *stopped).await;
        })
        .await;

        match drained {
            Ok(()) => Ok(()),
            Err(_) => {
                self.force_tx.send_replace(true);
                Err(ServiceError::DeadlineExceeded(deadline))
            }
        }
    }
}
