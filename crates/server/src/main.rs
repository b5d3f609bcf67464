use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voodio_core::lifecycle::{SetupError, SupervisorError};
use voodio_core::{load_config, Supervisor, WorkDir};
use voodio_server::{Cli, WebServer};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let json = std::env::var("VOODIO_LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        info!("Loading configuration from {:?}", path);
    }
    let config =
        load_config(cli.config.as_deref(), &cli.overrides()).context("Failed to load configuration")?;

    let workdir = WorkDir::in_user_cache()
        .map_err(SetupError::from)
        .context("Unable to create working directory")?;
    info!("Working directory: {:?}", workdir.path());

    // Armed before ingestion so an early Ctrl+C still removes the workdir.
    let interrupt = arm_shutdown_signal();
    let mut supervisor = Supervisor::new(workdir).with_interrupt(interrupt.clone());
    let context = match supervisor.prepare(&config) {
        Ok(context) => context,
        Err(SupervisorError::Interrupted) => {
            info!("Interrupted during startup");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    info!("Catalog ready, starting server");

    let server = Arc::new(WebServer::new(context));
    let outcome = supervisor.serve(server, shutdown_signal(interrupt)).await;

    if let Some(e) = outcome.serve_error {
        bail!(e);
    }
    Ok(())
}

/// Resolves once SIGINT or SIGTERM has been received.
async fn shutdown_signal(mut interrupt: watch::Receiver<bool>) {
    if interrupt.wait_for(|received| *received).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Install the signal handlers now and report delivery through the channel.
#[cfg(unix)]
fn arm_shutdown_signal() -> watch::Receiver<bool> {
    use signal::unix::{signal, SignalKind};

    let (tx, rx) = watch::channel(false);
    let mut sigint = signal(SignalKind::interrupt())
        .inspect_err(|e| error!("Failed to install Ctrl+C handler: {}", e))
        .ok();
    let mut sigterm = signal(SignalKind::terminate())
        .inspect_err(|e| error!("Failed to install SIGTERM handler: {}", e))
        .ok();

    tokio::spawn(async move {
        tokio::select! {
            _ = recv(&mut sigint) => {},
            _ = recv(&mut sigterm) => {},
        }
        tx.send_replace(true);
    });
    rx
}

#[cfg(unix)]
async fn recv(signal: &mut Option<signal::unix::Signal>) {
    match signal {
        Some(signal) => {
            signal.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(not(unix))]
fn arm_shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    let ctrl_c = signal::ctrl_c();
    tokio::spawn(async move {
        match ctrl_c.await {
            Ok(()) => {
                tx.send_replace(true);
            }
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });
    rx
}
