//! Service lifecycle: ingestion, serving and bounded graceful shutdown.
//!
//! ```text
//! Idle -> Starting -> Serving -> ShuttingDown -> Stopped
//!   \________\______________________________ -> Aborted
//! ```

mod addresses;
mod error;
mod service;
mod state;
mod supervisor;

pub use addresses::local_ipv4_urls;
pub use error::{SetupError, SupervisorError};
pub use service::{NetworkService, ServiceContext, ServiceError};
pub use state::{LifecycleState, LifecycleTracker};
pub use supervisor::{ServeOutcome, ShutdownTrigger, Supervisor, SHUTDOWN_DEADLINE};
