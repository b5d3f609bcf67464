use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, warn};

/// Supervisor states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Idle,
    Starting,
    Serving,
    ShuttingDown,
    Stopped,
    Aborted,
}

impl LifecycleState {
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Idle, Starting)
                | (Starting, Serving)
                | (Serving, ShuttingDown)
                | (ShuttingDown, Stopped)
                | (Idle, Aborted)
                | (Starting, Aborted)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Aborted)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Serving => "serving",
            Self::ShuttingDown => "shutting_down",
            Self::Stopped => "stopped",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Shared record of the lifecycle, readable from any task.
#[derive(Debug, Clone)]
pub struct LifecycleTracker {
    history: Arc<Mutex<Vec<LifecycleState>>>,
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self {
            history: Arc::new(Mutex::new(vec![LifecycleState::Idle])),
        }
    }

    pub fn current(&self) -> LifecycleState {
        let history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        history.last().copied().unwrap_or(LifecycleState::Idle)
    }

    pub fn history(&self) -> Vec<LifecycleState> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Move to `next` if the transition is legal. Returns whether it moved.
    pub fn transition(&self, next: LifecycleState) -> bool {
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        let current = history.last().copied().unwrap_or(LifecycleState::Idle);

        if !current.can_transition_to(next) {
            warn!("Ignoring illegal lifecycle transition {} -> {}", current, next);
            return false;
        }

        debug!("Lifecycle {} -> {}", current, next);
        history.push(next);
        true
    }
}
