//! Service lifecycle state.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Simulator operational state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Ledger is being seeded and the listener bound.
    Starting,
    /// Serving requests.
    Running,
    /// Draining in-flight requests after a shutdown signal.
    ShuttingDown,
    /// Listener closed.
    Stopped,
}

impl ServiceState {
    /// Check if the service reports itself healthy.
    pub fn is_operational(&self) -> bool {
        matches!(self, ServiceState::Running)
    }

    /// Check if the service is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceState::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceState::Starting => "starting",
            ServiceState::Running => "running",
            ServiceState::ShuttingDown => "shutting_down",
            ServiceState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, mutable lifecycle state.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: Arc<RwLock<ServiceState>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ServiceState::Starting)),
        }
    }

    pub fn state(&self) -> ServiceState {
        *self.state.read()
    }

    /// Move to `next`. A stopped service stays stopped.
    pub fn transition(&self, next: ServiceState) {
        let mut state = self.state.write();
        if state.is_terminal() {
            return;
        }
        tracing::debug!(from = %*state, to = %next, "Service state change");
        *state = next;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), ServiceState::Starting);
        assert!(!lifecycle.state().is_operational());

        lifecycle.transition(ServiceState::Running);
        assert!(lifecycle.state().is_operational());

        lifecycle.transition(ServiceState::ShuttingDown);
        lifecycle.transition(ServiceState::Stopped);
        lifecycle.transition(ServiceState::Running);
        assert_eq!(lifecycle.state(), ServiceState::Stopped);
    }

    #[test]
    fn test_clones_share_state() {
        let lifecycle = Lifecycle::new();
        let other = lifecycle.clone();
        other.transition(ServiceState::Running);
        assert_eq!(lifecycle.state(), ServiceState::Running);
        assert_eq!(lifecycle.state().to_string(), "running");
    }
}
