//! CBS Simulator
//!
//! HTTP front end over the in-memory ledger: read-only lookups of customers,
//! accounts and histories, plus the transfer and single-posting endpoints.

pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod router;
pub mod server;
pub mod state;

use std::sync::Arc;

use cbs_common::{now, Timestamp};
use cbs_ledger::{LedgerEngine, LedgerStore};

pub use config::{LogFormat, SimulatorConfig};
pub use error::{AccountKey, ApiError, ServerError, ServerResult};
pub use metrics::{Metrics, MetricsSnapshot, SharedMetrics};
pub use server::CbsServer;
pub use state::{Lifecycle, ServiceState};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: LedgerEngine,
    pub metrics: SharedMetrics,
    pub lifecycle: Lifecycle,
    pub config: Arc<SimulatorConfig>,
    pub started_at: Timestamp,
}

impl AppState {
    pub fn new(config: SimulatorConfig, engine: LedgerEngine) -> Self {
        Self {
            engine,
            metrics: Arc::new(Metrics::new()),
            lifecycle: Lifecycle::new(),
            config: Arc::new(config),
            started_at: now(),
        }
    }

    /// State over a freshly seeded demo ledger.
    pub fn seeded(config: SimulatorConfig) -> ServerResult<Self> {
        let store = LedgerStore::seeded()?;
        Ok(Self::new(config, LedgerEngine::new(Arc::new(store))))
    }
}
