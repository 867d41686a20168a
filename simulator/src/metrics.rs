//! Metrics collection for simulator monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Simulator metrics.
pub struct Metrics {
    /// Total HTTP requests received.
    pub requests_total: AtomicU64,
    /// Transfers completed.
    pub transfers_success: AtomicU64,
    /// Transfers rejected.
    pub transfers_rejected: AtomicU64,
    /// Single-account postings completed.
    pub postings_success: AtomicU64,
    /// Single-account postings rejected.
    pub postings_rejected: AtomicU64,
    /// Lookups that named an unknown customer or account.
    pub lookups_not_found: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            transfers_success: AtomicU64::new(0),
            transfers_rejected: AtomicU64::new(0),
            postings_success: AtomicU64::new(0),
            postings_rejected: AtomicU64::new(0),
            lookups_not_found: AtomicU64::new(0),
        }
    }

    pub fn request_received(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transfer_succeeded(&self) {
        self.transfers_success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transfer_rejected(&self) {
        self.transfers_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn posting_succeeded(&self) {
        self.postings_success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn posting_rejected(&self) {
        self.postings_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookup_not_found(&self) {
        self.lookups_not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            transfers_success: self.transfers_success.load(Ordering::Relaxed),
            transfers_rejected: self.transfers_rejected.load(Ordering::Relaxed),
            postings_success: self.postings_success.load(Ordering::Relaxed),
            postings_rejected: self.postings_rejected.load(Ordering::Relaxed),
            lookups_not_found: self.lookups_not_found.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP cbs_requests_total Total HTTP requests received
# TYPE cbs_requests_total counter
cbs_requests_total {}

# HELP cbs_transfers_success Total completed transfers
# TYPE cbs_transfers_success counter
cbs_transfers_success {}

# HELP cbs_transfers_rejected Total rejected transfers
# TYPE cbs_transfers_rejected counter
cbs_transfers_rejected {}

# HELP cbs_postings_success Total completed single-account postings
# TYPE cbs_postings_success counter
cbs_postings_success {}

# HELP cbs_postings_rejected Total rejected single-account postings
# TYPE cbs_postings_rejected counter
cbs_postings_rejected {}

# HELP cbs_lookups_not_found Total lookups of unknown customers or accounts
# TYPE cbs_lookups_not_found counter
cbs_lookups_not_found {}
"#,
            snapshot.requests_total,
            snapshot.transfers_success,
            snapshot.transfers_rejected,
            snapshot.postings_success,
            snapshot.postings_rejected,
            snapshot.lookups_not_found,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub transfers_success: u64,
    pub transfers_rejected: u64,
    pub postings_success: u64,
    pub postings_rejected: u64,
    pub lookups_not_found: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<Metrics>;
