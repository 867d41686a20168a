//! Time utilities for the core banking simulator.

use chrono::{DateTime, Duration, Utc};

/// A timestamp with timezone (always UTC).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// The instant `days` whole days before `reference`.
pub fn days_before(reference: Timestamp, days: i64) -> Timestamp {
    reference - Duration::days(days)
}

/// Seconds elapsed since `since`, never negative.
pub fn uptime_seconds(since: Timestamp) -> f64 {
    let elapsed = now() - since;
    if elapsed < Duration::zero() {
        0.0
    } else {
        elapsed.num_milliseconds() as f64 / 1000.0
    }
}
