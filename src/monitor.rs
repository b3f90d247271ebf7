//! Per-provider operation accounting.
//!
//! Monitors observe every provider call but never influence a round's
//! outcome; recording must not block or fail.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};

use crate::config::ProviderId;

/// Records the outcome of individual provider operations.
///
/// Fire-and-forget: implementations must be cheap and infallible from the
/// caller's perspective.
pub trait OperationMonitor: Send + Sync {
    fn record(&self, provider: ProviderId, operation: &str, success: bool, duration: Duration);
}

/// Monitor that discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMonitor;

impl OperationMonitor for NullMonitor {
    fn record(&self, _provider: ProviderId, _operation: &str, _success: bool, _duration: Duration) {
    }
}

#[derive(Debug, Default)]
struct ProviderStats {
    successes: u64,
    failures: u64,
    total_latency_ms: f64,
}

/// Snapshot of accumulated provider performance statistics.
#[derive(Debug, Clone)]
pub struct ProviderStatsSnapshot {
    /// Number of successful operations recorded for this provider.
    pub successes: u64,
    /// Number of failed operations recorded for this provider.
    pub failures: u64,
    /// Average latency in milliseconds across successful operations.
    pub avg_latency_ms: f64,
}

/// Monitor that accumulates per-provider success/failure counts and latency.
///
/// Useful for steering provider selection offline; the engines themselves
/// never read it back.
#[derive(Debug, Default)]
pub struct StatsMonitor {
    stats: Mutex<HashMap<ProviderId, ProviderStats>>,
}

impl StatsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the statistics recorded so far.
    pub fn snapshot(&self) -> HashMap<ProviderId, ProviderStatsSnapshot> {
        let stats = self.stats.lock().expect("provider stats mutex poisoned");

        stats
            .iter()
            .map(|(id, s)| {
                let avg = if s.successes > 0 {
                    s.total_latency_ms / (s.successes as f64)
                } else {
                    0.0
                };

                (
                    *id,
                    ProviderStatsSnapshot {
                        successes: s.successes,
                        failures: s.failures,
                        avg_latency_ms: avg,
                    },
                )
            })
            .collect()
    }
}

impl OperationMonitor for StatsMonitor {
    fn record(&self, provider: ProviderId, _operation: &str, success: bool, duration: Duration) {
        if let Ok(mut stats) = self.stats.lock() {
            let entry = stats.entry(provider).or_default();
            if success {
                entry.successes += 1;
                entry.total_latency_ms += duration.as_secs_f64() * 1000.0;
            } else {
                entry.failures += 1;
            }
        }
    }
}
