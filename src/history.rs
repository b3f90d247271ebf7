//! Best-effort score history, keyed by slot.
//!
//! Every candidate a round receives is recorded here, winner or not, so the
//! scoring behavior of each provider can be analyzed later. Insert failures
//! are logged by the engine and never affect selection.

use std::{sync::Mutex, time::Duration};

use crate::config::ProviderId;

/// Persists one score row per candidate per round.
pub trait ScoreHistoryStore: Send + Sync {
    fn insert(
        &self,
        slot: u64,
        provider: ProviderId,
        score: f64,
        duration: Duration,
    ) -> anyhow::Result<()>;
}

/// One recorded candidate score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub slot: u64,
    pub provider: ProviderId,
    pub score: f64,
    pub duration: Duration,
}

/// In-memory score history.
///
/// Backends with real persistence (a database table of slot, label, score,
/// duration rows) implement [`ScoreHistoryStore`] themselves; this one keeps
/// rounds inspectable in tests and demos.
#[derive(Debug, Default)]
pub struct MemoryScoreHistory {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemoryScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all records for one slot, in arrival order.
    pub fn scores_for_slot(&self, slot: u64) -> Vec<ScoreRecord> {
        self.records
            .lock()
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.slot == slot)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total number of recorded rows.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreHistoryStore for MemoryScoreHistory {
    fn insert(
        &self,
        slot: u64,
        provider: ProviderId,
        score: f64,
        duration: Duration,
    ) -> anyhow::Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("score history mutex poisoned"))?;
        records.push(ScoreRecord {
            slot,
            provider,
            score,
            duration,
        });
        Ok(())
    }
}

/// History store that drops every row.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScoreHistory;

impl ScoreHistoryStore for NullScoreHistory {
    fn insert(
        &self,
        _slot: u64,
        _provider: ProviderId,
        _score: f64,
        _duration: Duration,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_filtered_by_slot() {
        let history = MemoryScoreHistory::new();
        history
            .insert(7, ProviderId("a"), 0.5, Duration::from_millis(12))
            .unwrap();
        history
            .insert(8, ProviderId("a"), 0.6, Duration::from_millis(9))
            .unwrap();
        history
            .insert(7, ProviderId("b"), 0.9, Duration::from_millis(20))
            .unwrap();

        let slot7 = history.scores_for_slot(7);
        assert_eq!(slot7.len(), 2);
        assert_eq!(slot7[0].provider, ProviderId("a"));
        assert_eq!(slot7[1].provider, ProviderId("b"));
        assert_eq!(history.len(), 3);
    }
}
