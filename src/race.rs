//! Race-and-select strategy engine.
//!
//! One round queries every registered fetch provider concurrently for the
//! same request, scores each response, and returns the single best candidate
//! under a dual-deadline budget: at the soft deadline (half the budget) the
//! round short-circuits if it already holds at least one response; at the
//! hard deadline it terminates unconditionally.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{sync::mpsc, time};
use tracing::{debug, trace, warn};

use crate::{
    config::{ProviderId, RaceConfig},
    errors::DutyError,
    history::{NullScoreHistory, ScoreHistoryStore},
    monitor::{NullMonitor, OperationMonitor},
    provider::{FetchHandle, FetchRequest, ScoreFn},
};

/// Operation name recorded on the monitor for each provider fetch call.
pub const OPERATION_FETCH: &str = "fetch candidate";
/// Operation name recorded on the monitor for the winning provider.
pub const OPERATION_SELECT: &str = "select best";

/// A scored artifact returned by one provider during a fetch round.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    /// Provider that produced the artifact.
    pub provider: ProviderId,
    /// The fetched artifact itself.
    pub artifact: T,
    /// Quality score; higher is better, assumed non-negative.
    pub score: f64,
    /// Wall-clock duration of the provider call.
    pub duration: Duration,
}

/// Per-round provider accounting.
///
/// At round completion `responded + errored + timed_out` equals the number
/// of registered providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    /// Providers that returned a candidate.
    pub responded: usize,
    /// Providers that returned an error.
    pub errored: usize,
    /// Providers attributed to a deadline cutoff.
    pub timed_out: usize,
}

impl Tally {
    /// Total number of providers accounted for.
    pub fn total(&self) -> usize {
        self.responded + self.errored + self.timed_out
    }
}

enum RaceEvent<T> {
    Response(Candidate<T>),
    Failure(ProviderId, anyhow::Error),
}

/// Races a fetch request across every registered provider and selects the
/// candidate with the strictly highest score.
///
/// Providers share no round state; each reports through a single channel
/// drained by the coordinating task, so the best-candidate slot needs no
/// locking. Individual provider failures are logged and tallied, never
/// fatal to the round.
pub struct RaceSelector<T> {
    providers: Arc<Vec<FetchHandle<T>>>,
    cfg: RaceConfig,
    score_fn: ScoreFn<T>,
    monitor: Arc<dyn OperationMonitor>,
    history: Arc<dyn ScoreHistoryStore>,
}

impl<T: Send + 'static> RaceSelector<T> {
    /// Creates a selector over the given providers.
    ///
    /// Operation monitoring and score history default to no-ops; attach real
    /// collaborators with [`with_monitor`](Self::with_monitor) and
    /// [`with_history`](Self::with_history).
    pub fn new(providers: Vec<FetchHandle<T>>, cfg: RaceConfig, score_fn: ScoreFn<T>) -> Self {
        Self {
            providers: Arc::new(providers),
            cfg,
            score_fn,
            monitor: Arc::new(NullMonitor),
            history: Arc::new(NullScoreHistory),
        }
    }

    /// Attaches an operation monitor recording every provider call.
    pub fn with_monitor(mut self, monitor: Arc<dyn OperationMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Attaches a best-effort score history store.
    pub fn with_history(mut self, history: Arc<dyn ScoreHistoryStore>) -> Self {
        self.history = history;
        self
    }

    /// Returns the registered providers.
    pub fn providers(&self) -> &[FetchHandle<T>] {
        &self.providers
    }

    /// Runs one race round and returns the best candidate.
    ///
    /// Fails with [`DutyError::NoProviders`] when the registry is empty and
    /// with [`DutyError::NoCandidates`] when the hard deadline passes without
    /// a single usable response.
    pub async fn fetch(&self, request: FetchRequest) -> Result<Candidate<T>, DutyError> {
        let started = Instant::now();
        let (best, tally) = self.run_round(request).await?;
        trace!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            responded = tally.responded,
            errored = tally.errored,
            timed_out = tally.timed_out,
            "round complete"
        );

        match best {
            Some(candidate) => {
                debug!(
                    provider = %candidate.provider,
                    score = candidate.score,
                    "selected best candidate"
                );
                self.monitor
                    .record(candidate.provider, OPERATION_SELECT, true, started.elapsed());
                Ok(candidate)
            }
            None => Err(DutyError::NoCandidates),
        }
    }

    async fn run_round(
        &self,
        request: FetchRequest,
    ) -> Result<(Option<Candidate<T>>, Tally), DutyError> {
        let total = self.providers.len();
        if total == 0 {
            return Err(DutyError::NoProviders);
        }

        let started = Instant::now();
        let request = Arc::new(request.truncated());
        let slot = request.slot;
        let (tx, mut rx) = mpsc::channel::<RaceEvent<T>>(total);

        for (id, provider) in self.providers.iter() {
            let id = *id;
            let provider = Arc::clone(provider);
            let request = Arc::clone(&request);
            let score_fn = Arc::clone(&self.score_fn);
            let monitor = Arc::clone(&self.monitor);
            let tx = tx.clone();
            let hard_timeout = self.cfg.timeout;

            tokio::spawn(async move {
                let call_started = Instant::now();
                let outcome = match time::timeout(hard_timeout, provider.fetch(&request)).await {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!("fetch exceeded hard deadline")),
                };
                let duration = call_started.elapsed();
                monitor.record(id, OPERATION_FETCH, outcome.is_ok(), duration);

                let event = match outcome {
                    Ok(artifact) => {
                        let score = (*score_fn)(&artifact);
                        RaceEvent::Response(Candidate {
                            provider: id,
                            artifact,
                            score,
                            duration,
                        })
                    }
                    Err(err) => RaceEvent::Failure(id, err),
                };

                // The round may already be resolved; late arrivals are dropped.
                let _ = tx.send(event).await;
            });
        }
        drop(tx);

        let soft_sleep = time::sleep(self.cfg.soft_timeout());
        let hard_sleep = time::sleep(self.cfg.timeout);
        tokio::pin!(soft_sleep, hard_sleep);

        let mut tally = Tally::default();
        let mut soft_expired = false;
        let mut best: Option<Candidate<T>> = None;

        while tally.total() != total {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(RaceEvent::Response(candidate)) => {
                        tally.responded += 1;
                        debug!(
                            provider = %candidate.provider,
                            slot,
                            score = candidate.score,
                            duration_ms = candidate.duration.as_millis() as u64,
                            "candidate received"
                        );
                        if let Err(err) = self.history.insert(
                            slot,
                            candidate.provider,
                            candidate.score,
                            candidate.duration,
                        ) {
                            debug!(provider = %candidate.provider, error = %err, "failed to record score");
                        }
                        // Strict greater-than: the first arrival keeps ties.
                        if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                            best = Some(candidate);
                        }
                        if soft_expired {
                            // Past the soft deadline any response resolves the
                            // round; outstanding providers count as timed out.
                            tally.timed_out = total - tally.responded - tally.errored;
                        }
                    }
                    Some(RaceEvent::Failure(id, err)) => {
                        tally.errored += 1;
                        warn!(provider = %id, slot, error = %err, "fetch failed");
                        if soft_expired && tally.responded > 0 {
                            tally.timed_out = total - tally.responded - tally.errored;
                        }
                    }
                    None => {
                        // Every task has reported or died; attribute the gap.
                        tally.timed_out = total - tally.responded - tally.errored;
                    }
                },
                _ = &mut soft_sleep, if !soft_expired => {
                    soft_expired = true;
                    if tally.responded > 0 {
                        tally.timed_out = total - tally.responded - tally.errored;
                        debug!(
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            responded = tally.responded,
                            errored = tally.errored,
                            "soft timeout reached with responses"
                        );
                    } else {
                        debug!(
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            errored = tally.errored,
                            "soft timeout reached with no responses"
                        );
                    }
                }
                _ = &mut hard_sleep => {
                    tally.timed_out = total - tally.responded - tally.errored;
                    debug!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        responded = tally.responded,
                        errored = tally.errored,
                        timed_out = tally.timed_out,
                        "hard timeout reached"
                    );
                }
            }
        }

        Ok((best, tally))
    }
}
