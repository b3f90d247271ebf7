//! Fan-out quorum submission engine.
//!
//! One round pushes a payload to every registered submit provider under a
//! counting concurrency limiter and resolves on the first acceptance:
//! waiting for slower providers would couple latency to the slowest
//! participant when a single acceptance already settles the duty.
//! Remaining submissions continue detached; their outcomes are visible only
//! through the operation monitor and logs.

use std::{sync::Arc, time::Instant};

use tokio::{
    sync::{mpsc, Semaphore},
    time,
};
use tracing::{debug, trace, warn};

use crate::{
    config::{ProviderId, SubmitConfig},
    errors::DutyError,
    monitor::{NullMonitor, OperationMonitor},
    provider::{Payload, SubmitHandle},
};

/// Operation name recorded on the monitor for each provider submit call.
pub const OPERATION_SUBMIT: &str = "submit payload";

/// Submits a payload to every registered provider, succeeding on the first
/// acceptance.
///
/// A round fails only when the full timeout elapses with zero acceptances.
/// In particular, a round where every provider errors quickly still waits
/// out the whole budget; there is no fail-fast path on an all-errored set.
pub struct FanoutSubmitter<P> {
    providers: Arc<Vec<SubmitHandle<P>>>,
    cfg: SubmitConfig,
    monitor: Arc<dyn OperationMonitor>,
}

impl<P: Payload> FanoutSubmitter<P> {
    /// Creates a submitter over the given providers.
    pub fn new(providers: Vec<SubmitHandle<P>>, cfg: SubmitConfig) -> Self {
        Self {
            providers: Arc::new(providers),
            cfg,
            monitor: Arc::new(NullMonitor),
        }
    }

    /// Attaches an operation monitor recording every provider call.
    pub fn with_monitor(mut self, monitor: Arc<dyn OperationMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Returns the registered providers.
    pub fn providers(&self) -> &[SubmitHandle<P>] {
        &self.providers
    }

    /// Runs one submission round and returns the first accepting provider.
    ///
    /// At most `cfg.concurrency` submission calls run simultaneously. The
    /// call returns as soon as any provider accepts; in-flight submissions
    /// keep running in the background.
    pub async fn submit(&self, payload: P) -> Result<ProviderId, DutyError> {
        if self.providers.is_empty() {
            return Err(DutyError::NoProviders);
        }
        if payload.is_empty() {
            return Err(DutyError::EmptyPayload);
        }

        let payload = Arc::new(payload);
        let limiter = Arc::new(Semaphore::new(self.cfg.concurrency));
        let (tx, mut rx) = mpsc::channel::<ProviderId>(self.providers.len());

        for (id, provider) in self.providers.iter() {
            let id = *id;
            let provider = Arc::clone(provider);
            let payload = Arc::clone(&payload);
            let limiter = Arc::clone(&limiter);
            let monitor = Arc::clone(&self.monitor);
            let tx = tx.clone();

            tokio::spawn(async move {
                let permit = match limiter.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                let started = Instant::now();
                let result = provider.submit(&payload).await;
                drop(permit);

                monitor.record(id, OPERATION_SUBMIT, result.is_ok(), started.elapsed());
                match result {
                    Ok(()) => {
                        trace!(provider = %id, "submission accepted");
                        // The round may already be resolved; then this is a
                        // straggler whose outcome only the monitor keeps.
                        let _ = tx.send(id).await;
                    }
                    Err(err) => {
                        warn!(provider = %id, error = %err, "submission failed");
                    }
                }
            });
        }

        // Holding our own sender keeps the channel open, so an all-errored
        // round blocks until the timeout rather than failing fast.
        match time::timeout(self.cfg.timeout, rx.recv()).await {
            Ok(Some(id)) => {
                debug!(provider = %id, "payload accepted");
                Ok(id)
            }
            Ok(None) | Err(_) => Err(DutyError::SubmitTimeout(self.cfg.timeout)),
        }
    }
}
