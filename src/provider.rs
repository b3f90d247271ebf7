//! Collaborator contracts consumed by the engines.
//!
//! Providers are opaque handles registered at startup; the engines only see
//! these traits. Wire protocols, signing, and duty preparation live behind
//! them and are out of scope here.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ProviderId, MAX_EXTRA_DATA_LEN};

/// Request descriptor shared by every fetch provider in a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Logical slot/round number the duty targets.
    pub slot: u64,
    /// Freeform trailing data, capped at [`MAX_EXTRA_DATA_LEN`] bytes.
    pub extra_data: Vec<u8>,
}

impl FetchRequest {
    pub fn new(slot: u64, extra_data: impl Into<Vec<u8>>) -> Self {
        Self {
            slot,
            extra_data: extra_data.into(),
        }
    }

    /// Truncates the trailing data to the provider-agreed byte limit.
    ///
    /// Oversized data is cut silently; providers never see more than
    /// [`MAX_EXTRA_DATA_LEN`] bytes.
    pub(crate) fn truncated(mut self) -> Self {
        self.extra_data.truncate(MAX_EXTRA_DATA_LEN);
        self
    }
}

/// An upstream node capable of producing a candidate artifact for a round.
///
/// Implementations must respect cancellation: the engine bounds every call
/// by the round's hard deadline and discards results arriving after it.
#[async_trait]
pub trait FetchProvider: Send + Sync {
    /// Artifact produced by a successful fetch.
    type Artifact: Send;

    async fn fetch(&self, request: &FetchRequest) -> anyhow::Result<Self::Artifact>;
}

/// An upstream node capable of accepting a submitted payload.
///
/// Submission is assumed idempotent: handing the same payload to several
/// providers, or to the same provider twice, must be safe.
#[async_trait]
pub trait SubmitProvider: Send + Sync {
    /// Payload accepted by this provider.
    type Payload: Payload;

    async fn submit(&self, payload: &Self::Payload) -> anyhow::Result<()>;
}

/// A payload that knows whether there is anything to submit.
///
/// Rounds with an empty payload fail before any network call.
pub trait Payload: Send + Sync + 'static {
    fn is_empty(&self) -> bool;
}

impl<T: Send + Sync + 'static> Payload for Vec<T> {
    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

/// Pure scoring function applied to each fetched artifact.
///
/// Higher is better; scores are assumed non-negative. Must be cheap enough
/// to run synchronously inside the per-provider task.
pub type ScoreFn<T> = Arc<dyn Fn(&T) -> f64 + Send + Sync>;

/// A named fetch provider handle, as registered from configuration.
pub type FetchHandle<T> = (ProviderId, Arc<dyn FetchProvider<Artifact = T>>);

/// A named submit provider handle, as registered from configuration.
pub type SubmitHandle<P> = (ProviderId, Arc<dyn SubmitProvider<Payload = P>>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_extra_data_is_truncated_silently() {
        let request = FetchRequest::new(42, vec![0xAB; 100]).truncated();
        assert_eq!(request.extra_data.len(), MAX_EXTRA_DATA_LEN);
    }

    #[test]
    fn short_extra_data_is_untouched() {
        let request = FetchRequest::new(42, b"duty client".to_vec()).truncated();
        assert_eq!(request.extra_data, b"duty client");
    }
}
