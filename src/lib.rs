//! Race-and-select and quorum fan-out engines for clients that talk to a set
//! of redundant, partially-unreliable upstream providers.
//!
//! Any single upstream may be slow, down, or return a suboptimal result, so
//! the client never trusts one source. On the read path, [`RaceSelector`]
//! queries every provider concurrently, scores each response, and returns the
//! best candidate under a soft/hard deadline budget. On the write path,
//! [`FanoutSubmitter`] pushes a payload to every provider under a bounded
//! concurrency limiter and succeeds as soon as any one of them accepts it.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use async_trait::async_trait;
//! use quorum_duty_client::{
//!     FetchProvider, FetchRequest, ProviderId, RaceConfig, RaceSelector,
//! };
//!
//! struct UpstreamNode {
//!     endpoint: String,
//! }
//!
//! #[async_trait]
//! impl FetchProvider for UpstreamNode {
//!     type Artifact = Vec<u8>;
//!
//!     async fn fetch(&self, request: &FetchRequest) -> anyhow::Result<Vec<u8>> {
//!         // Ask self.endpoint for a candidate targeting request.slot.
//!         # let _ = request;
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let providers = vec![
//!     (
//!         ProviderId("node-a"),
//!         Arc::new(UpstreamNode { endpoint: "http://a:5052".into() }) as _,
//!     ),
//!     (
//!         ProviderId("node-b"),
//!         Arc::new(UpstreamNode { endpoint: "http://b:5052".into() }) as _,
//!     ),
//! ];
//!
//! let selector = RaceSelector::new(
//!     providers,
//!     RaceConfig::for_slot_interval(Duration::from_secs(12)),
//!     Arc::new(|artifact: &Vec<u8>| artifact.len() as f64),
//! );
//!
//! let best = selector.fetch(FetchRequest::new(12345, b"duty".to_vec())).await?;
//! println!("best candidate from {} (score {})", best.provider, best.score);
//! # Ok(())
//! # }
//! ```
//!
//! # Round Semantics
//!
//! A fetch round runs one task per provider and drains their results until
//! every provider is accounted for:
//! 1. At the soft deadline (half the budget), the round short-circuits if it
//!    already holds at least one candidate.
//! 2. At the hard deadline it terminates unconditionally.
//! 3. Equal top scores resolve to whichever candidate arrived first.
//! 4. Per-provider failures are logged and tallied, never fatal to the round.
//!
//! A submission round resolves on the first acceptance and fails only after
//! the full timeout with zero acceptances; stragglers keep running detached,
//! observable through the [`OperationMonitor`].

pub mod config;
pub mod errors;
pub mod history;
pub mod monitor;
pub mod provider;
pub mod race;
pub mod submit;

pub use config::{ProviderId, RaceConfig, SubmitConfig, MAX_EXTRA_DATA_LEN};
pub use errors::DutyError;
pub use history::{MemoryScoreHistory, NullScoreHistory, ScoreHistoryStore, ScoreRecord};
pub use monitor::{NullMonitor, OperationMonitor, ProviderStatsSnapshot, StatsMonitor};
pub use provider::{
    FetchHandle, FetchProvider, FetchRequest, Payload, ScoreFn, SubmitHandle, SubmitProvider,
};
pub use race::{Candidate, RaceSelector, Tally};
pub use submit::FanoutSubmitter;
