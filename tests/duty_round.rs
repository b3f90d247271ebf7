//! End-to-end duty round: race-select the best candidate from redundant
//! fetch providers, then fan the resulting payload out to redundant submit
//! providers.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use quorum_duty_client::{
    FanoutSubmitter, FetchProvider, FetchRequest, MemoryScoreHistory, ProviderId, RaceConfig,
    RaceSelector, StatsMonitor, SubmitConfig, SubmitProvider,
};

/// A node that both serves candidates and accepts submissions, tracking how
/// many payloads it received.
struct Node {
    fetch_latency: Duration,
    quality: f64,
    submit_latency: Duration,
    received: AtomicUsize,
}

impl Node {
    fn new(fetch_latency_ms: u64, quality: f64, submit_latency_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            fetch_latency: Duration::from_millis(fetch_latency_ms),
            quality,
            submit_latency: Duration::from_millis(submit_latency_ms),
            received: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl FetchProvider for Node {
    type Artifact = Vec<u8>;

    async fn fetch(&self, request: &FetchRequest) -> anyhow::Result<Vec<u8>> {
        tokio::time::sleep(self.fetch_latency).await;
        let mut artifact = request.slot.to_be_bytes().to_vec();
        artifact.push((self.quality * 100.0) as u8);
        Ok(artifact)
    }
}

#[async_trait]
impl SubmitProvider for Node {
    type Payload = Vec<u8>;

    async fn submit(&self, _payload: &Vec<u8>) -> anyhow::Result<()> {
        tokio::time::sleep(self.submit_latency).await;
        self.received.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn full_round_selects_best_and_submits_to_first_acceptor() {
    let node_a = Node::new(10, 0.50, 30);
    let node_b = Node::new(25, 0.92, 8);
    let node_c = Node::new(2_000, 0.99, 2_000); // effectively down

    let monitor = Arc::new(StatsMonitor::new());
    let history = Arc::new(MemoryScoreHistory::new());

    let selector = RaceSelector::new(
        vec![
            (ProviderId("a"), node_a.clone() as _),
            (ProviderId("b"), node_b.clone() as _),
            (ProviderId("c"), node_c.clone() as _),
        ],
        RaceConfig {
            timeout: Duration::from_millis(200),
        },
        // Quality byte appended by the node, scaled back down.
        Arc::new(|artifact: &Vec<u8>| f64::from(*artifact.last().unwrap_or(&0)) / 100.0),
    )
    .with_monitor(monitor.clone())
    .with_history(history.clone());

    let best = selector
        .fetch(FetchRequest::new(777, b"integration".to_vec()))
        .await
        .unwrap();
    assert_eq!(best.provider, ProviderId("b"));

    // Both live nodes were scored and recorded; the dead one never made it.
    assert_eq!(history.scores_for_slot(777).len(), 2);

    let submitter = FanoutSubmitter::new(
        vec![
            (ProviderId("a"), node_a.clone() as _),
            (ProviderId("b"), node_b.clone() as _),
            (ProviderId("c"), node_c.clone() as _),
        ],
        SubmitConfig {
            timeout: Duration::from_millis(300),
            concurrency: 3,
        },
    )
    .with_monitor(monitor.clone());

    let accepted = submitter.submit(best.artifact).await.unwrap();
    assert_eq!(accepted, ProviderId("b"));

    // Idempotent fan-out: the slower live node still receives the payload
    // in the background.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(node_a.received.load(Ordering::SeqCst), 1);
    assert_eq!(node_b.received.load(Ordering::SeqCst), 1);
}
