//! Quorum fan-out submission walkthrough.
//!
//! Submits a payload to five simulated upstream nodes under a concurrency
//! limiter of two. The round resolves on the first acceptance; the remaining
//! submissions finish in the background and show up in the monitor snapshot
//! printed at the end.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use color_eyre::Result;
use quorum_duty_client::{
    FanoutSubmitter, ProviderId, StatsMonitor, SubmitConfig, SubmitProvider,
};

/// Simulated submit endpoint: accepts or rejects after `latency`.
struct SimulatedEndpoint {
    latency: Duration,
    accepts: bool,
}

#[async_trait]
impl SubmitProvider for SimulatedEndpoint {
    type Payload = Vec<u8>;

    async fn submit(&self, _payload: &Vec<u8>) -> anyhow::Result<()> {
        tokio::time::sleep(self.latency).await;
        if self.accepts {
            Ok(())
        } else {
            anyhow::bail!("payload rejected")
        }
    }
}

fn endpoint(latency_ms: u64, accepts: bool) -> Arc<SimulatedEndpoint> {
    Arc::new(SimulatedEndpoint {
        latency: Duration::from_millis(latency_ms),
        accepts,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let providers = vec![
        (ProviderId("flaky"), endpoint(10, false) as _),
        (ProviderId("steady"), endpoint(40, true) as _),
        (ProviderId("slow"), endpoint(120, true) as _),
        (ProviderId("slower"), endpoint(200, true) as _),
        (ProviderId("dead"), endpoint(5_000, true) as _),
    ];

    let monitor = Arc::new(StatsMonitor::new());
    let submitter = FanoutSubmitter::new(
        providers,
        SubmitConfig {
            timeout: Duration::from_secs(1),
            concurrency: 2,
        },
    )
    .with_monitor(monitor.clone());

    let payload = b"signed duty payload".to_vec();

    let started = Instant::now();
    match submitter.submit(payload).await {
        Ok(provider) => println!(
            "accepted by {} after {:?}; stragglers still running",
            provider.0,
            started.elapsed(),
        ),
        Err(err) => println!("round failed after {:?}: {err}", started.elapsed()),
    }

    // Give the detached submissions time to drain through the limiter.
    tokio::time::sleep(Duration::from_millis(600)).await;

    println!("\n=== provider stats ===");
    for (provider, stats) in monitor.snapshot() {
        println!(
            "provider {:>8}: successes = {:3}, failures = {:3}, avg_latency = {:8.3} ms",
            provider.0, stats.successes, stats.failures, stats.avg_latency_ms,
        );
    }

    Ok(())
}
