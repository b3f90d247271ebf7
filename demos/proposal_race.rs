//! Race-and-select walkthrough with simulated providers.
//!
//! Runs a series of fetch rounds against three simulated upstream nodes with
//! different latency and quality profiles, then prints the per-provider win
//! and error statistics plus the recorded score history for the last round.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use color_eyre::Result;
use quorum_duty_client::{
    FetchProvider, FetchRequest, MemoryScoreHistory, ProviderId, RaceConfig, RaceSelector,
    StatsMonitor,
};

const NUM_ROUNDS: u64 = 20;

/// Simulated upstream node: responds after `latency` with a payload whose
/// quality wobbles around `base_quality`.
struct SimulatedNode {
    latency: Duration,
    base_quality: f64,
}

#[async_trait]
impl FetchProvider for SimulatedNode {
    type Artifact = f64;

    async fn fetch(&self, request: &FetchRequest) -> anyhow::Result<f64> {
        tokio::time::sleep(self.latency).await;
        // Deterministic wobble so runs are reproducible.
        let wobble = ((request.slot % 7) as f64 - 3.0) / 100.0;
        Ok(self.base_quality + wobble)
    }
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
        (
            ProviderId("fast-mediocre"),
            Arc::new(SimulatedNode {
                latency: Duration::from_millis(15),
                base_quality: 0.55,
            }) as _,
        ),
        (
            ProviderId("slow-good"),
            Arc::new(SimulatedNode {
                latency: Duration::from_millis(60),
                base_quality: 0.90,
            }) as _,
        ),
        (
            ProviderId("dead"),
            Arc::new(SimulatedNode {
                latency: Duration::from_secs(10),
                base_quality: 1.0,
            }) as _,
        ),
    ];

    let monitor = Arc::new(StatsMonitor::new());
    let history = Arc::new(MemoryScoreHistory::new());

    let selector = RaceSelector::new(
        providers,
        RaceConfig {
            timeout: Duration::from_millis(200),
        },
        Arc::new(|quality: &f64| *quality),
    )
    .with_monitor(monitor.clone())
    .with_history(history.clone());

    let mut last_slot = 0;
    for slot in 1..=NUM_ROUNDS {
        let started = Instant::now();
        let best = selector
            .fetch(FetchRequest::new(slot, b"demo".to_vec()))
            .await?;
        println!(
            "[slot {slot:03}] winner={:<14} score={:.3} round_latency={:?}",
            best.provider.0,
            best.score,
            started.elapsed(),
        );
        last_slot = slot;
    }

    println!("\n=== provider stats ===");
    for (provider, stats) in monitor.snapshot() {
        println!(
            "provider {:>14}: successes = {:3}, failures = {:3}, avg_latency = {:8.3} ms",
            provider.0, stats.successes, stats.failures, stats.avg_latency_ms,
        );
    }

    println!("\n=== score history, slot {last_slot} ===");
    for record in history.scores_for_slot(last_slot) {
        println!(
            "provider {:>14}: score = {:.3}, duration = {:?}",
            record.provider.0, record.score, record.duration,
        );
    }

    Ok(())
}
