//! # Attester Runtime
//!
//! Entry point: reads attestation claims as JSON lines on stdin, runs the
//! commit-reveal protocol per epoch and logs every submission.
//!
//! ```text
//! stdin ──JSON lines──→ intake ──→ EpochRegistry ──→ AttesterEpoch (per epoch)
//!                                                        │
//!                                       commit / reveal  ↓
//!                                                  LoggingSubmitter
//! ```

use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use attester_runtime::{AttesterRuntime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = RuntimeConfig::from_env();
    info!(
        first_epoch_start = config.attester.first_epoch_start_secs,
        period = config.attester.epoch_period_secs,
        reveal_delay = config.attester.reveal_delay_secs,
        retention = config.attester.retention_secs,
        "Attester configuration loaded"
    );

    let runtime = AttesterRuntime::new(config)?;
    match runtime.current_schedule() {
        Some(schedule) => info!(
            epoch_id = schedule.epoch_id,
            commit_at_ms = schedule.commit_phase_start_ms,
            reveal_at_ms = schedule.reveal_phase_start_ms,
            complete_at_ms = schedule.completion_ms,
            "Current epoch"
        ),
        None => info!("First epoch has not started yet"),
    }
    let _pruner = runtime.spawn_pruner();
    let intake = runtime.spawn_intake(BufReader::new(tokio::io::stdin()));

    info!("Attester is running. Press Ctrl+C to stop.");
    tokio::select! {
        stats = intake => {
            let stats = stats?;
            info!(?stats, "stdin closed");
            // Let pending epochs finish their cycle
            tokio::signal::ctrl_c().await?;
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    runtime.shutdown();
    Ok(())
}
