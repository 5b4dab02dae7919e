//! # Attester Runtime
//!
//! Wires the epoch registry to its adapters and drives it.
//!
//! ## Modular Structure
//!
//! - `config` - defaults plus `AC_*` environment overrides
//! - `adapters` - digest validator and dry-run submitter
//! - `intake` - JSON-lines claim reader
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (from env)
//! 2. Validate it and build the registry
//! 3. Spawn the pruning loop
//! 4. Spawn the claim intake
//! 5. Run until Ctrl+C

pub mod adapters;
pub mod config;
pub mod intake;

use std::sync::Arc;

use ac_01_commitment::OsSaltSource;
use ac_02_epoch_attester::{
    AttesterApi, ChainValidatorRouter, ClaimValidator, EpochRegistry, PhaseSchedule,
    SystemTimeSource, TimeSource, TokioPhaseScheduler,
};
use anyhow::{Context, Result};
use shared_types::{AttestationType, ChainType};
use tokio::io::AsyncBufRead;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub use crate::adapters::{DigestValidator, LoggingSubmitter};
pub use crate::config::RuntimeConfig;
pub use crate::intake::{run_intake, IntakeStats};

/// The attester process: registry, adapters and background tasks.
pub struct AttesterRuntime {
    config: RuntimeConfig,
    registry: Arc<EpochRegistry>,
    submitter: Arc<LoggingSubmitter>,
    clock: Arc<dyn TimeSource>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl AttesterRuntime {
    /// Runtime on the wall clock.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Runtime on an injected clock. Timers are tokio timers, so the clock
    /// must advance with tokio time.
    pub fn with_clock(config: RuntimeConfig, clock: Arc<dyn TimeSource>) -> Result<Self> {
        let submitter = Arc::new(LoggingSubmitter::new());
        let scheduler = Arc::new(TokioPhaseScheduler::new(Arc::clone(&clock)));

        let router = ChainType::ALL.iter().fold(ChainValidatorRouter::new(), |router, chain| {
            router.with_chain(*chain, Arc::new(DigestValidator) as Arc<dyn ClaimValidator>)
        });

        let registry = EpochRegistry::new(
            config.attester.clone(),
            submitter.clone(),
            Arc::new(OsSaltSource),
            Arc::clone(&clock),
            scheduler,
        )
        .context("Invalid attester configuration")?
        .with_validator(AttestationType::PaymentProof, Arc::new(router));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            registry: Arc::new(registry),
            submitter,
            clock,
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<EpochRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn submitter(&self) -> Arc<LoggingSubmitter> {
        Arc::clone(&self.submitter)
    }

    /// Phase boundaries of the epoch containing the current time, `None`
    /// before the first epoch starts.
    pub fn current_schedule(&self) -> Option<PhaseSchedule> {
        let calendar = self.registry.calendar();
        calendar
            .epoch_id_for_time(self.clock.now_ms())
            .map(|epoch_id| calendar.schedule(epoch_id))
    }

    /// Periodically evict completed epochs until shutdown.
    pub fn spawn_pruner(&self) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        let mut shutdown = self.shutdown_rx.clone();
        let mut interval = tokio::time::interval(self.config.prune_interval());

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let evicted = registry.prune_completed();
                        if evicted > 0 {
                            debug!(evicted, "periodic prune");
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("[pruner] Shutdown signal received");
                        break;
                    }
                }
            }
        })
    }

    /// Feed claims from `reader` until EOF or shutdown.
    pub fn spawn_intake<R>(&self, reader: R) -> JoinHandle<IntakeStats>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let api: Arc<dyn AttesterApi> = self.registry.clone();
        let mut shutdown = self.shutdown_rx.clone();

        tokio::spawn(async move {
            tokio::select! {
                result = run_intake(reader, api) => match result {
                    Ok(stats) => stats,
                    Err(e) => {
                        error!("Claim intake failed: {}", e);
                        IntakeStats::default()
                    }
                },
                _ = shutdown.changed() => {
                    info!("[intake] Shutdown signal received");
                    IntakeStats::default()
                }
            }
        })
    }

    /// Signal every background task to stop.
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }
}
