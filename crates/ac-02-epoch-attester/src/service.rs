//! Epoch Registry - claim intake and epoch bookkeeping
//!
//! Maps each claim to its epoch, creates epochs lazily (arming their four
//! phase timers exactly once), dispatches validation by claim type and
//! evicts completed epochs after the retention window.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use ac_01_commitment::{MerkleProof, SaltSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{AttestationClaim, AttestationType, Hash};
use tracing::{debug, error, info, warn};

use crate::config::AttesterConfig;
use crate::domain::{
    AttesterEpoch, EpochCalendar, EpochContext, EpochId, EpochPhase, EpochSnapshot,
};
use crate::error::{AttesterError, AttesterResult};
use crate::metrics;
use crate::ports::inbound::{AttesterApi, ClaimDisposition};
use crate::ports::outbound::{
    AttestationSubmitter, ClaimValidator, PhaseAction, PhaseScheduler, PhaseTask, TimeSource,
};

/// Registry of live epochs.
///
/// Epochs are keyed by id in a `BTreeMap` so listings come out ordered.
pub struct EpochRegistry {
    config: AttesterConfig,
    ctx: Arc<EpochContext>,
    scheduler: Arc<dyn PhaseScheduler>,
    validators: HashMap<AttestationType, Arc<dyn ClaimValidator>>,
    epochs: RwLock<BTreeMap<EpochId, Arc<AttesterEpoch>>>,
}

impl EpochRegistry {
    pub fn new(
        config: AttesterConfig,
        submitter: Arc<dyn AttestationSubmitter>,
        salts: Arc<dyn SaltSource>,
        clock: Arc<dyn TimeSource>,
        scheduler: Arc<dyn PhaseScheduler>,
    ) -> AttesterResult<Self> {
        config.validate()?;
        let calendar = Arc::new(EpochCalendar::from_config(&config)?);
        Ok(Self {
            config,
            ctx: Arc::new(EpochContext {
                calendar,
                submitter,
                salts,
                clock,
            }),
            scheduler,
            validators: HashMap::new(),
            epochs: RwLock::new(BTreeMap::new()),
        })
    }

    /// Register the validator for a claim type.
    pub fn with_validator(mut self, kind: AttestationType, validator: Arc<dyn ClaimValidator>) -> Self {
        self.validators.insert(kind, validator);
        self
    }

    pub fn calendar(&self) -> &EpochCalendar {
        &self.ctx.calendar
    }

    /// Handle to a tracked epoch.
    pub fn epoch(&self, epoch_id: EpochId) -> Option<Arc<AttesterEpoch>> {
        self.epochs.read().get(&epoch_id).cloned()
    }

    /// Epoch for `epoch_id`, created and armed on first sight.
    fn resolve_epoch(&self, epoch_id: EpochId) -> Arc<AttesterEpoch> {
        if let Some(epoch) = self.epochs.read().get(&epoch_id) {
            return Arc::clone(epoch);
        }

        let (epoch, created) = {
            let mut epochs = self.epochs.write();
            // Re-check: another intake may have won the race
            match epochs.get(&epoch_id) {
                Some(epoch) => (Arc::clone(epoch), false),
                None => {
                    let epoch = Arc::new(AttesterEpoch::new(epoch_id, Arc::clone(&self.ctx)));
                    epochs.insert(epoch_id, Arc::clone(&epoch));
                    metrics::set_epochs_tracked(epochs.len());
                    (epoch, true)
                }
            }
        };

        if created {
            self.arm_timers(&epoch);
        }
        epoch
    }

    fn arm_timers(&self, epoch: &Arc<AttesterEpoch>) {
        let schedule = self.ctx.calendar.schedule(epoch.epoch_id());
        let reveal_at = schedule
            .reveal_phase_start_ms
            .saturating_add(self.config.reveal_delay_ms());

        info!(
            epoch_id = schedule.epoch_id,
            commit_at = schedule.commit_phase_start_ms,
            reveal_at,
            complete_at = schedule.completion_ms,
            "new epoch"
        );

        let arm = |at: u64, action: PhaseAction| {
            self.scheduler
                .schedule(at, PhaseTask::new(Arc::clone(epoch), action));
        };
        arm(schedule.commit_phase_start_ms, PhaseAction::EnterCommit);
        arm(schedule.reveal_phase_start_ms, PhaseAction::EnterReveal);
        arm(reveal_at, PhaseAction::Reveal);
        arm(schedule.completion_ms, PhaseAction::Complete);
    }

    /// Map a claim to its epoch and check the lateness rule.
    fn admit(&self, claim: &AttestationClaim, now_ms: u64) -> AttesterResult<EpochId> {
        let calendar = &self.ctx.calendar;
        let time_ms = claim.timestamp_ms();
        let epoch_id =
            calendar
                .epoch_id_for_time(time_ms)
                .ok_or(AttesterError::PredatesFirstEpoch {
                    time_ms,
                    first_epoch_start_ms: calendar.first_epoch_start_ms(),
                })?;

        let deadline_ms = calendar.commit_phase_start(epoch_id);
        if now_ms > deadline_ms {
            return Err(AttesterError::LateArrival {
                epoch_id,
                now_ms,
                deadline_ms,
            });
        }
        Ok(epoch_id)
    }

    /// Validator for the claim's type, honouring the ignore list.
    fn validator_for(
        &self,
        epoch_id: EpochId,
        claim: &AttestationClaim,
    ) -> AttesterResult<&Arc<dyn ClaimValidator>> {
        let tag = claim.attestation_type;
        let kind = claim
            .kind()
            .map_err(|_| AttesterError::UnsupportedClaimType { tag, epoch_id })?;
        if self.config.is_ignored(kind) {
            return Err(AttesterError::IgnoredClaimType { tag, epoch_id });
        }
        self.validators
            .get(&kind)
            .ok_or(AttesterError::UnsupportedClaimType { tag, epoch_id })
    }

    async fn dispatch(&self, claim: AttestationClaim) -> AttesterResult<(EpochId, usize)> {
        let now_ms = self.ctx.clock.now_ms();
        let epoch_id = self.admit(&claim, now_ms)?;

        let time_left_ms = self.ctx.calendar.commit_phase_start(epoch_id) - now_ms;
        debug!(epoch_id, claim = %claim.short_id(), time_left_ms, "claim admitted");

        let epoch = self.resolve_epoch(epoch_id);
        let validator = self.validator_for(epoch_id, &claim)?;

        let pending = validator
            .validate(epoch_id, claim)
            .await
            .map_err(|e| AttesterError::ValidatorFailed {
                epoch_id,
                reason: e.to_string(),
            })?
            .ok_or_else(|| AttesterError::ValidatorFailed {
                epoch_id,
                reason: "validator declined the claim".to_string(),
            })?;

        let index = epoch.add_record(pending)?;
        Ok((epoch_id, index))
    }

    fn disposition(err: AttesterError) -> ClaimDisposition {
        match err {
            AttesterError::LateArrival {
                epoch_id,
                now_ms,
                deadline_ms,
            } => {
                error!(epoch_id, now_ms, deadline_ms, "attestation timestamp too late");
                metrics::record_claim_rejected("late");
                ClaimDisposition::RejectedLate { epoch_id }
            }
            AttesterError::PredatesFirstEpoch { time_ms, .. } => {
                warn!(time_ms, "attestation predates first epoch");
                metrics::record_claim_rejected("early");
                ClaimDisposition::RejectedEarly
            }
            AttesterError::IgnoredClaimType { tag, epoch_id } => {
                debug!(epoch_id, tag, "attestation type ignored");
                metrics::record_claim_rejected("ignored");
                match AttestationType::try_from(tag) {
                    Ok(attestation_type) => ClaimDisposition::Ignored {
                        epoch_id,
                        attestation_type,
                    },
                    Err(_) => ClaimDisposition::Unsupported { epoch_id, tag },
                }
            }
            AttesterError::UnsupportedClaimType { tag, epoch_id } => {
                warn!(epoch_id, tag, "unsupported attestation type");
                metrics::record_claim_rejected("unsupported");
                ClaimDisposition::Unsupported { epoch_id, tag }
            }
            AttesterError::CollectionClosed { epoch_id, phase } => {
                warn!(epoch_id, %phase, "epoch no longer collecting");
                metrics::record_claim_rejected("closed");
                ClaimDisposition::Dropped {
                    epoch_id: Some(epoch_id),
                    reason: format!("epoch in {} phase", phase),
                }
            }
            other => {
                warn!(error = %other, "attestation dropped");
                metrics::record_claim_rejected("validator");
                ClaimDisposition::Dropped {
                    epoch_id: other.epoch_id(),
                    reason: other.to_string(),
                }
            }
        }
    }

    /// Evict completed epochs whose retention window has passed.
    fn evict_expired(&self, now_ms: u64) -> usize {
        let retention_ms = self.config.retention_ms();
        let calendar = &self.ctx.calendar;
        let mut epochs = self.epochs.write();
        let before = epochs.len();
        epochs.retain(|&epoch_id, epoch| {
            epoch.phase() != EpochPhase::Completed
                || now_ms < calendar.completion_time(epoch_id).saturating_add(retention_ms)
        });
        let evicted = before - epochs.len();
        if evicted > 0 {
            debug!(evicted, remaining = epochs.len(), "pruned completed epochs");
            metrics::set_epochs_tracked(epochs.len());
        }
        evicted
    }
}

#[async_trait]
impl AttesterApi for EpochRegistry {
    async fn submit_claim(&self, claim: AttestationClaim) -> ClaimDisposition {
        self.evict_expired(self.ctx.clock.now_ms());

        match self.dispatch(claim).await {
            Ok((epoch_id, index)) => {
                metrics::record_claim_accepted();
                ClaimDisposition::Accepted { epoch_id, index }
            }
            Err(e) => Self::disposition(e),
        }
    }

    fn epoch_snapshot(&self, epoch_id: EpochId) -> Option<EpochSnapshot> {
        self.epoch(epoch_id).map(|epoch| epoch.snapshot())
    }

    fn tracked_epochs(&self) -> Vec<EpochId> {
        self.epochs.read().keys().copied().collect()
    }

    fn inclusion_proof(&self, epoch_id: EpochId, data_hash: &Hash) -> Option<MerkleProof> {
        self.epoch(epoch_id)?.inclusion_proof(data_hash)
    }

    fn prune_completed(&self) -> usize {
        self.evict_expired(self.ctx.clock.now_ms())
    }
}
