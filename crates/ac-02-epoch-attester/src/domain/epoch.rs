//! # Epoch State Machine
//!
//! One `AttesterEpoch` per epoch id. It collects records during the collect
//! phase, aggregates the valid ones into a masked Merkle root during commit
//! and publishes the salt during reveal.
//!
//! ```text
//!  phase:   Collect ──→ Commit ──→ Reveal ──→ Completed
//!
//!  status:  Collecting ──→ Committing ──→ Committed ──→ Revealed
//!                │              │              │
//!                └──────────────┴──────────────┴──→ Error
//! ```
//!
//! Phase changes are driven by timers armed by the registry. The commit
//! fires at whichever comes last: entry into the commit phase, or the
//! final validation verdict.
//!
//! ## Locking
//!
//! State sits behind a `parking_lot::Mutex` that is never held across an
//! await. Submissions are built under the lock, the lock is dropped, then the
//! submission is awaited and the outcome written back.

use std::fmt;
use std::sync::Arc;

use ac_01_commitment::{mask_root, MerkleProof, MerkleTree, Salt, SaltSource};
use parking_lot::Mutex;
use shared_types::Hash;
use tracing::{debug, error, info, warn};

use super::calendar::{EpochCalendar, EpochId};
use super::record::{AttestationRecord, AttestationStatus, PendingAttestation, ValidationVerdict};
use crate::error::{AttesterError, AttesterResult};
use crate::metrics;
use crate::ports::outbound::{AttestationSubmission, AttestationSubmitter, TimeSource};

/// Position of an epoch on the calendar. Only ever moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EpochPhase {
    Collect,
    Commit,
    Reveal,
    Completed,
}

impl fmt::Display for EpochPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EpochPhase::Collect => "collect",
            EpochPhase::Commit => "commit",
            EpochPhase::Reveal => "reveal",
            EpochPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Progress of the commit-reveal protocol for an epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommitStatus {
    Collecting,
    Committing,
    Committed,
    Revealed,
    Error,
}

impl fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitStatus::Collecting => "collecting",
            CommitStatus::Committing => "committing",
            CommitStatus::Committed => "committed",
            CommitStatus::Revealed => "revealed",
            CommitStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// Collaborators shared by every epoch of a registry.
pub struct EpochContext {
    pub calendar: Arc<EpochCalendar>,
    pub submitter: Arc<dyn AttestationSubmitter>,
    pub salts: Arc<dyn SaltSource>,
    pub clock: Arc<dyn TimeSource>,
}

/// Read-only view of an epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EpochSnapshot {
    pub epoch_id: EpochId,
    pub phase: EpochPhase,
    pub commit_status: CommitStatus,
    pub total_records: usize,
    pub processed_records: usize,
    pub valid_records: usize,
    /// Unmasked root, known once the commit was built
    pub root: Option<Hash>,
    /// `keccak256(salt)`, known once the commit was built
    pub committed_salt_hash: Option<Hash>,
}

struct EpochState {
    phase: EpochPhase,
    commit_status: CommitStatus,
    records: Vec<AttestationRecord>,
    processed: usize,
    tree: Option<MerkleTree>,
    salt: Option<Salt>,
}

impl EpochState {
    fn new() -> Self {
        Self {
            phase: EpochPhase::Collect,
            commit_status: CommitStatus::Collecting,
            records: Vec::new(),
            processed: 0,
            tree: None,
            salt: None,
        }
    }

    fn all_processed(&self) -> bool {
        self.processed == self.records.len()
    }

    fn violation(&self, epoch_id: EpochId, operation: &'static str) -> AttesterError {
        AttesterError::PhaseViolation {
            epoch_id,
            operation,
            phase: self.phase,
            status: self.commit_status,
        }
    }
}

/// Per-epoch commit-reveal state machine.
pub struct AttesterEpoch {
    epoch_id: EpochId,
    ctx: Arc<EpochContext>,
    state: Mutex<EpochState>,
}

impl AttesterEpoch {
    pub fn new(epoch_id: EpochId, ctx: Arc<EpochContext>) -> Self {
        Self {
            epoch_id,
            ctx,
            state: Mutex::new(EpochState::new()),
        }
    }

    pub fn epoch_id(&self) -> EpochId {
        self.epoch_id
    }

    pub fn phase(&self) -> EpochPhase {
        self.state.lock().phase
    }

    pub fn commit_status(&self) -> CommitStatus {
        self.state.lock().commit_status
    }

    /// Append a record and start waiting for its verdict.
    ///
    /// Only allowed while collecting. Returns the record's index.
    pub fn add_record(self: &Arc<Self>, pending: PendingAttestation) -> AttesterResult<usize> {
        let (claim, outcome) = pending.into_parts();
        let index = {
            let mut state = self.state.lock();
            if state.phase != EpochPhase::Collect {
                return Err(AttesterError::CollectionClosed {
                    epoch_id: self.epoch_id,
                    phase: state.phase,
                });
            }
            state.records.push(AttestationRecord::collecting(claim));
            state.records.len() - 1
        };

        let epoch = Arc::clone(self);
        tokio::spawn(async move {
            let verdict = match outcome.await {
                Ok(verdict) => verdict,
                Err(_) => {
                    warn!(
                        epoch_id = epoch.epoch_id,
                        index, "validation ticket dropped, treating as invalid"
                    );
                    ValidationVerdict::Invalid
                }
            };
            epoch.processed(index, verdict).await;
        });

        Ok(index)
    }

    /// Record a verdict; commits if this was the last outstanding one and
    /// the commit phase has already started.
    async fn processed(&self, index: usize, verdict: ValidationVerdict) {
        let (ready, phase) = {
            let mut state = self.state.lock();
            let Some(record) = state.records.get_mut(index) else {
                error!(epoch_id = self.epoch_id, index, "verdict for unknown record");
                return;
            };
            if record.status != AttestationStatus::Collecting {
                error!(epoch_id = self.epoch_id, index, "record processed twice");
                return;
            }
            record.status = verdict.into();
            state.processed += 1;
            debug_assert!(state.processed <= state.records.len());
            (
                state.all_processed() && state.commit_status == CommitStatus::Collecting,
                state.phase,
            )
        };

        if !ready {
            return;
        }
        match phase {
            EpochPhase::Commit => {
                info!(epoch_id = self.epoch_id, "all attestations processed, committing");
                self.commit_and_report().await;
            }
            EpochPhase::Collect => {
                debug!(epoch_id = self.epoch_id, "all attestations processed, waiting for commit phase");
            }
            _ => {}
        }
    }

    /// Enter the commit phase; commits immediately if nothing is pending.
    pub async fn enter_commit_phase(&self) {
        let ready = {
            let mut state = self.state.lock();
            if state.phase != EpochPhase::Collect {
                return;
            }
            state.phase = EpochPhase::Commit;
            state.all_processed()
        };
        debug!(epoch_id = self.epoch_id, ready, "entered commit phase");
        if ready {
            self.commit_and_report().await;
        }
    }

    pub fn enter_reveal_phase(&self) {
        let mut state = self.state.lock();
        if state.phase < EpochPhase::Reveal {
            state.phase = EpochPhase::Reveal;
            debug!(epoch_id = self.epoch_id, "entered reveal phase");
        }
    }

    pub fn mark_completed(&self) {
        self.state.lock().phase = EpochPhase::Completed;
        debug!(epoch_id = self.epoch_id, "epoch completed");
    }

    /// Aggregate the valid records and submit the masked root.
    ///
    /// Returns the unmasked root on success. Any call outside
    /// (commit phase, collecting) is a no-op returning `PhaseViolation`.
    pub async fn commit(&self) -> AttesterResult<Hash> {
        let (submission, root) = {
            let mut state = self.state.lock();
            if state.phase != EpochPhase::Commit || state.commit_status != CommitStatus::Collecting
            {
                return Err(state.violation(self.epoch_id, "commit"));
            }

            let mut valid: Vec<&AttestationRecord> =
                state.records.iter().filter(|r| r.is_valid()).collect();
            if valid.is_empty() {
                state.commit_status = CommitStatus::Error;
                metrics::record_empty_epoch();
                return Err(AttesterError::EmptyValidSet {
                    epoch_id: self.epoch_id,
                    total: state.records.len(),
                });
            }

            valid.sort_by(|a, b| a.claim.canonical_cmp(&b.claim));
            let ids: Vec<Hash> = valid.iter().map(|r| r.claim.data_hash).collect();
            let tree = MerkleTree::build(ids);
            let root = tree.root();

            let salt = self.ctx.salts.next_salt();
            let submission = AttestationSubmission::commit(
                self.epoch_id,
                mask_root(&root, &salt),
                salt.commitment(),
            );

            state.tree = Some(tree);
            state.salt = Some(salt);
            state.commit_status = CommitStatus::Committing;
            (submission, root)
        };

        let now = self.ctx.clock.now_ms();
        let deadline = self.ctx.calendar.commit_phase_end(self.epoch_id);
        info!(
            epoch_id = self.epoch_id,
            time_left_ms = deadline as i64 - now as i64,
            "{}",
            submission.label
        );

        let label = submission.label.clone();
        let outcome = self.ctx.submitter.submit_attestation(submission).await;

        let mut state = self.state.lock();
        match outcome {
            Ok(receipt) => {
                state.commit_status = CommitStatus::Committed;
                metrics::record_commit(true);
                info!(
                    epoch_id = self.epoch_id,
                    root = %hex::encode(root),
                    receipt = %receipt,
                    "commit submitted"
                );
                Ok(root)
            }
            Err(e) => {
                state.commit_status = CommitStatus::Error;
                metrics::record_commit(false);
                Err(AttesterError::SubmissionFailed {
                    label,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Publish the salt of a committed epoch.
    pub async fn reveal(&self) -> AttesterResult<()> {
        let submission = {
            let state = self.state.lock();
            if state.phase != EpochPhase::Reveal || state.commit_status != CommitStatus::Committed {
                return Err(state.violation(self.epoch_id, "reveal"));
            }
            let Some(salt) = state.salt.as_ref() else {
                return Err(state.violation(self.epoch_id, "reveal"));
            };
            AttestationSubmission::reveal(self.epoch_id, salt.expose())
        };

        let label = submission.label.clone();
        let outcome = self.ctx.submitter.submit_attestation(submission).await;

        let mut state = self.state.lock();
        match outcome {
            Ok(receipt) => {
                state.commit_status = CommitStatus::Revealed;
                metrics::record_reveal(true);
                info!(epoch_id = self.epoch_id, receipt = %receipt, "reveal submitted");
                Ok(())
            }
            Err(e) => {
                state.commit_status = CommitStatus::Error;
                metrics::record_reveal(false);
                Err(AttesterError::SubmissionFailed {
                    label,
                    reason: e.to_string(),
                })
            }
        }
    }

    pub(crate) async fn commit_and_report(&self) {
        if let Err(e) = self.commit().await {
            report(&e);
        }
    }

    pub(crate) async fn reveal_and_report(&self) {
        if let Err(e) = self.reveal().await {
            report(&e);
        }
    }

    pub fn snapshot(&self) -> EpochSnapshot {
        let state = self.state.lock();
        EpochSnapshot {
            epoch_id: self.epoch_id,
            phase: state.phase,
            commit_status: state.commit_status,
            total_records: state.records.len(),
            processed_records: state.processed,
            valid_records: state.records.iter().filter(|r| r.is_valid()).count(),
            root: state.tree.as_ref().map(MerkleTree::root),
            committed_salt_hash: state.salt.as_ref().map(Salt::commitment),
        }
    }

    /// Records in arrival order.
    pub fn records(&self) -> Vec<AttestationRecord> {
        self.state.lock().records.clone()
    }

    /// Inclusion proof of `data_hash` in the committed root.
    pub fn inclusion_proof(&self, data_hash: &Hash) -> Option<MerkleProof> {
        let state = self.state.lock();
        state.tree.as_ref()?.proof_for(data_hash).ok()
    }
}

/// Log an epoch-level failure at the level it deserves.
pub(crate) fn report(err: &AttesterError) {
    match err {
        AttesterError::EmptyValidSet { epoch_id, total } => {
            error!(epoch_id, total, "no valid attestation");
        }
        AttesterError::PhaseViolation { epoch_id, operation, phase, status } => {
            error!(epoch_id, %phase, %status, "cannot {} (wrong epoch status)", operation);
        }
        other => error!(error = %other, "epoch operation failed"),
    }
}
