//! Driven Ports (SPI - Outbound Dependencies)

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{AttestationClaim, Hash, ZERO_HASH};
use thiserror::Error;

use crate::domain::{AttesterEpoch, EpochId, PendingAttestation};

// =============================================================================
// VALIDATION
// =============================================================================

/// Validator failures. Each costs the claim, never the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("No validator for source chain {chain_id}")]
    UnsupportedChain { chain_id: u16 },

    #[error("Validator unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Checks a claim against its source chain.
///
/// Returns a pending record immediately; the verdict arrives later through
/// the record's ticket. `Ok(None)` means the validator declined the claim.
#[async_trait]
pub trait ClaimValidator: Send + Sync {
    async fn validate(
        &self,
        epoch_id: EpochId,
        claim: AttestationClaim,
    ) -> Result<Option<PendingAttestation>, ValidatorError>;
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// One call to the attestation contract.
///
/// Commit: `(epoch + 1, root XOR salt, keccak256(salt), 0)`.
/// Reveal: `(epoch + 2, 0, 0, salt)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestationSubmission {
    /// Human-readable label used in logs
    pub label: String,
    pub buffer_number: u64,
    pub masked_root: Hash,
    pub committed_salt_hash: Hash,
    pub revealed_salt: Hash,
}

/// Which half of the protocol a submission belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionKind {
    Commit,
    Reveal,
}

impl AttestationSubmission {
    pub fn commit(epoch_id: EpochId, masked_root: Hash, committed_salt_hash: Hash) -> Self {
        Self {
            label: format!("commitAttestation #{}", epoch_id),
            buffer_number: epoch_id + 1,
            masked_root,
            committed_salt_hash,
            revealed_salt: ZERO_HASH,
        }
    }

    pub fn reveal(epoch_id: EpochId, salt: Hash) -> Self {
        Self {
            label: format!("revealAttestation #{}", epoch_id),
            buffer_number: epoch_id + 2,
            masked_root: ZERO_HASH,
            committed_salt_hash: ZERO_HASH,
            revealed_salt: salt,
        }
    }

    pub fn kind(&self) -> SubmissionKind {
        if self.revealed_salt == ZERO_HASH {
            SubmissionKind::Commit
        } else {
            SubmissionKind::Reveal
        }
    }
}

/// Acknowledgement of an accepted submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub transaction_id: Hash,
}

impl SubmissionReceipt {
    pub fn new(transaction_id: Hash) -> Self {
        Self { transaction_id }
    }
}

impl fmt::Display for SubmissionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.transaction_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Submission rejected: {reason}")]
    Rejected { reason: String },

    #[error("Transport error: {reason}")]
    Transport { reason: String },
}

/// Sends commit and reveal transactions.
#[async_trait]
pub trait AttestationSubmitter: Send + Sync {
    async fn submit_attestation(
        &self,
        submission: AttestationSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError>;
}

// =============================================================================
// TIME
// =============================================================================

/// Wall clock in milliseconds since the Unix epoch.
pub trait TimeSource: Send + Sync {
    fn now_ms(&self) -> u64;
}

// =============================================================================
// SCHEDULING
// =============================================================================

/// Phase transition an armed timer performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseAction {
    EnterCommit,
    EnterReveal,
    Reveal,
    Complete,
}

/// A phase transition bound to its epoch.
#[derive(Clone)]
pub struct PhaseTask {
    pub epoch: Arc<AttesterEpoch>,
    pub action: PhaseAction,
}

impl fmt::Debug for PhaseTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseTask")
            .field("epoch_id", &self.epoch.epoch_id())
            .field("action", &self.action)
            .finish()
    }
}

impl PhaseTask {
    pub fn new(epoch: Arc<AttesterEpoch>, action: PhaseAction) -> Self {
        Self { epoch, action }
    }

    /// Perform the transition. Failures are logged, never propagated.
    pub async fn run(self) {
        match self.action {
            PhaseAction::EnterCommit => self.epoch.enter_commit_phase().await,
            PhaseAction::EnterReveal => self.epoch.enter_reveal_phase(),
            PhaseAction::Reveal => {
                // A zero reveal delay fires together with EnterReveal
                self.epoch.enter_reveal_phase();
                self.epoch.reveal_and_report().await
            }
            PhaseAction::Complete => self.epoch.mark_completed(),
        }
    }
}

/// Runs phase tasks at absolute times.
///
/// Tasks sharing a fire time run in the order they were scheduled.
pub trait PhaseScheduler: Send + Sync {
    fn schedule(&self, fire_at_ms: u64, task: PhaseTask);
}
