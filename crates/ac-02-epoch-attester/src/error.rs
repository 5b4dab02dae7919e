//! Error types for the epoch attester
//!
//! One variant per failure class of the protocol. None of them is fatal to
//! the process: each is logged where it happens and costs at most one
//! epoch's commitment.

use crate::domain::{CommitStatus, EpochId, EpochPhase};
use thiserror::Error;

/// Epoch attester errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttesterError {
    /// Claim maps to an epoch already past its commit-phase start
    #[error("Attestation too late for epoch {epoch_id}: now {now_ms}ms > commit start {deadline_ms}ms")]
    LateArrival {
        epoch_id: EpochId,
        now_ms: u64,
        deadline_ms: u64,
    },

    /// Claim time lies before the first epoch
    #[error("Attestation time {time_ms}ms precedes first epoch start {first_epoch_start_ms}ms")]
    PredatesFirstEpoch {
        time_ms: u64,
        first_epoch_start_ms: u64,
    },

    /// No validator registered for the claim type
    #[error("Unsupported attestation type {tag} (epoch {epoch_id})")]
    UnsupportedClaimType { tag: u16, epoch_id: EpochId },

    /// Claim type is on the ignore list
    #[error("Attestation type {tag} ignored by policy (epoch {epoch_id})")]
    IgnoredClaimType { tag: u16, epoch_id: EpochId },

    /// Validator could not produce a record
    #[error("Validator failed for epoch {epoch_id}: {reason}")]
    ValidatorFailed { epoch_id: EpochId, reason: String },

    /// Record offered after the epoch left the collect phase
    #[error("Epoch {epoch_id} no longer collecting (phase {phase})")]
    CollectionClosed { epoch_id: EpochId, phase: EpochPhase },

    /// Nothing to commit
    #[error("Epoch {epoch_id} has no valid attestation ({total} attestation(s))")]
    EmptyValidSet { epoch_id: EpochId, total: usize },

    /// Commit or reveal invoked outside its phase/status window
    #[error("Epoch {epoch_id} cannot {operation} (phase {phase}, status {status})")]
    PhaseViolation {
        epoch_id: EpochId,
        operation: &'static str,
        phase: EpochPhase,
        status: CommitStatus,
    },

    /// Commit or reveal transaction failed
    #[error("Submission '{label}' failed: {reason}")]
    SubmissionFailed { label: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl AttesterError {
    /// Epoch the failure belongs to, when one was determined.
    pub fn epoch_id(&self) -> Option<EpochId> {
        match self {
            AttesterError::LateArrival { epoch_id, .. }
            | AttesterError::UnsupportedClaimType { epoch_id, .. }
            | AttesterError::IgnoredClaimType { epoch_id, .. }
            | AttesterError::ValidatorFailed { epoch_id, .. }
            | AttesterError::CollectionClosed { epoch_id, .. }
            | AttesterError::EmptyValidSet { epoch_id, .. }
            | AttesterError::PhaseViolation { epoch_id, .. } => Some(*epoch_id),
            AttesterError::PredatesFirstEpoch { .. }
            | AttesterError::SubmissionFailed { .. }
            | AttesterError::Config { .. } => None,
        }
    }
}

/// Result type for attester operations
pub type AttesterResult<T> = Result<T, AttesterError>;
