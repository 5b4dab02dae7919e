//! Driving Ports (API - Inbound)

use ac_01_commitment::MerkleProof;
use async_trait::async_trait;
use shared_types::{AttestationClaim, AttestationType, Hash};

use crate::domain::{EpochId, EpochSnapshot};

/// What happened to a submitted claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimDisposition {
    /// Handed to the epoch; the verdict is still pending
    Accepted { epoch_id: EpochId, index: usize },
    /// Epoch already past its commit-phase start
    RejectedLate { epoch_id: EpochId },
    /// Claim time before the first epoch
    RejectedEarly,
    /// Type is on the ignore list
    Ignored {
        epoch_id: EpochId,
        attestation_type: AttestationType,
    },
    /// No validator for the type tag
    Unsupported { epoch_id: EpochId, tag: u16 },
    /// Validator failed or declined, or the epoch stopped collecting
    Dropped {
        epoch_id: Option<EpochId>,
        reason: String,
    },
}

impl ClaimDisposition {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ClaimDisposition::Accepted { .. })
    }

    pub fn epoch_id(&self) -> Option<EpochId> {
        match self {
            ClaimDisposition::Accepted { epoch_id, .. }
            | ClaimDisposition::RejectedLate { epoch_id }
            | ClaimDisposition::Ignored { epoch_id, .. }
            | ClaimDisposition::Unsupported { epoch_id, .. } => Some(*epoch_id),
            ClaimDisposition::Dropped { epoch_id, .. } => *epoch_id,
            ClaimDisposition::RejectedEarly => None,
        }
    }
}

/// Attester API
#[async_trait]
pub trait AttesterApi: Send + Sync {
    /// Route a claim to its epoch.
    async fn submit_claim(&self, claim: AttestationClaim) -> ClaimDisposition;

    /// Current view of an epoch, if tracked.
    fn epoch_snapshot(&self, epoch_id: EpochId) -> Option<EpochSnapshot>;

    /// Tracked epoch ids, ascending.
    fn tracked_epochs(&self) -> Vec<EpochId>;

    /// Inclusion proof for a committed id.
    fn inclusion_proof(&self, epoch_id: EpochId, data_hash: &Hash) -> Option<MerkleProof>;

    /// Evict completed epochs past retention. Returns how many were dropped.
    fn prune_completed(&self) -> usize;
}
