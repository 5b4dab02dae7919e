//! # Digest Validator
//!
//! Stand-in for a chain verifier: a claim is valid iff its declared content
//! hash equals the canonical digest of its fields.
//!
//! The verdict is delivered from a spawned task, so records go through the
//! same pending-then-resolved path a networked verifier would use.

use ac_02_epoch_attester::{
    ClaimValidator, EpochId, PendingAttestation, ValidationVerdict, ValidatorError,
};
use async_trait::async_trait;
use shared_types::AttestationClaim;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct DigestValidator;

impl DigestValidator {
    pub fn verdict(claim: &AttestationClaim) -> ValidationVerdict {
        if claim.canonical_digest() == claim.data_hash {
            ValidationVerdict::Valid
        } else {
            ValidationVerdict::Invalid
        }
    }
}

#[async_trait]
impl ClaimValidator for DigestValidator {
    async fn validate(
        &self,
        epoch_id: EpochId,
        claim: AttestationClaim,
    ) -> Result<Option<PendingAttestation>, ValidatorError> {
        let verdict = Self::verdict(&claim);
        debug!(epoch_id, claim = %claim.short_id(), ?verdict, "digest checked");

        let (pending, ticket) = PendingAttestation::new(claim);
        tokio::spawn(async move {
            ticket.resolve(verdict);
        });
        Ok(Some(pending))
    }
}
