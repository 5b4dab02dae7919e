//! # Attestation Records
//!
//! A claim inside an epoch together with its validation status.
//!
//! Validation is asynchronous: a validator hands back a [`PendingAttestation`]
//! immediately and resolves it later through the paired
//! [`ValidationTicket`]. Resolution can happen at most once because the
//! ticket is consumed; a ticket dropped unresolved counts as `Invalid`.

use shared_types::AttestationClaim;
use tokio::sync::oneshot;

/// Validation status of a record. Leaves `Collecting` exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttestationStatus {
    Collecting,
    Valid,
    Invalid,
}

/// Final outcome of validating a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationVerdict {
    Valid,
    Invalid,
}

impl From<ValidationVerdict> for AttestationStatus {
    fn from(verdict: ValidationVerdict) -> Self {
        match verdict {
            ValidationVerdict::Valid => AttestationStatus::Valid,
            ValidationVerdict::Invalid => AttestationStatus::Invalid,
        }
    }
}

/// Write side of a pending validation.
#[derive(Debug)]
pub struct ValidationTicket {
    sender: oneshot::Sender<ValidationVerdict>,
}

impl ValidationTicket {
    /// Deliver the verdict. A record whose epoch is gone simply never hears it.
    pub fn resolve(self, verdict: ValidationVerdict) {
        let _ = self.sender.send(verdict);
    }
}

/// A claim whose validation outcome has not been observed yet.
#[derive(Debug)]
pub struct PendingAttestation {
    claim: AttestationClaim,
    outcome: oneshot::Receiver<ValidationVerdict>,
}

impl PendingAttestation {
    /// Create a pending record and the ticket that resolves it.
    pub fn new(claim: AttestationClaim) -> (Self, ValidationTicket) {
        let (sender, outcome) = oneshot::channel();
        (Self { claim, outcome }, ValidationTicket { sender })
    }

    /// A record whose verdict is already known.
    pub fn resolved(claim: AttestationClaim, verdict: ValidationVerdict) -> Self {
        let (pending, ticket) = Self::new(claim);
        ticket.resolve(verdict);
        pending
    }

    pub fn claim(&self) -> &AttestationClaim {
        &self.claim
    }

    pub(crate) fn into_parts(self) -> (AttestationClaim, oneshot::Receiver<ValidationVerdict>) {
        (self.claim, self.outcome)
    }
}

/// A claim held by an epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestationRecord {
    pub claim: AttestationClaim,
    pub status: AttestationStatus,
}

impl AttestationRecord {
    pub fn collecting(claim: AttestationClaim) -> Self {
        Self {
            claim,
            status: AttestationStatus::Collecting,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == AttestationStatus::Valid
    }
}
