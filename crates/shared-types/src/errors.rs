//! # Error Types
//!
//! Errors raised while decoding claim fields.

use thiserror::Error;

/// Errors raised when a raw tag does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimFormatError {
    /// Attestation type tag is not in the claim-type table.
    #[error("Unknown attestation type tag: {0}")]
    UnknownAttestationType(u16),

    /// Chain id extracted from the instruction word is not supported.
    #[error("Unknown chain type: {0}")]
    UnknownChainType(u16),
}
