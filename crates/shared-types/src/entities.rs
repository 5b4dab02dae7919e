//! # Core Domain Entities
//!
//! Defines the attestation claim as received from the request source and the
//! small value types it is built from.
//!
//! ## Clusters
//!
//! - **Claim**: `AttestationClaim`, `AttestationType`, `ChainType`
//! - **Digests**: `Hash`, `keccak256`, `ZERO_HASH`

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use sha3::{Digest, Keccak256};

use crate::errors::ClaimFormatError;

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: DIGESTS
// =============================================================================

/// A 32-byte digest (Keccak-256).
pub type Hash = [u8; 32];

/// The all-zero word, used wherever a submission slot is intentionally empty.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Keccak-256 over arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Left-pad an unsigned integer into a 32-byte big-endian word.
fn word(value: u64) -> Hash {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

// =============================================================================
// CLUSTER B: CLAIM TYPE TABLE
// =============================================================================

/// Known attestation claim types.
///
/// The numeric tag is what travels in `AttestationClaim::attestation_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum AttestationType {
    /// Proof that a payment happened on a source chain.
    PaymentProof = 1,
    /// Proof that an address balance decreased.
    BalanceDecreasingProof = 2,
}

impl AttestationType {
    /// Raw wire tag.
    pub fn tag(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for AttestationType {
    type Error = ClaimFormatError;

    fn try_from(tag: u16) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::PaymentProof),
            2 => Ok(Self::BalanceDecreasingProof),
            other => Err(ClaimFormatError::UnknownAttestationType(other)),
        }
    }
}

impl std::str::FromStr for AttestationType {
    type Err = ClaimFormatError;

    /// Accepts either the variant name or the numeric tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PaymentProof" => Ok(Self::PaymentProof),
            "BalanceDecreasingProof" => Ok(Self::BalanceDecreasingProof),
            other => other
                .parse::<u16>()
                .map_err(|_| ClaimFormatError::UnknownAttestationType(0))
                .and_then(Self::try_from),
        }
    }
}

/// Source chains a payment proof can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum ChainType {
    Btc = 0,
    Ltc = 1,
    Doge = 2,
    Xrp = 3,
    Algo = 4,
}

impl ChainType {
    pub const ALL: [ChainType; 5] = [
        ChainType::Btc,
        ChainType::Ltc,
        ChainType::Doge,
        ChainType::Xrp,
        ChainType::Algo,
    ];
}

impl TryFrom<u16> for ChainType {
    type Error = ClaimFormatError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Btc),
            1 => Ok(Self::Ltc),
            2 => Ok(Self::Doge),
            3 => Ok(Self::Xrp),
            4 => Ok(Self::Algo),
            other => Err(ClaimFormatError::UnknownChainType(other)),
        }
    }
}

// =============================================================================
// CLUSTER C: THE CLAIM
// =============================================================================

/// An attestation request as emitted by the request source.
///
/// Immutable once received. `data_hash` is the content-hash id that ends up
/// as a Merkle leaf when the claim validates.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationClaim {
    /// Raw attestation type tag (see [`AttestationType`]).
    pub attestation_type: u16,
    /// Request time in seconds since the Unix epoch.
    pub timestamp: u64,
    /// Block number on the request chain.
    pub block_number: u64,
    /// Position of the request inside its block.
    pub transaction_index: u32,
    /// Raw signature bytes of the request transaction.
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
    /// Packed instruction word. Bits 16..32 (from the most significant end)
    /// carry the source chain id for payment proofs.
    pub instructions: U256,
    /// Content-hash id of the claim.
    #[serde_as(as = "Hex")]
    pub data_hash: Hash,
}

impl AttestationClaim {
    /// Request time scaled to milliseconds.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp.saturating_mul(1000)
    }

    /// Decode the attestation type tag.
    pub fn kind(&self) -> Result<AttestationType, ClaimFormatError> {
        AttestationType::try_from(self.attestation_type)
    }

    /// Raw source chain id packed into the instruction word.
    pub fn chain_id(&self) -> u16 {
        ((self.instructions >> 224).low_u32() & 0xFFFF) as u16
    }

    /// Decode the source chain of a payment proof.
    pub fn chain_type(&self) -> Result<ChainType, ClaimFormatError> {
        ChainType::try_from(self.chain_id())
    }

    /// Total order every participant applies before aggregation:
    /// block number, then transaction index, then raw signature bytes.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.block_number
            .cmp(&other.block_number)
            .then(self.transaction_index.cmp(&other.transaction_index))
            .then_with(|| self.signature.as_slice().cmp(other.signature.as_slice()))
    }

    /// Keccak-256 over the word-aligned encoding of the claim fields.
    ///
    /// Encoding: `type | timestamp | block_number | transaction_index |
    /// instructions | keccak256(signature)`, each a 32-byte big-endian word.
    pub fn canonical_digest(&self) -> Hash {
        let mut instructions = [0u8; 32];
        self.instructions.to_big_endian(&mut instructions);

        let mut encoded = Vec::with_capacity(6 * 32);
        encoded.extend_from_slice(&word(u64::from(self.attestation_type)));
        encoded.extend_from_slice(&word(self.timestamp));
        encoded.extend_from_slice(&word(self.block_number));
        encoded.extend_from_slice(&word(u64::from(self.transaction_index)));
        encoded.extend_from_slice(&instructions);
        encoded.extend_from_slice(&keccak256(&self.signature));
        keccak256(&encoded)
    }

    /// Short hex form of the content hash for log lines.
    pub fn short_id(&self) -> String {
        hex::encode(&self.data_hash[..8])
    }
}

/// Pack a chain id into an instruction word (bits 16..32 from the top).
pub fn instructions_for_chain(chain: ChainType) -> U256 {
    U256::from(chain as u16) << 224
}
