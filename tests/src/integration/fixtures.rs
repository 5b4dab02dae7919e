//! Claim builders shared by the integration flows.

use shared_types::{instructions_for_chain, AttestationClaim, AttestationType, ChainType};

/// A payment-proof claim whose content hash is its canonical digest, so the
/// runtime's digest validator accepts it.
pub fn valid_claim(
    timestamp: u64,
    block_number: u64,
    transaction_index: u32,
    signature: &[u8],
) -> AttestationClaim {
    let mut claim = AttestationClaim {
        attestation_type: AttestationType::PaymentProof.tag(),
        timestamp,
        block_number,
        transaction_index,
        signature: signature.to_vec(),
        instructions: instructions_for_chain(ChainType::Xrp),
        data_hash: [0; 32],
    };
    claim.data_hash = claim.canonical_digest();
    claim
}

/// Same as [`valid_claim`] but with a content hash that does not match.
pub fn tampered_claim(timestamp: u64, block_number: u64) -> AttestationClaim {
    let mut claim = valid_claim(timestamp, block_number, 0, b"tampered");
    claim.data_hash[0] ^= 0xFF;
    claim
}

/// Serialize claims as JSON lines.
pub fn json_lines(claims: &[AttestationClaim]) -> String {
    claims
        .iter()
        .map(|c| serde_json::to_string(c).expect("claim serializes"))
        .collect::<Vec<_>>()
        .join("\n")
}
