//! # Commitment Builder (ac-01)
//!
//! Deterministic aggregation of validated attestation ids into a single
//! Merkle root, plus the salt machinery of the commit-reveal protocol.
//!
//! ## Responsibilities
//!
//! - Build a binary Keccak-256 Merkle tree over an already-sorted id list
//! - Generate and verify per-leaf inclusion proofs
//! - Draw a uniformly random 256-bit salt from the OS CSPRNG
//! - Mask a root with its salt and commit to the salt by hash
//!
//! ## Commit-Reveal Layout
//!
//! ```text
//!   collect (N)        commit (N+1)                     reveal (N+2)
//!   ───────────  ───────────────────────────────  ──────────────────────
//!   gather ids   submit(root ^ salt, keccak(salt))  submit(salt)
//!                                                     │
//!                       observers: keccak(salt) ?= commitment,
//!                                  root = masked ^ salt
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | INVARIANT-1 | Deterministic root | Same ordered ids always yield the same root |
//! | INVARIANT-2 | Proof validity | Every generated proof verifies against its root |
//! | INVARIANT-3 | Odd node carry | An unpaired node moves up a level unmodified |
//! | INVARIANT-4 | Salt secrecy | `Salt` never prints its bytes and is wiped on drop |

pub mod domain;

pub use domain::{
    mask_root, verify_reveal, CommitmentError, CommitmentResult, MerkleProof, MerkleTree,
    OsSaltSource, ProofNode, Salt, SaltSource, SiblingPosition, EMPTY_ROOT,
};
