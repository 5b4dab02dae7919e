//! # Commit-Reveal Observer Tests
//!
//! Checks the commitment scheme from the point of view of a third party who
//! only sees the two submissions.

use ac_01_commitment::{mask_root, verify_reveal, MerkleTree, Salt};
use shared_types::{keccak256, Hash};

fn ids(n: u8) -> Vec<Hash> {
    (0..n).map(|i| keccak256(&[i])).collect()
}

#[test]
fn observer_recovers_root_after_reveal() {
    let tree = MerkleTree::build(ids(6));
    let salt = Salt::random();

    // Commit phase: only the masked root and the salt hash are public
    let masked = mask_root(&tree.root(), &salt);
    let committed_salt_hash = salt.commitment();
    assert_ne!(masked, tree.root());

    // Reveal phase: the salt is published
    let revealed = salt.expose();
    assert!(verify_reveal(&revealed, &committed_salt_hash));
    assert_eq!(mask_root(&masked, &Salt::new(revealed)), tree.root());
}

#[test]
fn swapped_salt_is_detected() {
    let salt = Salt::random();
    let committed_salt_hash = salt.commitment();
    let other = Salt::random();
    assert!(!verify_reveal(&other.expose(), &committed_salt_hash));
}

#[test]
fn proofs_survive_json_transport() {
    let tree = MerkleTree::build(ids(11));
    for i in 0..11 {
        let proof = tree.generate_proof(i).unwrap();
        let json = serde_json::to_string(&proof).unwrap();
        let decoded: ac_01_commitment::MerkleProof = serde_json::from_str(&json).unwrap();
        assert!(decoded.verify());
        assert_eq!(decoded.root, tree.root());
    }
}

#[test]
fn independent_builders_agree() {
    // Two participants with the same sorted input build the same root
    let a = MerkleTree::build(ids(13));
    let b = MerkleTree::build(ids(13));
    assert_eq!(a.root(), b.root());
    assert_eq!(a, b);
}
