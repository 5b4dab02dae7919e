//! # Merkle Aggregation
//!
//! Binary Merkle tree over the sorted content-hash ids of an epoch.
//!
//! ALGORITHM: each parent is `keccak256(left || right)`. Levels are built
//! bottom-up; when a level has an odd number of nodes the last one is carried
//! to the next level unmodified. No padding is applied, so the tree shape
//! depends only on the leaf count.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::Hash;

use super::errors::{CommitmentError, CommitmentResult};

/// Root reported for a tree without leaves.
pub const EMPTY_ROOT: Hash = [0u8; 32];

/// A binary Merkle tree built from an ordered id list.
///
/// ## Invariants
///
/// - **INVARIANT-1** (Deterministic): same ordered ids produce the same root.
/// - **INVARIANT-3** (Odd Node Carry): an unpaired node is promoted as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTree {
    /// Levels from leaves (index 0) to root (last).
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build a tree over `leaves` in the given order.
    ///
    /// The caller is responsible for ordering; the builder never sorts.
    pub fn build(leaves: Vec<Hash>) -> Self {
        if leaves.is_empty() {
            return Self { levels: Vec::new() };
        }

        let mut levels = vec![leaves];
        while levels.last().map_or(0, Vec::len) > 1 {
            let current = &levels[levels.len() - 1];
            let next: Vec<Hash> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => Self::hash_pair(left, right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            levels.push(next);
        }

        Self { levels }
    }

    /// Root of the tree, [`EMPTY_ROOT`] when there are no leaves.
    pub fn root(&self) -> Hash {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(EMPTY_ROOT)
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Number of levels including leaves and root.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Leaves in tree order.
    pub fn leaves(&self) -> &[Hash] {
        self.levels.first().map_or(&[], Vec::as_slice)
    }

    /// Position of a leaf, if present.
    pub fn position_of(&self, leaf: &Hash) -> Option<usize> {
        self.leaves().iter().position(|candidate| candidate == leaf)
    }

    /// Generate an inclusion proof for the leaf at `index`.
    ///
    /// ## INVARIANT-2: Proof Validity
    ///
    /// The generated proof MUST verify against this tree's root.
    pub fn generate_proof(&self, index: usize) -> CommitmentResult<MerkleProof> {
        let leaf_count = self.leaf_count();
        if leaf_count == 0 {
            return Err(CommitmentError::EmptyTree);
        }
        if index >= leaf_count {
            return Err(CommitmentError::InvalidIndex {
                index,
                max: leaf_count,
            });
        }

        let mut path = Vec::new();
        let mut current = index;

        // Walk every level except the root
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = current ^ 1;
            if let Some(hash) = level.get(sibling) {
                let position = if current % 2 == 0 {
                    SiblingPosition::Right
                } else {
                    SiblingPosition::Left
                };
                path.push(ProofNode {
                    hash: *hash,
                    position,
                });
            }
            // No sibling: node was carried up unchanged
            current /= 2;
        }

        Ok(MerkleProof {
            leaf: self.levels[0][index],
            index,
            root: self.root(),
            path,
        })
    }

    /// Generate a proof for a leaf by value.
    pub fn proof_for(&self, leaf: &Hash) -> CommitmentResult<MerkleProof> {
        let index = self
            .position_of(leaf)
            .ok_or_else(|| CommitmentError::LeafNotFound {
                leaf: hex::encode(leaf),
            })?;
        self.generate_proof(index)
    }

    /// Verify a proof against this tree's root.
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        Self::verify_proof_static(&proof.leaf, &proof.path, &self.root())
    }

    /// Static verification without a tree instance.
    ///
    /// Recomputes the root from leaf and path and compares.
    pub fn verify_proof_static(leaf: &Hash, path: &[ProofNode], expected_root: &Hash) -> bool {
        let computed = path.iter().fold(*leaf, |current, node| match node.position {
            SiblingPosition::Left => Self::hash_pair(&node.hash, &current),
            SiblingPosition::Right => Self::hash_pair(&current, &node.hash),
        });
        computed == *expected_root
    }

    /// parent = keccak256(left || right)
    pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

/// Proof that an id is a leaf of a committed root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// The proven leaf.
    pub leaf: Hash,
    /// Leaf position in sorted order.
    pub index: usize,
    /// Root this proof verifies against.
    pub root: Hash,
    /// Sibling hashes from leaf to root. Levels where the node was carried
    /// up without a sibling contribute no entry.
    pub path: Vec<ProofNode>,
}

impl MerkleProof {
    /// Verify against the root embedded in the proof.
    pub fn verify(&self) -> bool {
        MerkleTree::verify_proof_static(&self.leaf, &self.path, &self.root)
    }
}

/// A single node in the proof path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    /// The sibling hash at this level.
    pub hash: Hash,
    /// Position of the sibling (left or right).
    pub position: SiblingPosition,
}

/// Position of a sibling in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiblingPosition {
    Left,
    Right,
}
