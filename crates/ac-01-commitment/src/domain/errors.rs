//! # Domain Errors

use thiserror::Error;

/// Errors raised by the commitment builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitmentError {
    /// Leaf index out of bounds.
    #[error("Invalid leaf index {index} (leaf count: {max})")]
    InvalidIndex { index: usize, max: usize },

    /// Proof requested from a tree with no leaves.
    #[error("Merkle tree has no leaves")]
    EmptyTree,

    /// Leaf not present in the tree.
    #[error("Leaf not found: {leaf}")]
    LeafNotFound { leaf: String },
}

/// Result type for commitment operations
pub type CommitmentResult<T> = Result<T, CommitmentError>;
