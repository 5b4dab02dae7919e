//! # Commit-Reveal Salt
//!
//! A per-epoch secret that masks the root during commit and is published
//! during reveal.
//!
//! ## Security
//!
//! The salt must stay private until reveal. `Salt` never prints its bytes
//! and zeroes its memory on drop.

use rand::rngs::OsRng;
use rand::RngCore;
use shared_types::{keccak256, Hash};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secret 256-bit salt.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Salt {
    inner: [u8; 32],
}

impl Salt {
    /// Wrap raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { inner: bytes }
    }

    /// Draw a uniformly random salt from the OS CSPRNG.
    pub fn random() -> Self {
        let mut inner = [0u8; 32];
        OsRng.fill_bytes(&mut inner);
        Self { inner }
    }

    /// Borrow the salt bytes. Keep the borrow short.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.inner
    }

    /// Copy out the salt bytes for the reveal submission.
    pub fn expose(&self) -> Hash {
        self.inner
    }

    /// Public commitment to the salt: `keccak256(salt)`.
    pub fn commitment(&self) -> Hash {
        keccak256(&self.inner)
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Salt(***)")
    }
}

/// Mask a root with a salt: byte-wise `root XOR salt`.
///
/// Applying the same salt again unmasks.
pub fn mask_root(root: &Hash, salt: &Salt) -> Hash {
    let mut masked = [0u8; 32];
    for (out, (r, s)) in masked.iter_mut().zip(root.iter().zip(salt.as_bytes())) {
        *out = r ^ s;
    }
    masked
}

/// Check a revealed salt against the committed salt hash.
pub fn verify_reveal(revealed: &Hash, committed_salt_hash: &Hash) -> bool {
    keccak256(revealed) == *committed_salt_hash
}

/// Source of salts (SecureRandom port).
pub trait SaltSource: Send + Sync {
    /// Produce a fresh, uniformly random salt.
    fn next_salt(&self) -> Salt;
}

/// Salt source backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn next_salt(&self) -> Salt {
        Salt::random()
    }
}
