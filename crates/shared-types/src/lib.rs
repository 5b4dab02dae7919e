//! # Shared Types Crate
//!
//! Claim entities shared by every crate of the attester workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The claim format, its canonical digest and
//!   its canonical ordering are defined once, here.
//! - **Immutability**: An `AttestationClaim` is never mutated after intake;
//!   validation state lives with the epoch that owns the record.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
