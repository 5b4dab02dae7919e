//! # Domain Layer
//!
//! Pure commitment logic. No I/O apart from the OS random source behind
//! [`OsSaltSource`].

pub mod errors;
pub mod merkle;
pub mod salt;

pub use errors::*;
pub use merkle::*;
pub use salt::*;
