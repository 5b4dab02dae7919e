//! # Attestation Client Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Cross-crate flows
//! │   ├── fixtures.rs          # Claim builders shared by the flows
//! │   ├── runtime_flows.rs     # Runtime on tokio's paused clock
//! │   └── participants.rs      # Independent attesters agreeing on a root
//! │
//! └── benches/           # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ac-tests
//!
//! # Benchmarks
//! cargo bench -p ac-tests
//! ```

#![allow(dead_code)]

pub mod integration;
