//! # ac-02-epoch-attester
//!
//! Epoch-based commit-reveal attestation engine.
//!
//! ## Overview
//!
//! Time is cut into fixed-length epochs. Claims received during an epoch's
//! collect window are validated asynchronously; once the commit phase starts
//! and every verdict is in, the valid claims are sorted, aggregated into a
//! Merkle root and committed as `root XOR salt` together with
//! `keccak256(salt)`. One phase later the salt is revealed.
//!
//! ## Architecture
//!
//! ```text
//! claim intake ──submit_claim──→ EpochRegistry ──validate──→ ClaimValidator
//!                                    │
//!                                    ├── creates ──→ AttesterEpoch (one per epoch)
//!                                    │                   │
//!                                    └── arms ──→ PhaseScheduler ──→ commit / reveal
//!                                                        │
//!                                                        └──→ AttestationSubmitter
//! ```
//!
//! ## Phase timeline of epoch N
//!
//! | Boundary | Time |
//! |----------|------|
//! | collect  | `[start(N), start(N) + period)` |
//! | commit   | `start(N) + period + 1` |
//! | reveal   | `commit(N) + period + 2` (salt sent after `reveal_delay`) |
//! | complete | `reveal(N) + period + 3` |
//!
//! A claim is rejected as late once the clock has passed the commit
//! boundary of its epoch.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ac_02_epoch_attester::{AttesterApi, AttesterConfig, EpochRegistry};
//!
//! let registry = EpochRegistry::new(config, submitter, salts, clock, scheduler)?
//!     .with_validator(AttestationType::PaymentProof, router);
//!
//! let disposition = registry.submit_claim(claim).await;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{
    ChainValidatorRouter, ManualScheduler, ManualTimeSource, SystemTimeSource,
    TokioPhaseScheduler, TokioTimeSource,
};
pub use config::AttesterConfig;
pub use domain::{
    AttestationRecord, AttestationStatus, AttesterEpoch, CommitStatus, EpochCalendar,
    EpochContext, EpochId, EpochPhase, EpochSnapshot, PendingAttestation, PhaseSchedule,
    ValidationTicket, ValidationVerdict,
};
pub use error::{AttesterError, AttesterResult};
pub use ports::inbound::{AttesterApi, ClaimDisposition};
pub use ports::outbound::{
    AttestationSubmission, AttestationSubmitter, ClaimValidator, PhaseAction, PhaseScheduler,
    PhaseTask, SubmissionError, SubmissionKind, SubmissionReceipt, TimeSource, ValidatorError,
};
pub use service::EpochRegistry;
