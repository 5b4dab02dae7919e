//! Adapters for the outbound ports.
//!
//! - `clock`: system, manual and tokio-driven time sources
//! - `scheduler`: tokio timers and a deterministic manual queue
//! - `router`: per-chain dispatch of payment-proof validation

pub mod clock;
pub mod router;
pub mod scheduler;

pub use clock::{ManualTimeSource, SystemTimeSource, TokioTimeSource};
pub use router::ChainValidatorRouter;
pub use scheduler::{ManualScheduler, TokioPhaseScheduler};
