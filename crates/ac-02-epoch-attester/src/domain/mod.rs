//! Domain layer: the epoch calendar, attestation records and the per-epoch
//! commit-reveal state machine.

pub mod calendar;
pub mod epoch;
pub mod record;

pub use calendar::*;
pub use epoch::*;
pub use record::*;
