//! Hexagonal ports.
//!
//! - `inbound`: the API the registry offers to the claim intake
//! - `outbound`: what the engine needs from the outside world

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
