//! Cross-crate integration flows.

pub mod fixtures;
pub mod participants;
pub mod runtime_flows;
