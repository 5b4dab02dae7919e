//! Attester configuration

use crate::error::{AttesterError, AttesterResult};
use serde::{Deserialize, Serialize};
use shared_types::AttestationType;
use std::collections::HashSet;

/// Epoch attester configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttesterConfig {
    /// Start of epoch 0 (seconds since Unix epoch)
    pub first_epoch_start_secs: u64,
    /// Length of each phase (seconds)
    pub epoch_period_secs: u64,
    /// Delay after reveal-phase start before the reveal is submitted (seconds)
    pub reveal_delay_secs: u64,
    /// How long a completed epoch stays queryable before eviction (seconds)
    pub retention_secs: u64,
    /// Claim types accepted at intake but never validated
    pub ignored_claim_types: HashSet<AttestationType>,
}

impl Default for AttesterConfig {
    fn default() -> Self {
        Self {
            first_epoch_start_secs: 1_636_070_400,
            epoch_period_secs: 90,
            reveal_delay_secs: 45,
            retention_secs: 270,
            ignored_claim_types: HashSet::from([AttestationType::BalanceDecreasingProof]),
        }
    }
}

impl AttesterConfig {
    /// Reject settings the phase layout cannot honour.
    pub fn validate(&self) -> AttesterResult<()> {
        if self.epoch_period_secs == 0 {
            return Err(AttesterError::Config {
                reason: "epoch period must be positive".to_string(),
            });
        }
        if self.reveal_delay_secs >= self.epoch_period_secs {
            return Err(AttesterError::Config {
                reason: format!(
                    "reveal delay {}s must be shorter than the epoch period {}s",
                    self.reveal_delay_secs, self.epoch_period_secs
                ),
            });
        }
        Ok(())
    }

    pub fn reveal_delay_ms(&self) -> u64 {
        self.reveal_delay_secs.saturating_mul(1000)
    }

    pub fn retention_ms(&self) -> u64 {
        self.retention_secs.saturating_mul(1000)
    }

    pub fn is_ignored(&self, kind: AttestationType) -> bool {
        self.ignored_claim_types.contains(&kind)
    }
}
