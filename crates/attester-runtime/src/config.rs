//! # Runtime Configuration
//!
//! Engine settings plus the runtime's own knobs. Defaults are overridden by
//! `AC_*` environment variables; a value that does not parse is reported and
//! the default kept.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AC_FIRST_EPOCH_START` | `attester.first_epoch_start_secs` |
//! | `AC_EPOCH_PERIOD` | `attester.epoch_period_secs` |
//! | `AC_REVEAL_DELAY` | `attester.reveal_delay_secs` |
//! | `AC_RETENTION` | `attester.retention_secs` |
//! | `AC_IGNORED_TYPES` | `attester.ignored_claim_types` (comma separated names or tags) |
//! | `AC_PRUNE_INTERVAL` | `prune_interval_secs` |

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

use ac_02_epoch_attester::AttesterConfig;
use shared_types::AttestationType;
use tracing::{info, warn};

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Engine configuration.
    pub attester: AttesterConfig,
    /// How often completed epochs are evicted, in seconds.
    pub prune_interval_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            attester: AttesterConfig::default(),
            prune_interval_secs: 60,
        }
    }
}

impl RuntimeConfig {
    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_secs.max(1))
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let attester = &mut config.attester;

        override_from(&lookup, "AC_FIRST_EPOCH_START", &mut attester.first_epoch_start_secs);
        override_from(&lookup, "AC_EPOCH_PERIOD", &mut attester.epoch_period_secs);
        override_from(&lookup, "AC_REVEAL_DELAY", &mut attester.reveal_delay_secs);
        override_from(&lookup, "AC_RETENTION", &mut attester.retention_secs);
        override_from(&lookup, "AC_PRUNE_INTERVAL", &mut config.prune_interval_secs);

        if let Some(raw) = lookup("AC_IGNORED_TYPES") {
            config.attester.ignored_claim_types = parse_ignored_types(&raw);
            info!(
                ignored = ?config.attester.ignored_claim_types,
                "Loaded ignored attestation types from environment"
            );
        }

        config
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => warn!("{} has invalid value {:?}, keeping default", key, raw),
        }
    }
}

fn parse_ignored_types(raw: &str) -> HashSet<AttestationType> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse() {
            Ok(kind) => Some(kind),
            Err(e) => {
                warn!("AC_IGNORED_TYPES entry {:?} skipped: {}", entry, e);
                None
            }
        })
        .collect()
}
