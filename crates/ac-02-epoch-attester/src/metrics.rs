//! # Attester Metrics
//!
//! Prometheus metrics for the claim intake and the commit-reveal cycle.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! ac-02-epoch-attester = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `attester_claims_accepted_total` - Counter of claims handed to an epoch
//! - `attester_claims_rejected_total` - Counter of rejected claims (by reason)
//! - `attester_commits_total` - Counter of commit submissions (by outcome)
//! - `attester_reveals_total` - Counter of reveal submissions (by outcome)
//! - `attester_empty_epochs_total` - Counter of epochs closed with nothing to commit
//! - `attester_epochs_tracked` - Gauge of epochs held by the registry

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_gauge, register_int_counter, register_int_counter_vec, Gauge, IntCounter,
    IntCounterVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Claims handed to an epoch state machine
    pub static ref CLAIMS_ACCEPTED: IntCounter = register_int_counter!(
        "attester_claims_accepted_total",
        "Total number of claims accepted into an epoch"
    )
    .expect("Failed to create CLAIMS_ACCEPTED metric");

    /// Rejected claims, labeled by reason
    pub static ref CLAIMS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "attester_claims_rejected_total",
        "Total number of claims rejected at intake",
        &["reason"]
    )
    .expect("Failed to create CLAIMS_REJECTED metric");

    /// Commit submissions, labeled by outcome
    pub static ref COMMITS: IntCounterVec = register_int_counter_vec!(
        "attester_commits_total",
        "Total number of commit submissions",
        &["outcome"]
    )
    .expect("Failed to create COMMITS metric");

    /// Reveal submissions, labeled by outcome
    pub static ref REVEALS: IntCounterVec = register_int_counter_vec!(
        "attester_reveals_total",
        "Total number of reveal submissions",
        &["outcome"]
    )
    .expect("Failed to create REVEALS metric");

    /// Epochs that reached commit with no valid record
    pub static ref EMPTY_EPOCHS: IntCounter = register_int_counter!(
        "attester_empty_epochs_total",
        "Total number of epochs without a valid attestation"
    )
    .expect("Failed to create EMPTY_EPOCHS metric");

    /// Epochs currently held by the registry
    pub static ref EPOCHS_TRACKED: Gauge = register_gauge!(
        "attester_epochs_tracked",
        "Number of epochs currently tracked"
    )
    .expect("Failed to create EPOCHS_TRACKED metric");
}

/// Record an accepted claim
#[inline]
pub fn record_claim_accepted() {
    #[cfg(feature = "metrics")]
    CLAIMS_ACCEPTED.inc();
}

/// Record a rejected claim
#[inline]
pub fn record_claim_rejected(_reason: &str) {
    #[cfg(feature = "metrics")]
    CLAIMS_REJECTED.with_label_values(&[_reason]).inc();
}

/// Record a commit submission outcome
#[inline]
pub fn record_commit(_success: bool) {
    #[cfg(feature = "metrics")]
    COMMITS
        .with_label_values(&[if _success { "submitted" } else { "failed" }])
        .inc();
}

/// Record a reveal submission outcome
#[inline]
pub fn record_reveal(_success: bool) {
    #[cfg(feature = "metrics")]
    REVEALS
        .with_label_values(&[if _success { "submitted" } else { "failed" }])
        .inc();
}

/// Record an epoch with nothing to commit
#[inline]
pub fn record_empty_epoch() {
    #[cfg(feature = "metrics")]
    EMPTY_EPOCHS.inc();
}

/// Update the tracked epoch gauge
#[inline]
pub fn set_epochs_tracked(_count: usize) {
    #[cfg(feature = "metrics")]
    EPOCHS_TRACKED.set(_count as f64);
}
