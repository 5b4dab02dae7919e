//! Dry-run submission transport.
//!
//! Logs every commit and reveal and keeps the most recent ones, returning a
//! receipt whose id is the Keccak-256 of the submission words.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use ac_02_epoch_attester::{
    AttestationSubmission, AttestationSubmitter, SubmissionError, SubmissionKind,
    SubmissionReceipt,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::keccak256;
use tracing::info;

/// Submissions kept by default: one commit and one reveal for each of the
/// last 32 epochs.
pub const DEFAULT_HISTORY: usize = 64;

#[derive(Debug)]
pub struct LoggingSubmitter {
    history: usize,
    recent: Mutex<VecDeque<AttestationSubmission>>,
    total: AtomicU64,
}

impl Default for LoggingSubmitter {
    fn default() -> Self {
        Self::with_history(DEFAULT_HISTORY)
    }
}

impl LoggingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `history` submissions; older ones are dropped first.
    pub fn with_history(history: usize) -> Self {
        Self {
            history,
            recent: Mutex::new(VecDeque::with_capacity(history)),
            total: AtomicU64::new(0),
        }
    }

    /// Retained submissions, oldest first.
    pub fn submissions(&self) -> Vec<AttestationSubmission> {
        self.recent.lock().iter().cloned().collect()
    }

    /// Submissions made since start, including dropped ones.
    pub fn total_submitted(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    fn remember(&self, submission: AttestationSubmission) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if self.history == 0 {
            return;
        }
        let mut recent = self.recent.lock();
        if recent.len() == self.history {
            recent.pop_front();
        }
        recent.push_back(submission);
    }
}

#[async_trait]
impl AttestationSubmitter for LoggingSubmitter {
    async fn submit_attestation(
        &self,
        submission: AttestationSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let mut words = Vec::with_capacity(8 + 3 * 32);
        words.extend_from_slice(&submission.buffer_number.to_be_bytes());
        words.extend_from_slice(&submission.masked_root);
        words.extend_from_slice(&submission.committed_salt_hash);
        words.extend_from_slice(&submission.revealed_salt);
        let receipt = SubmissionReceipt::new(keccak256(&words));

        match submission.kind() {
            SubmissionKind::Commit => info!(
                buffer = submission.buffer_number,
                masked_root = %hex::encode(submission.masked_root),
                salt_hash = %hex::encode(submission.committed_salt_hash),
                %receipt,
                "[dry-run] {}",
                submission.label
            ),
            SubmissionKind::Reveal => info!(
                buffer = submission.buffer_number,
                salt = %hex::encode(submission.revealed_salt),
                %receipt,
                "[dry-run] {}",
                submission.label
            ),
        }

        self.remember(submission);
        Ok(receipt)
    }
}
