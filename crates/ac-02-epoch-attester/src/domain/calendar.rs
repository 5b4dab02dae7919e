//! # Epoch Calendar
//!
//! Pure arithmetic mapping wall-clock milliseconds to epoch ids and phase
//! boundaries.
//!
//! ```text
//!  epoch_start(N)      commit_phase_start(N)   reveal_phase_start(N)   completion_time(N)
//!       │── collect ──────────│── commit ─────────────│── reveal ─────────────│
//!       │     period          │ +1ms   period         │ +2ms   period         │ +3ms
//! ```
//!
//! The 1/2/3 ms offsets push each boundary strictly past the previous one so
//! that timers armed for the same instant never collide.

use crate::config::AttesterConfig;
use crate::error::{AttesterError, AttesterResult};

/// Epoch identifier. Epoch 0 starts at the calendar's first epoch start.
pub type EpochId = u64;

/// Offset added to the commit-phase boundary (ms)
pub const COMMIT_BOUNDARY_OFFSET_MS: u64 = 1;
/// Offset added to the reveal-phase boundary (ms)
pub const REVEAL_BOUNDARY_OFFSET_MS: u64 = 2;
/// Offset added to the completion boundary (ms)
pub const COMPLETION_BOUNDARY_OFFSET_MS: u64 = 3;

/// Immutable epoch calendar, shared read-only by every component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochCalendar {
    first_epoch_start_ms: u64,
    period_ms: u64,
}

/// All phase boundaries of one epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseSchedule {
    pub epoch_id: EpochId,
    pub epoch_start_ms: u64,
    pub commit_phase_start_ms: u64,
    pub reveal_phase_start_ms: u64,
    pub completion_ms: u64,
}

impl EpochCalendar {
    /// Build from second-granularity settings.
    pub fn new(first_epoch_start_secs: u64, period_secs: u64) -> AttesterResult<Self> {
        if period_secs == 0 {
            return Err(AttesterError::Config {
                reason: "epoch period must be positive".to_string(),
            });
        }
        Ok(Self {
            first_epoch_start_ms: first_epoch_start_secs.saturating_mul(1000),
            period_ms: period_secs.saturating_mul(1000),
        })
    }

    pub fn from_config(config: &AttesterConfig) -> AttesterResult<Self> {
        Self::new(config.first_epoch_start_secs, config.epoch_period_secs)
    }

    pub fn first_epoch_start_ms(&self) -> u64 {
        self.first_epoch_start_ms
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Epoch whose collect window contains `t_ms`, or `None` before epoch 0.
    pub fn epoch_id_for_time(&self, t_ms: u64) -> Option<EpochId> {
        t_ms.checked_sub(self.first_epoch_start_ms)
            .map(|elapsed| elapsed / self.period_ms)
    }

    pub fn epoch_start(&self, epoch_id: EpochId) -> u64 {
        self.first_epoch_start_ms
            .saturating_add(epoch_id.saturating_mul(self.period_ms))
    }

    pub fn commit_phase_start(&self, epoch_id: EpochId) -> u64 {
        self.epoch_start(epoch_id)
            .saturating_add(self.period_ms)
            .saturating_add(COMMIT_BOUNDARY_OFFSET_MS)
    }

    pub fn commit_phase_end(&self, epoch_id: EpochId) -> u64 {
        self.reveal_phase_start(epoch_id)
    }

    pub fn reveal_phase_start(&self, epoch_id: EpochId) -> u64 {
        self.commit_phase_start(epoch_id)
            .saturating_add(self.period_ms)
            .saturating_add(REVEAL_BOUNDARY_OFFSET_MS)
    }

    pub fn reveal_phase_end(&self, epoch_id: EpochId) -> u64 {
        self.completion_time(epoch_id)
    }

    pub fn completion_time(&self, epoch_id: EpochId) -> u64 {
        self.reveal_phase_start(epoch_id)
            .saturating_add(self.period_ms)
            .saturating_add(COMPLETION_BOUNDARY_OFFSET_MS)
    }

    /// Every boundary of `epoch_id` in one value.
    pub fn schedule(&self, epoch_id: EpochId) -> PhaseSchedule {
        PhaseSchedule {
            epoch_id,
            epoch_start_ms: self.epoch_start(epoch_id),
            commit_phase_start_ms: self.commit_phase_start(epoch_id),
            reveal_phase_start_ms: self.reveal_phase_start(epoch_id),
            completion_ms: self.completion_time(epoch_id),
        }
    }
}
