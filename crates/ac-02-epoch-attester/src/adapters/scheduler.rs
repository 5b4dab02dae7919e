//! Phase schedulers.
//!
//! [`TokioPhaseScheduler`] arms one tokio timer per task. [`ManualScheduler`]
//! queues tasks in a min-heap and runs them only when asked, which makes
//! whole epoch lifecycles reproducible in tests.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use super::clock::ManualTimeSource;
use crate::ports::outbound::{PhaseScheduler, PhaseTask, TimeSource};

/// Scheduler backed by `tokio::time::sleep`.
pub struct TokioPhaseScheduler {
    clock: Arc<dyn TimeSource>,
}

impl TokioPhaseScheduler {
    /// `clock` must tick with tokio's clock (see `TokioTimeSource`) or be
    /// the wall clock in production.
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self { clock }
    }
}

impl PhaseScheduler for TokioPhaseScheduler {
    fn schedule(&self, fire_at_ms: u64, task: PhaseTask) {
        let delay = fire_at_ms.saturating_sub(self.clock.now_ms());
        let deadline = tokio::time::Instant::now() + Duration::from_millis(delay);
        trace!(?task, fire_at_ms, delay_ms = delay, "arming phase timer");
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            task.run().await;
        });
    }
}

struct ScheduledEntry {
    fire_at_ms: u64,
    seq: u64,
    task: PhaseTask,
}

impl ScheduledEntry {
    fn key(&self) -> (u64, u64) {
        (self.fire_at_ms, self.seq)
    }
}

impl PartialEq for ScheduledEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScheduledEntry {}

impl PartialOrd for ScheduledEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Deterministic scheduler: tasks run when the test drives time forward.
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<BinaryHeap<Reverse<ScheduledEntry>>>,
    next_seq: AtomicU64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Fire time of the earliest queued task.
    pub fn next_fire_time(&self) -> Option<u64> {
        self.queue.lock().peek().map(|Reverse(entry)| entry.fire_at_ms)
    }

    fn pop_due(&self, now_ms: u64) -> Option<(u64, PhaseTask)> {
        let mut queue = self.queue.lock();
        match queue.peek() {
            Some(Reverse(entry)) if entry.fire_at_ms <= now_ms => {}
            _ => return None,
        }
        queue
            .pop()
            .map(|Reverse(entry)| (entry.fire_at_ms, entry.task))
    }

    /// Run every task due at or before `now_ms`, earliest first.
    pub async fn run_due(&self, now_ms: u64) -> usize {
        let mut ran = 0;
        while let Some((_, task)) = self.pop_due(now_ms) {
            task.run().await;
            ran += 1;
        }
        ran
    }

    /// Advance `clock` to `until_ms`, stopping at each task's fire time to
    /// run it with the clock showing that time.
    pub async fn run_until(&self, clock: &ManualTimeSource, until_ms: u64) -> usize {
        let mut ran = 0;
        while let Some((fire_at_ms, task)) = self.pop_due(until_ms) {
            if fire_at_ms > clock.now_ms() {
                clock.set(fire_at_ms);
            }
            task.run().await;
            ran += 1;
        }
        if until_ms > clock.now_ms() {
            clock.set(until_ms);
        }
        ran
    }
}

impl PhaseScheduler for ManualScheduler {
    fn schedule(&self, fire_at_ms: u64, task: PhaseTask) {
        let seq = self.next_seq.fetch_add(1, AtomicOrdering::SeqCst);
        self.queue.lock().push(Reverse(ScheduledEntry {
            fire_at_ms,
            seq,
            task,
        }));
    }
}
