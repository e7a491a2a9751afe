// Scheduler contract - cooperative task queues serviced once per frame period
//
// The splitter never spawns threads. Its mixers are units of work submitted to
// a named queue; a scheduler services every queue once per tick and the mixers
// resubmit themselves at the end of each cycle.
//
// - queue_manager: lock-free task queues and their statistics
// - periodic: tokio-backed scheduler with an interval ticker
// - manual: scheduler driven tick-by-tick by its owner

pub mod manual;
pub mod periodic;
pub mod queue_manager;

use std::sync::Arc;

pub use manual::ManualScheduler;
pub use periodic::PeriodicScheduler;
pub use queue_manager::{QueueInfo, QueueManager};

/// Identifies a task queue within a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueId(pub usize);

impl QueueId {
    /// Queue serviced by the audio mixers
    pub const MIXER_MIX: QueueId = QueueId(0);
}

impl std::fmt::Display for QueueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            QueueId::MIXER_MIX => write!(f, "mixer-mix"),
            QueueId(id) => write!(f, "queue-{}", id),
        }
    }
}

/// A unit of work executed once per submission
pub trait Task: Send + Sync {
    /// Run one execution. Must not block.
    fn perform(&self);

    /// Suppress future executions. Schedulers drop a queued task that reports
    /// itself cancelled when they dequeue it.
    fn cancel(&self);

    fn is_cancelled(&self) -> bool;

    /// Called instead of `perform` when a scheduler drops this queued task
    /// because it was cancelled.
    fn skipped(&self) {}
}

/// Accepts tasks for one execution on a named queue
pub trait Scheduler: Send + Sync {
    fn submit(&self, task: Arc<dyn Task>, queue: QueueId);
}
