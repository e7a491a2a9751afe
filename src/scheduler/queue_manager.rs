// Task queues and their state tracking
use crossbeam::queue::SegQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use colored::*;
use tracing::{debug, info, warn};

use super::{QueueId, Task};

/// Queue state information
#[derive(Debug, Clone, PartialEq)]
pub struct QueueInfo {
    pub queue_id: QueueId,
    pub depth: usize,
    pub total_submitted: u64,
    pub total_executed: u64,
    pub total_skipped_cancelled: u64,
}

/// One lock-free task queue
struct TaskQueue {
    tasks: SegQueue<Arc<dyn Task>>,
    total_submitted: AtomicU64,
    total_executed: AtomicU64,
    total_skipped_cancelled: AtomicU64,
}

impl TaskQueue {
    fn new() -> Self {
        Self {
            tasks: SegQueue::new(),
            total_submitted: AtomicU64::new(0),
            total_executed: AtomicU64::new(0),
            total_skipped_cancelled: AtomicU64::new(0),
        }
    }
}

/// Fixed set of task queues shared by a scheduler and its submitters
pub struct QueueManager {
    queues: Vec<TaskQueue>,
    rejected: AtomicU64,
}

impl QueueManager {
    pub fn new(queue_count: usize) -> Self {
        let queue_count = queue_count.max(1);
        info!(
            "🎯 {}: Created {} task queue(s)",
            "QUEUE_MANAGER".green(),
            queue_count
        );
        Self {
            queues: (0..queue_count).map(|_| TaskQueue::new()).collect(),
            rejected: AtomicU64::new(0),
        }
    }

    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    /// Enqueue a task. Submissions to unknown queues are dropped.
    pub fn submit(&self, task: Arc<dyn Task>, queue: QueueId) {
        match self.queues.get(queue.0) {
            Some(slot) => {
                slot.tasks.push(task);
                slot.total_submitted.fetch_add(1, Ordering::Relaxed);
            }
            None => {
                let rejected = self.rejected.fetch_add(1, Ordering::Relaxed) + 1;
                if rejected <= 5 || rejected % 1000 == 0 {
                    warn!(
                        "🎯 {}: Dropped task for unknown queue {} (#{} rejected)",
                        "QUEUE_WARNING".yellow(),
                        queue,
                        rejected
                    );
                }
            }
        }
    }

    /// Pop the tasks queued at the start of this tick. Tasks submitted while
    /// the batch runs stay queued for the next tick. Cancelled tasks are
    /// dropped here and never make it into the batch.
    pub fn take_batch(&self, queue: QueueId) -> Vec<Arc<dyn Task>> {
        let Some(slot) = self.queues.get(queue.0) else {
            return Vec::new();
        };

        let pending = slot.tasks.len();
        let mut batch = Vec::with_capacity(pending);
        let mut skipped = 0u64;
        for _ in 0..pending {
            let Some(task) = slot.tasks.pop() else {
                break;
            };
            if task.is_cancelled() {
                task.skipped();
                skipped += 1;
            } else {
                batch.push(task);
            }
        }

        slot.total_executed
            .fetch_add(batch.len() as u64, Ordering::Relaxed);
        if skipped > 0 {
            let total = slot.total_skipped_cancelled.fetch_add(skipped, Ordering::Relaxed) + skipped;
            debug!(
                "🎯 {}: Dropped {} cancelled task(s) from {} ({} total)",
                "QUEUE_MANAGER".green(),
                skipped,
                queue,
                total
            );
        }
        batch
    }

    /// Every queue id in servicing order
    pub fn queue_ids(&self) -> impl Iterator<Item = QueueId> {
        (0..self.queues.len()).map(QueueId)
    }

    /// Get current state of a queue
    pub fn get_queue_info(&self, queue: QueueId) -> Option<QueueInfo> {
        self.queues.get(queue.0).map(|slot| QueueInfo {
            queue_id: queue,
            depth: slot.tasks.len(),
            total_submitted: slot.total_submitted.load(Ordering::Relaxed),
            total_executed: slot.total_executed.load(Ordering::Relaxed),
            total_skipped_cancelled: slot.total_skipped_cancelled.load(Ordering::Relaxed),
        })
    }

    /// Get state of all queues
    pub fn get_all_queue_info(&self) -> Vec<QueueInfo> {
        self.queue_ids()
            .filter_map(|queue| self.get_queue_info(queue))
            .collect()
    }

    pub fn rejected_submissions(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueManager")
            .field("queues", &self.get_all_queue_info())
            .finish()
    }
}
