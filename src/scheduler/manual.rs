// Manually driven scheduler
//
// Services its queues only when its owner calls `run_tick`, running each task
// inline on the calling thread. Useful wherever the frame clock lives outside
// the process (tests, offline rendering, an embedding media server's own timer).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::queue_manager::{QueueInfo, QueueManager};
use super::{QueueId, Scheduler, Task};

pub struct ManualScheduler {
    queues: QueueManager,
    ticks: AtomicU64,
}

impl ManualScheduler {
    /// Scheduler with only the mixing queue
    pub fn new() -> Self {
        Self::with_queues(1)
    }

    pub fn with_queues(queue_count: usize) -> Self {
        Self {
            queues: QueueManager::new(queue_count),
            ticks: AtomicU64::new(0),
        }
    }

    /// Service every queue once. Returns the number of tasks performed.
    pub fn run_tick(&self) -> usize {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        let mut performed = 0;
        for queue in self.queues.queue_ids() {
            for task in self.queues.take_batch(queue) {
                task.perform();
                performed += 1;
            }
        }
        debug!("⏱️ MANUAL_SCHEDULER: Tick #{} performed {} task(s)", tick, performed);
        performed
    }

    /// Run `count` ticks. Returns the total number of tasks performed.
    pub fn run_ticks(&self, count: usize) -> usize {
        (0..count).map(|_| self.run_tick()).sum()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Tasks waiting on `queue`
    pub fn pending(&self, queue: QueueId) -> usize {
        self.queues
            .get_queue_info(queue)
            .map(|info| info.depth)
            .unwrap_or(0)
    }

    pub fn queue_info(&self, queue: QueueId) -> Option<QueueInfo> {
        self.queues.get_queue_info(queue)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn submit(&self, task: Arc<dyn Task>, queue: QueueId) {
        self.queues.submit(task, queue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Mutex, Weak};

    /// Resubmits itself a fixed number of times
    struct Countdown {
        remaining: Mutex<u32>,
        cancelled: AtomicBool,
        scheduler: Arc<ManualScheduler>,
        this: Weak<Countdown>,
    }

    fn countdown(scheduler: &Arc<ManualScheduler>, runs: u32) -> Arc<Countdown> {
        Arc::new_cyclic(|this| Countdown {
            remaining: Mutex::new(runs),
            cancelled: AtomicBool::new(false),
            scheduler: scheduler.clone(),
            this: this.clone(),
        })
    }

    impl Task for Countdown {
        fn perform(&self) {
            let mut remaining = self.remaining.lock().unwrap();
            if *remaining == 0 {
                return;
            }
            *remaining -= 1;
            if let Some(this) = self.this.upgrade() {
                self.scheduler.submit(this, QueueId::MIXER_MIX);
            }
        }
        fn cancel(&self) {
            self.cancelled.store(true, Ordering::SeqCst);
        }
        fn is_cancelled(&self) -> bool {
            self.cancelled.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_resubmitted_task_runs_once_per_tick() {
        let scheduler = Arc::new(ManualScheduler::new());
        let task = countdown(&scheduler, 3);
        scheduler.submit(task.clone(), QueueId::MIXER_MIX);

        assert_eq!(scheduler.run_tick(), 1);
        assert_eq!(scheduler.pending(QueueId::MIXER_MIX), 1);
        assert_eq!(scheduler.run_ticks(5), 3);
        assert_eq!(scheduler.pending(QueueId::MIXER_MIX), 0);
        assert_eq!(scheduler.ticks(), 6);

        let info = scheduler.queue_info(QueueId::MIXER_MIX).unwrap();
        assert_eq!(info.total_submitted, 4);
        assert_eq!(info.total_executed, 4);
    }

    #[test]
    fn test_cancelled_task_is_not_performed() {
        let scheduler = Arc::new(ManualScheduler::new());
        let task = countdown(&scheduler, 10);
        scheduler.submit(task.clone(), QueueId::MIXER_MIX);
        assert_eq!(scheduler.run_tick(), 1);

        task.cancel();
        assert_eq!(scheduler.run_tick(), 0);
        assert_eq!(scheduler.pending(QueueId::MIXER_MIX), 0);
        assert_eq!(*task.remaining.lock().unwrap(), 9);

        let info = scheduler.queue_info(QueueId::MIXER_MIX).unwrap();
        assert_eq!(info.total_executed, 1);
        assert_eq!(info.total_skipped_cancelled, 1);
    }
}
