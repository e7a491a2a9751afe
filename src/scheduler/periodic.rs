// Periodic scheduler
//
// A tokio interval ticker services every queue once per frame period. Each
// task dequeued on a tick runs as its own tokio task, so tasks on the same
// queue (the two directional mixers) execute concurrently on the worker pool.

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use colored::*;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::queue_manager::{QueueInfo, QueueManager};
use super::{QueueId, Scheduler, Task};

pub struct PeriodicScheduler {
    period: Duration,
    queues: Arc<QueueManager>,
    ticks: Arc<AtomicU64>,
    ticker_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl PeriodicScheduler {
    /// Scheduler with only the mixing queue
    pub fn new(period: Duration) -> Self {
        Self::with_queues(period, 1)
    }

    pub fn with_queues(period: Duration, queue_count: usize) -> Self {
        Self {
            period,
            queues: Arc::new(QueueManager::new(queue_count)),
            ticks: Arc::new(AtomicU64::new(0)),
            ticker_handle: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start the ticker on the current tokio runtime. Calling it again while
    /// the ticker runs is a no-op.
    pub fn start(&self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| anyhow::anyhow!("Periodic scheduler needs a tokio runtime: {}", e))?;

        let mut handle_slot = self
            .ticker_handle
            .lock()
            .map_err(|_| anyhow::anyhow!("Ticker handle lock poisoned"))?;
        if handle_slot.is_some() {
            return Ok(());
        }
        if self.period.is_zero() {
            return Err(anyhow::anyhow!("Scheduler period must be non-zero"));
        }

        let period = self.period;
        let queues = self.queues.clone();
        let ticks = self.ticks.clone();

        let ticker = runtime.spawn(async move {
            info!(
                "🚀 {}: Ticker started (period: {:?}, queues: {})",
                "SCHEDULER".green(),
                period,
                queues.queue_count()
            );

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let tick = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                let tick_start = std::time::Instant::now();

                // Cancelled tasks are dropped while the batch is taken
                for queue in queues.queue_ids() {
                    for task in queues.take_batch(queue) {
                        tokio::spawn(async move {
                            task.perform();
                        });
                    }
                }

                let tick_duration = tick_start.elapsed();
                if tick_duration > period / 4 {
                    warn!(
                        "⏱️ {}: Slow dispatch on tick #{}: {}μs",
                        "SCHEDULER".yellow(),
                        tick,
                        tick_duration.as_micros()
                    );
                }
            }
        });

        *handle_slot = Some(ticker);
        Ok(())
    }

    /// Stop the ticker. Queued tasks stay queued until the ticker is started again.
    pub async fn shutdown(&self) {
        let handle = match self.ticker_handle.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };

        if let Some(handle) = handle {
            handle.abort();

            match tokio::time::timeout(Duration::from_millis(100), handle).await {
                Ok(_) => info!("✅ {}: Ticker shut down", "SCHEDULER".green()),
                Err(_) => warn!("⚠️ {}: Ticker force-terminated after timeout", "SCHEDULER".yellow()),
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker_handle
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn queue_info(&self, queue: QueueId) -> Option<QueueInfo> {
        self.queues.get_queue_info(queue)
    }
}

impl Scheduler for PeriodicScheduler {
    fn submit(&self, task: Arc<dyn Task>, queue: QueueId) {
        self.queues.submit(task, queue);
    }
}

impl Drop for PeriodicScheduler {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.ticker_handle.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}
