// Directional mixer: one mixing cycle from a source pool to a destination pool
//
// Each cycle:
// 1. Gathers one frame from every source component that has data
// 2. Sums the frames into a reusable wide-integer accumulator
// 3. Shrinks the gain if the sum would leave the 16-bit range
// 4. Offers the same normalized frame to every destination component
// 5. Resubmits itself to the scheduler's mixing queue unless cancelled
//
// A splitter owns two of these, one per direction.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, TryLockError, Weak};
use tracing::{debug, info, warn};

use super::component_pool::ComponentPool;
use super::types::{MixDirection, MixerStats, Normalization, SharedGain};
use crate::audio::types::{ComponentError, ComponentId, SAMPLE_MAX};
use crate::mix_debug;
use crate::scheduler::{QueueId, Scheduler, Task};

/// Normalize an accumulated frame into the 16-bit output frame.
///
/// The configured gain is applied unchanged while the peak magnitude of the sum
/// fits in the 16-bit range; otherwise it is scaled by `32767 / peak` so the
/// loudest sample lands exactly on the range limit. Samples are rounded to the
/// nearest integer with halves rounding up.
pub fn normalize(accumulator: &[i32], output: &mut [i16], gain: f64) -> Normalization {
    let mut min_value = 0i32;
    let mut max_value = 0i32;
    for &sample in accumulator {
        if sample > max_value {
            max_value = sample;
        } else if sample < min_value {
            min_value = sample;
        }
    }

    let peak = (max_value as i64).max(-(min_value as i64));

    let mut effective_gain = gain;
    let shrunk = peak > SAMPLE_MAX as i64;
    if shrunk {
        effective_gain = (gain * SAMPLE_MAX as f64) / peak as f64;
    }

    for (out, &sample) in output.iter_mut().zip(accumulator.iter()) {
        // Float to int casts saturate at the i16 bounds
        *out = round_half_up(sample as f64 * effective_gain) as i16;
    }

    Normalization {
        peak,
        effective_gain,
        shrunk,
    }
}

/// Round to the nearest integer, ties toward positive infinity.
///
/// `(x + 0.5).floor()` is off by one just below a half (0.49999999999999994
/// rounds to 1) because the addition itself rounds, so ties are detected on
/// the exact distance to `x.round()` instead.
fn round_half_up(x: f64) -> f64 {
    let nearest = x.round();
    if x - nearest == 0.5 {
        nearest + 1.0
    } else {
        nearest
    }
}

/// Run a component call, turning a panic into a component fault
fn isolate<T>(
    id: ComponentId,
    operation: &'static str,
    call: impl FnOnce() -> Result<T, ComponentError>,
) -> Result<T, ComponentError> {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(_) => Err(ComponentError::Panicked { id, operation }),
    }
}

/// Working buffers owned by one mixer and reused every cycle
struct MixBuffers {
    accumulator: Vec<i32>,
    output: Vec<i16>,
}

/// Queued on or executing for the scheduler
const SCHEDULED: u8 = 0b01;
const CANCELLED: u8 = 0b10;

#[derive(Debug, Default)]
struct MixerCounters {
    cycles: AtomicU64,
    frames_mixed: AtomicU64,
    frames_delivered: AtomicU64,
    silent_cycles: AtomicU64,
    gain_shrinks: AtomicU64,
    component_faults: AtomicU64,
    overlapped_cycles: AtomicU64,
    last_peak: AtomicI64,
}

/// Mixes one side of a splitter into the other, once per scheduling cycle
pub struct DirectionalMixer {
    direction: MixDirection,
    source: Arc<ComponentPool>,
    destination: Arc<ComponentPool>,
    gain: Arc<SharedGain>,
    scheduler: Arc<dyn Scheduler>,
    queue: QueueId,
    frame_len: usize,
    this: Weak<DirectionalMixer>,
    buffers: Mutex<MixBuffers>,
    /// `SCHEDULED` and `CANCELLED` bits
    lifecycle: AtomicU8,
    counters: MixerCounters,
}

impl DirectionalMixer {
    pub fn new(
        direction: MixDirection,
        source: Arc<ComponentPool>,
        destination: Arc<ComponentPool>,
        gain: Arc<SharedGain>,
        scheduler: Arc<dyn Scheduler>,
        frame_len: usize,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            direction,
            source,
            destination,
            gain,
            scheduler,
            queue: QueueId::MIXER_MIX,
            frame_len,
            this: this.clone(),
            buffers: Mutex::new(MixBuffers {
                accumulator: vec![0; frame_len],
                output: vec![0; frame_len],
            }),
            lifecycle: AtomicU8::new(0),
            counters: MixerCounters::default(),
        })
    }

    pub fn direction(&self) -> MixDirection {
        self.direction
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Clear any pending cancellation and submit the mixer to the mixing queue.
    /// Returns false when the mixer is already queued or executing, in which
    /// case that submission keeps the cycle going.
    pub fn start(&self) -> bool {
        let Some(this) = self.this.upgrade() else {
            return false;
        };

        let previous = self.lifecycle.swap(SCHEDULED, Ordering::AcqRel);
        if previous & SCHEDULED != 0 {
            debug!("{}: Already scheduled, resuming existing cycle", self.direction.tag());
            return false;
        }

        self.scheduler.submit(this, self.queue);
        info!("🚀 {}: Submitted to {} queue", self.direction.tag(), self.queue);
        true
    }

    /// Prevent any further resubmission. A cycle already in flight finishes its
    /// pass but does not reschedule itself, and a queued entry is dropped by
    /// the scheduler.
    pub fn cancel(&self) {
        let previous = self.lifecycle.fetch_or(CANCELLED, Ordering::AcqRel);
        if previous & CANCELLED == 0 {
            info!("🛑 {}: Cancelled", self.direction.tag());
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.lifecycle.load(Ordering::Acquire) & CANCELLED != 0
    }

    /// Give up the scheduled slot if the mixer is cancelled. Returns false when
    /// a restart cleared the cancellation first, in which case the caller still
    /// owns the slot.
    fn retire_if_cancelled(&self) -> bool {
        let mut state = self.lifecycle.load(Ordering::Acquire);
        loop {
            if state & CANCELLED == 0 {
                return false;
            }
            match self.lifecycle.compare_exchange_weak(
                state,
                state & !SCHEDULED,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => state = actual,
            }
        }
    }

    /// The scheduler dropped the queued entry for this mixer
    fn on_skipped(&self) {
        if self.retire_if_cancelled() {
            debug!("{}: Queued cycle dropped after cancel", self.direction.tag());
            return;
        }
        // Restarted between the dequeue check and now; the dropped entry was
        // the live one, so put it back.
        if let Some(this) = self.this.upgrade() {
            self.scheduler.submit(this, self.queue);
        }
    }

    pub fn reset_cycles(&self) {
        self.counters.cycles.store(0, Ordering::Relaxed);
    }

    pub fn cycles(&self) -> u64 {
        self.counters.cycles.load(Ordering::Relaxed)
    }

    pub fn get_stats(&self) -> MixerStats {
        let counters = &self.counters;
        MixerStats {
            direction: self.direction,
            cycles: counters.cycles.load(Ordering::Relaxed),
            frames_mixed: counters.frames_mixed.load(Ordering::Relaxed),
            frames_delivered: counters.frames_delivered.load(Ordering::Relaxed),
            silent_cycles: counters.silent_cycles.load(Ordering::Relaxed),
            gain_shrinks: counters.gain_shrinks.load(Ordering::Relaxed),
            component_faults: counters.component_faults.load(Ordering::Relaxed),
            overlapped_cycles: counters.overlapped_cycles.load(Ordering::Relaxed),
            last_peak: counters.last_peak.load(Ordering::Relaxed),
        }
    }

    /// Execute one mixing cycle
    pub fn mix_cycle(&self) {
        if self.retire_if_cancelled() {
            // Stale entry performed without going through a dequeue check
            return;
        }

        let mut buffers = match self.buffers.try_lock() {
            Ok(buffers) => buffers,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                let overlapped = self.counters.overlapped_cycles.fetch_add(1, Ordering::Relaxed) + 1;
                if overlapped <= 5 || overlapped % 1000 == 0 {
                    warn!(
                        "⚠️ {}: Cycle invoked while previous cycle still running (#{}), skipping",
                        self.direction.tag(),
                        overlapped
                    );
                }
                return;
            }
        };

        let contributors = self.gather(&mut buffers);
        if contributors == 0 {
            self.counters.silent_cycles.fetch_add(1, Ordering::Relaxed);
        } else {
            let MixBuffers { accumulator, output } = &mut *buffers;
            let normalization = normalize(accumulator, output, self.gain.get());
            self.counters.last_peak.store(normalization.peak, Ordering::Relaxed);
            if normalization.shrunk {
                self.counters.gain_shrinks.fetch_add(1, Ordering::Relaxed);
            }

            let delivered = self.distribute(output);
            self.log_cycle(contributors, delivered, &normalization);
        }
        drop(buffers);

        self.reschedule();
    }

    /// Sum every available source frame into the accumulator.
    /// Returns the number of contributing components.
    fn gather(&self, buffers: &mut MixBuffers) -> usize {
        let pass = self.source.begin_pass();
        let mut contributors = 0;

        for entry in &pass {
            let component = &entry.component;
            let produced = isolate(entry.id, "perform", || component.perform())
                .and_then(|_| isolate(entry.id, "get_data", || component.get_data()));

            let frame = match produced {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(error) => {
                    self.record_fault(&error);
                    continue;
                }
            };

            if frame.len() != self.frame_len {
                self.record_fault(&ComponentError::WrongFrameLength {
                    id: entry.id,
                    expected: self.frame_len,
                    actual: frame.len(),
                });
                continue;
            }

            if contributors == 0 {
                for (total, &sample) in buffers.accumulator.iter_mut().zip(frame.iter()) {
                    *total = sample as i32;
                }
            } else {
                for (total, &sample) in buffers.accumulator.iter_mut().zip(frame.iter()) {
                    *total += sample as i32;
                }
            }
            contributors += 1;
        }

        self.counters
            .frames_mixed
            .fetch_add(contributors as u64, Ordering::Relaxed);
        contributors
    }

    /// Offer the mixed frame to every destination component.
    /// Returns the number of successful deliveries.
    fn distribute(&self, frame: &[i16]) -> usize {
        let pass = self.destination.begin_pass();
        let mut delivered = 0;

        for entry in &pass {
            let component = &entry.component;
            match isolate(entry.id, "offer", || component.offer(frame)) {
                Ok(()) => delivered += 1,
                Err(error) => self.record_fault(&error),
            }
        }

        self.counters
            .frames_delivered
            .fetch_add(delivered as u64, Ordering::Relaxed);
        delivered
    }

    fn reschedule(&self) {
        self.counters.cycles.fetch_add(1, Ordering::Relaxed);

        // Cycles driven directly (not through the scheduler) never resubmit
        if self.lifecycle.load(Ordering::Acquire) & SCHEDULED == 0 {
            return;
        }
        if self.retire_if_cancelled() {
            debug!("{}: Cancelled, not rescheduling", self.direction.tag());
            return;
        }
        match self.this.upgrade() {
            Some(this) => self.scheduler.submit(this, self.queue),
            None => {
                self.lifecycle.fetch_and(!SCHEDULED, Ordering::AcqRel);
            }
        }
    }

    fn record_fault(&self, error: &ComponentError) {
        let faults = self.counters.component_faults.fetch_add(1, Ordering::Relaxed) + 1;
        if faults <= 10 || faults % 1000 == 0 {
            warn!(
                "⚠️ {}: Skipping component this cycle (fault #{}): {}",
                self.direction.tag(),
                faults,
                error
            );
        }
    }

    fn log_cycle(&self, contributors: usize, delivered: usize, normalization: &Normalization) {
        let cycle = self.counters.cycles.load(Ordering::Relaxed) + 1;
        if cycle <= 5 || cycle % 1000 == 0 {
            info!(
                "🎵 {}: Mixed {} frame(s) and offered to {} component(s) (cycle #{})",
                self.direction.tag(),
                contributors,
                delivered,
                cycle
            );
        }
        mix_debug!(
            "{}: cycle #{} peak {} gain {:.4}{}",
            self.direction.tag(),
            cycle,
            normalization.peak,
            normalization.effective_gain,
            if normalization.shrunk { " (shrunk)" } else { "" }
        );
    }
}

impl Task for DirectionalMixer {
    fn perform(&self) {
        self.mix_cycle();
    }

    fn cancel(&self) {
        DirectionalMixer::cancel(self);
    }

    fn is_cancelled(&self) -> bool {
        DirectionalMixer::is_cancelled(self)
    }

    fn skipped(&self) {
        self.on_skipped();
    }
}

impl std::fmt::Debug for DirectionalMixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionalMixer")
            .field("direction", &self.direction)
            .field("frame_len", &self.frame_len)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::component::{AudioComponent, MockAudioComponent};
    use crate::audio::types::Frame;
    use crate::scheduler::ManualScheduler;

    const FRAME_LEN: usize = 160;

    fn constant_frame(value: i16) -> Frame {
        vec![value; FRAME_LEN].into()
    }

    fn producer(id: ComponentId, value: i16) -> MockAudioComponent {
        let mut mock = MockAudioComponent::new();
        mock.expect_component_id().return_const(id);
        mock.expect_perform().returning(|| Ok(()));
        mock.expect_get_data()
            .returning(move || Ok(Some(constant_frame(value))));
        mock
    }

    struct Panicking;

    impl AudioComponent for Panicking {
        fn component_id(&self) -> ComponentId {
            3
        }
        fn perform(&self) -> Result<(), ComponentError> {
            Ok(())
        }
        fn get_data(&self) -> Result<Option<Frame>, ComponentError> {
            panic!("jitter buffer corrupted")
        }
        fn offer(&self, _frame: &[i16]) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    struct Fixture {
        scheduler: Arc<ManualScheduler>,
        inside: Arc<ComponentPool>,
        outside: Arc<ComponentPool>,
        mixer: Arc<DirectionalMixer>,
    }

    fn fixture(gain: f64) -> Fixture {
        let scheduler = Arc::new(ManualScheduler::new());
        let inside = Arc::new(ComponentPool::new("INSIDE_POOL"));
        let outside = Arc::new(ComponentPool::new("OUTSIDE_POOL"));
        let mixer = DirectionalMixer::new(
            MixDirection::InsideToOutside,
            inside.clone(),
            outside.clone(),
            Arc::new(SharedGain::new(gain)),
            scheduler.clone(),
            FRAME_LEN,
        );
        Fixture {
            scheduler,
            inside,
            outside,
            mixer,
        }
    }

    #[test]
    fn test_normalize_without_shrink_applies_gain() {
        let accumulator = vec![3000, -3000, 1, 0];
        let mut output = vec![0i16; 4];
        let result = normalize(&accumulator, &mut output, 1.0);
        assert_eq!(result.peak, 3000);
        assert!(!result.shrunk);
        assert_eq!(output, vec![3000, -3000, 1, 0]);

        let result = normalize(&accumulator, &mut output, 0.5);
        assert_eq!(result.effective_gain, 0.5);
        assert_eq!(output, vec![1500, -1500, 1, 0]);
    }

    #[test]
    fn test_normalize_rounds_halves_up() {
        let accumulator = vec![5, -5, 3, -3];
        let mut output = vec![0i16; 4];
        normalize(&accumulator, &mut output, 0.5);
        // 2.5 -> 3, -2.5 -> -2, 1.5 -> 2, -1.5 -> -1
        assert_eq!(output, vec![3, -2, 2, -1]);
    }

    #[test]
    fn test_normalize_just_below_half_rounds_down() {
        let below_half = 0.49999999999999994;
        let accumulator = vec![1, -1, 3];
        let mut output = vec![0i16; 3];
        normalize(&accumulator, &mut output, below_half);
        assert_eq!(output, vec![0, 0, 1]);
    }

    #[test]
    fn test_round_half_up_values() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(-0.50000000000000011), -1.0);
        assert_eq!(round_half_up(32766.5), 32767.0);
    }

    #[test]
    fn test_normalize_shrinks_on_overflow() {
        let accumulator = vec![60000; FRAME_LEN];
        let mut output = vec![0i16; FRAME_LEN];
        let result = normalize(&accumulator, &mut output, 1.0);
        assert!(result.shrunk);
        assert_eq!(result.peak, 60000);
        assert_eq!(result.effective_gain, 32767.0 / 60000.0);
        assert!(output.iter().all(|&s| s == i16::MAX));
    }

    #[test]
    fn test_normalize_negative_peak_drives_shrink() {
        let accumulator = vec![-65534, 10000, 0];
        let mut output = vec![0i16; 3];
        let result = normalize(&accumulator, &mut output, 1.0);
        assert_eq!(result.peak, 65534);
        assert!(result.shrunk);
        assert_eq!(output[0], -32767);
        assert_eq!(output[1], 5000);
    }

    #[test]
    fn test_normalize_with_negative_gain_inverts() {
        let accumulator = vec![1000, -1000];
        let mut output = vec![0i16; 2];
        let gain = crate::audio::mixer::types::convert_gain(-2.0);
        normalize(&accumulator, &mut output, gain);
        // 1000 / -2.52 = -396.8
        assert_eq!(output, vec![-397, 397]);
    }

    #[test]
    fn test_cycle_sums_and_delivers() {
        let f = fixture(1.0);
        f.inside.register(1, Arc::new(producer(1, 1000)));
        f.inside.register(2, Arc::new(producer(2, 2000)));

        let mut listener = MockAudioComponent::new();
        listener.expect_component_id().return_const(10u32);
        listener
            .expect_offer()
            .withf(|frame: &[i16]| frame.len() == FRAME_LEN && frame.iter().all(|&s| s == 3000))
            .times(1)
            .returning(|_| Ok(()));
        f.outside.register(10, Arc::new(listener));

        f.mixer.mix_cycle();

        let stats = f.mixer.get_stats();
        assert_eq!(stats.cycles, 1);
        assert_eq!(stats.frames_mixed, 2);
        assert_eq!(stats.frames_delivered, 1);
        assert_eq!(stats.last_peak, 3000);
        assert_eq!(stats.gain_shrinks, 0);
    }

    #[test]
    fn test_silent_cycle_skips_delivery_but_reschedules() {
        let f = fixture(1.0);
        let mut quiet = MockAudioComponent::new();
        quiet.expect_perform().times(1).returning(|| Ok(()));
        quiet.expect_get_data().times(1).returning(|| Ok(None));
        f.inside.register(1, Arc::new(quiet));

        let mut listener = MockAudioComponent::new();
        listener.expect_offer().never();
        f.outside.register(10, Arc::new(listener));

        assert!(f.mixer.start());
        assert_eq!(f.scheduler.run_tick(), 1);

        let stats = f.mixer.get_stats();
        assert_eq!(stats.silent_cycles, 1);
        assert_eq!(stats.cycles, 1);
        assert_eq!(f.scheduler.pending(QueueId::MIXER_MIX), 1);
    }

    #[test]
    fn test_faulty_producer_is_isolated() {
        let f = fixture(1.0);
        f.inside.register(1, Arc::new(producer(1, 1000)));

        let mut failing = MockAudioComponent::new();
        failing
            .expect_perform()
            .returning(|| Err(ComponentError::failed(2, "decoder underrun")));
        f.inside.register(2, Arc::new(failing));

        f.inside.register(3, Arc::new(Panicking));

        let mut short = MockAudioComponent::new();
        short.expect_perform().returning(|| Ok(()));
        short
            .expect_get_data()
            .returning(|| Ok(Some(vec![500i16; 80].into())));
        f.inside.register(4, Arc::new(short));

        let mut listener = MockAudioComponent::new();
        listener
            .expect_offer()
            .withf(|frame: &[i16]| frame.iter().all(|&s| s == 1000))
            .times(1)
            .returning(|_| Ok(()));
        f.outside.register(10, Arc::new(listener));

        f.mixer.mix_cycle();

        let stats = f.mixer.get_stats();
        assert_eq!(stats.component_faults, 3);
        assert_eq!(stats.frames_mixed, 1);
        assert_eq!(stats.frames_delivered, 1);
    }

    #[test]
    fn test_faulty_recipient_does_not_block_others() {
        let f = fixture(1.0);
        f.inside.register(1, Arc::new(producer(1, 100)));

        let mut failing = MockAudioComponent::new();
        failing
            .expect_offer()
            .returning(|_| Err(ComponentError::failed(10, "socket closed")));
        f.outside.register(10, Arc::new(failing));

        let mut healthy = MockAudioComponent::new();
        healthy.expect_offer().times(1).returning(|_| Ok(()));
        f.outside.register(11, Arc::new(healthy));

        f.mixer.mix_cycle();

        let stats = f.mixer.get_stats();
        assert_eq!(stats.component_faults, 1);
        assert_eq!(stats.frames_delivered, 1);
    }

    #[test]
    fn test_start_twice_submits_once() {
        let f = fixture(1.0);
        assert!(f.mixer.start());
        assert!(!f.mixer.start());
        assert_eq!(f.scheduler.pending(QueueId::MIXER_MIX), 1);
    }

    #[test]
    fn test_cancel_suppresses_resubmission() {
        let f = fixture(1.0);
        f.inside.register(1, Arc::new(producer(1, 100)));
        f.mixer.start();
        assert_eq!(f.scheduler.run_ticks(3), 3);

        f.mixer.cancel();
        assert!(f.mixer.is_cancelled());
        // The queued entry runs as a no-op and is not resubmitted
        f.scheduler.run_ticks(3);
        assert_eq!(f.scheduler.pending(QueueId::MIXER_MIX), 0);
        assert_eq!(f.mixer.cycles(), 3);

        // Restart after the queue drained submits again
        assert!(f.mixer.start());
        assert_eq!(f.scheduler.run_tick(), 1);
        assert_eq!(f.mixer.cycles(), 4);
    }

    #[test]
    fn test_restart_before_queue_drains_reuses_submission() {
        let f = fixture(1.0);
        f.mixer.start();
        f.mixer.cancel();
        assert!(!f.mixer.start());
        assert_eq!(f.scheduler.pending(QueueId::MIXER_MIX), 1);
        f.scheduler.run_tick();
        assert_eq!(f.scheduler.pending(QueueId::MIXER_MIX), 1);
    }

    #[test]
    fn test_scheduler_drops_entry_after_cancel() {
        let f = fixture(1.0);
        f.inside.register(1, Arc::new(producer(1, 100)));
        f.mixer.start();
        f.scheduler.run_tick();

        f.mixer.cancel();
        assert_eq!(f.scheduler.run_tick(), 0);
        assert_eq!(f.mixer.cycles(), 1);
        let info = f.scheduler.queue_info(QueueId::MIXER_MIX).unwrap();
        assert_eq!(info.total_skipped_cancelled, 1);

        // The dropped entry released the scheduled slot
        assert!(f.mixer.start());
        assert_eq!(f.scheduler.run_tick(), 1);
    }

    #[test]
    fn test_skip_racing_a_restart_requeues() {
        let f = fixture(1.0);
        f.mixer.start();
        f.mixer.cancel();
        // Restart lands after the dequeue check saw the cancellation
        assert!(!f.mixer.start());
        Task::skipped(f.mixer.as_ref());

        assert!(!f.mixer.is_cancelled());
        assert_eq!(f.scheduler.pending(QueueId::MIXER_MIX), 2);
    }

    #[test]
    fn test_direct_cycle_on_idle_mixer_does_not_submit() {
        let f = fixture(1.0);
        f.inside.register(1, Arc::new(producer(1, 100)));
        f.mixer.mix_cycle();
        assert_eq!(f.scheduler.pending(QueueId::MIXER_MIX), 0);
        assert_eq!(f.mixer.cycles(), 1);
    }

    #[test]
    fn test_accumulator_is_reused_between_cycles() {
        let f = fixture(1.0);
        let producer_a: Arc<dyn AudioComponent> = Arc::new(producer(1, 700));
        f.inside.register(1, producer_a);

        let mut listener = MockAudioComponent::new();
        let mut seq = mockall::Sequence::new();
        listener
            .expect_offer()
            .withf(|frame: &[i16]| frame.iter().all(|&s| s == 700))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        listener
            .expect_offer()
            .withf(|frame: &[i16]| frame.iter().all(|&s| s == -50))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        f.outside.register(10, Arc::new(listener));

        f.mixer.mix_cycle();
        f.inside.remove(1);
        f.inside.register(2, Arc::new(producer(2, -50)));
        f.mixer.mix_cycle();

        assert_eq!(f.mixer.get_stats().cycles, 2);
    }
}
