// Audio splitter: the bridge-level mixing engine
//
// Owns the inside and outside component pools, the gain shared by both
// mixers, and the two directional mixers bound to the scheduler's mixing
// queue. Call-control code registers legs here and drives the lifecycle; all
// public mutators are fire-and-forget and never fail.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use super::component_pool::ComponentPool;
use super::directional_mixer::DirectionalMixer;
use super::types::{convert_gain, MixDirection, SharedGain, SplitterStats};
use super::validation::{validate_config, validate_gain};
use crate::audio::component::AudioComponent;
use crate::audio::types::{ComponentId, SplitterConfig, SplitterError};
use crate::scheduler::Scheduler;

/// Compound inside/outside audio splitter
pub struct Splitter {
    config: SplitterConfig,
    packet_size: usize,
    frame_len: usize,
    gain: Arc<SharedGain>,
    inside_components: Arc<ComponentPool>,
    outside_components: Arc<ComponentPool>,
    // Mixes inside legs and feeds the outside
    inside_mixer: Arc<DirectionalMixer>,
    // Mixes outside legs and feeds the inside
    outside_mixer: Arc<DirectionalMixer>,
    started: AtomicBool,
}

impl Splitter {
    /// Splitter with 20ms narrowband frames
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self::build(scheduler, SplitterConfig::default())
    }

    /// Splitter with a custom frame format
    pub fn with_config(
        scheduler: Arc<dyn Scheduler>,
        config: SplitterConfig,
    ) -> Result<Self, SplitterError> {
        validate_config(&config).map_err(|e| SplitterError::Configuration(e.to_string()))?;
        Ok(Self::build(scheduler, config))
    }

    fn build(scheduler: Arc<dyn Scheduler>, config: SplitterConfig) -> Self {
        let packet_size = config.packet_size();
        let frame_len = config.frame_len();
        let gain = Arc::new(SharedGain::new(config.gain.map(convert_gain).unwrap_or(1.0)));

        let inside_components = Arc::new(ComponentPool::new("INSIDE_POOL"));
        let outside_components = Arc::new(ComponentPool::new("OUTSIDE_POOL"));

        let inside_mixer = DirectionalMixer::new(
            MixDirection::InsideToOutside,
            inside_components.clone(),
            outside_components.clone(),
            gain.clone(),
            scheduler.clone(),
            frame_len,
        );
        let outside_mixer = DirectionalMixer::new(
            MixDirection::OutsideToInside,
            outside_components.clone(),
            inside_components.clone(),
            gain.clone(),
            scheduler,
            frame_len,
        );

        info!(
            "🏗️ SPLITTER: Created (packet: {} bytes, frame: {} samples, period: {:?})",
            packet_size,
            frame_len,
            config.frame_period()
        );

        Self {
            config,
            packet_size,
            frame_len,
            gain,
            inside_components,
            outside_components,
            inside_mixer,
            outside_mixer,
            started: AtomicBool::new(false),
        }
    }

    pub fn add_inside_component(&self, component: Arc<dyn AudioComponent>) {
        self.inside_components
            .register(component.component_id(), component);
    }

    pub fn add_outside_component(&self, component: Arc<dyn AudioComponent>) {
        self.outside_components
            .register(component.component_id(), component);
    }

    /// Releases inside component
    pub fn release_inside_component(&self, component: &dyn AudioComponent) {
        self.release_inside_by_id(component.component_id());
    }

    /// Releases outside component
    pub fn release_outside_component(&self, component: &dyn AudioComponent) {
        self.release_outside_by_id(component.component_id());
    }

    pub fn release_inside_by_id(&self, id: ComponentId) {
        self.inside_components.remove(id);
    }

    pub fn release_outside_by_id(&self, id: ComponentId) {
        self.outside_components.remove(id);
    }

    /// Modify gain of the output stream. Takes effect from the next cycle.
    /// Non-finite values are ignored.
    pub fn set_gain(&self, gain: f64) {
        if let Err(e) = validate_gain(gain) {
            warn!("⚠️ SPLITTER: Ignoring gain {}: {}", gain, e);
            return;
        }
        let multiplier = convert_gain(gain);
        self.gain.set(multiplier);
        info!("🎚️ SPLITTER: Set gain {} (multiplier {:.4})", gain, multiplier);
    }

    /// Current gain multiplier
    pub fn gain(&self) -> f64 {
        self.gain.get()
    }

    /// Begin bridging: reset the cycle counters and submit both mixers once.
    /// Has no effect while already running.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inside_mixer.reset_cycles();
        self.outside_mixer.reset_cycles();
        self.inside_mixer.start();
        self.outside_mixer.start();
        info!(
            "▶️ SPLITTER: Started (inside: {}, outside: {})",
            self.inside_components.len(),
            self.outside_components.len()
        );
    }

    /// End bridging. Once this returns neither mixer is submitted again.
    pub fn stop(&self) {
        if !self.started.swap(false, Ordering::SeqCst) {
            return;
        }
        self.inside_mixer.cancel();
        self.outside_mixer.cancel();
        info!("⏹️ SPLITTER: Stopped after {} cycles", self.mix_count());
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Packet size in bytes
    pub fn packet_size(&self) -> usize {
        self.packet_size
    }

    /// Samples per frame
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Cycles run by both mixers since the last start
    pub fn mix_count(&self) -> u64 {
        self.inside_mixer.cycles() + self.outside_mixer.cycles()
    }

    pub fn inside_count(&self) -> usize {
        self.inside_components.len()
    }

    pub fn outside_count(&self) -> usize {
        self.outside_components.len()
    }

    pub fn inside_mixer(&self) -> &Arc<DirectionalMixer> {
        &self.inside_mixer
    }

    pub fn outside_mixer(&self) -> &Arc<DirectionalMixer> {
        &self.outside_mixer
    }

    pub fn stats(&self) -> SplitterStats {
        SplitterStats {
            is_running: self.is_running(),
            gain: self.gain(),
            inside_components: self.inside_count(),
            outside_components: self.outside_count(),
            inside_mixer: self.inside_mixer.get_stats(),
            outside_mixer: self.outside_mixer.get_stats(),
        }
    }
}

impl Drop for Splitter {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Splitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Splitter")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("inside", &self.inside_components)
            .field("outside", &self.outside_components)
            .finish()
    }
}
