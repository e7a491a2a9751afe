// Core mixer types and data structures
//
// Shared gain cell, mixing direction, statistics snapshots and configuration
// presets used by the splitter and its directional mixers.

use std::sync::atomic::{AtomicU64, Ordering};

use super::super::types::{SplitterConfig, DEFAULT_FRAME_PERIOD_NANOS};

/// Multiplier applied per unit of configured positive gain
pub const GAIN_STEP: f64 = 1.26;

/// Convert a configured gain value into the multiplier applied to mixed samples.
///
/// Positive values scale by 1.26 per unit, zero means unity, and negative values
/// yield the reciprocal of the scaled value. The negative branch produces a
/// negative multiplier (phase inversion); it is kept as-is for compatibility
/// with existing bridge configurations.
pub fn convert_gain(gain: f64) -> f64 {
    if gain > 0.0 {
        gain * GAIN_STEP
    } else if gain == 0.0 {
        1.0
    } else {
        1.0 / (gain * GAIN_STEP)
    }
}

/// Gain multiplier shared between a splitter and its mixers.
/// Writes are last-writer-wins; readers pick up the new value on their next cycle.
#[derive(Debug)]
pub struct SharedGain {
    bits: AtomicU64,
}

impl SharedGain {
    pub fn new(multiplier: f64) -> Self {
        Self {
            bits: AtomicU64::new(multiplier.to_bits()),
        }
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn set(&self, multiplier: f64) {
        self.bits.store(multiplier.to_bits(), Ordering::Relaxed);
    }
}

impl Default for SharedGain {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Which side feeds which
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixDirection {
    /// Inside components are mixed and offered to outside components
    InsideToOutside,
    /// Outside components are mixed and offered to inside components
    OutsideToInside,
}

impl MixDirection {
    /// Tag used in log lines
    pub fn tag(&self) -> &'static str {
        match self {
            MixDirection::InsideToOutside => "MIXER_INSIDE",
            MixDirection::OutsideToInside => "MIXER_OUTSIDE",
        }
    }
}

impl std::fmt::Display for MixDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MixDirection::InsideToOutside => write!(f, "inside->outside"),
            MixDirection::OutsideToInside => write!(f, "outside->inside"),
        }
    }
}

/// Result of normalizing one accumulated frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Largest magnitude in the raw sum
    pub peak: i64,
    /// Multiplier actually applied to the frame
    pub effective_gain: f64,
    /// Whether the configured gain had to be reduced to fit the sample range
    pub shrunk: bool,
}

/// Per-mixer statistics snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct MixerStats {
    pub direction: MixDirection,
    pub cycles: u64,
    pub frames_mixed: u64,
    pub frames_delivered: u64,
    pub silent_cycles: u64,
    pub gain_shrinks: u64,
    pub component_faults: u64,
    pub overlapped_cycles: u64,
    pub last_peak: i64,
}

/// Splitter-wide statistics snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SplitterStats {
    pub is_running: bool,
    pub gain: f64,
    pub inside_components: usize,
    pub outside_components: usize,
    pub inside_mixer: MixerStats,
    pub outside_mixer: MixerStats,
}

impl SplitterStats {
    /// Total cycles run by both mixers
    pub fn mix_count(&self) -> u64 {
        self.inside_mixer.cycles + self.outside_mixer.cycles
    }

    pub fn get_summary(&self) -> String {
        format!(
            "{} - inside: {} components, outside: {} components, {} cycles, {} faults, gain {:.3}",
            if self.is_running { "Running" } else { "Stopped" },
            self.inside_components,
            self.outside_components,
            self.mix_count(),
            self.inside_mixer.component_faults + self.outside_mixer.component_faults,
            self.gain
        )
    }
}

/// Configuration utilities for splitter setup
pub struct SplitterConfigUtils;

impl SplitterConfigUtils {
    /// 20ms narrowband frames (8kHz, 16-bit, mono)
    pub fn default_config() -> SplitterConfig {
        SplitterConfig::default()
    }

    /// 20ms wideband frames (16kHz, 16-bit, mono)
    pub fn wideband_config() -> SplitterConfig {
        SplitterConfig {
            sample_rate: 16000,
            ..SplitterConfig::default()
        }
    }

    /// 10ms narrowband frames for lower bridge latency
    pub fn low_latency_config() -> SplitterConfig {
        SplitterConfig {
            frame_period_nanos: DEFAULT_FRAME_PERIOD_NANOS / 2,
            ..SplitterConfig::default()
        }
    }
}
