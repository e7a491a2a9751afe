use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default frame period: 20ms
pub const DEFAULT_FRAME_PERIOD_NANOS: u64 = 20_000_000;
/// Narrowband telephony rate
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;
/// Linear 16-bit PCM
pub const DEFAULT_SAMPLE_SIZE_BITS: u32 = 16;
pub const DEFAULT_CHANNELS: u16 = 1;

/// Largest magnitude a mixed sample may take before the gain is shrunk
pub const SAMPLE_MAX: i32 = i16::MAX as i32;

/// Identifier of a component, unique within one pool
pub type ComponentId = u32;

/// One frame of linear PCM as produced by a component
pub type Frame = std::sync::Arc<[i16]>;

/// Splitter construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    pub frame_period_nanos: u64,
    pub sample_rate: u32,
    pub sample_size_bits: u32,
    pub channels: u16,
    /// Configured gain, passed through the gain conversion rule at construction.
    /// Absent means unity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain: Option<f64>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            frame_period_nanos: DEFAULT_FRAME_PERIOD_NANOS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            sample_size_bits: DEFAULT_SAMPLE_SIZE_BITS,
            channels: DEFAULT_CHANNELS,
            gain: None,
        }
    }
}

impl SplitterConfig {
    /// Packet size in bytes for one frame period
    pub fn packet_size(&self) -> usize {
        let period_ms = self.frame_period_nanos / 1_000_000;
        let bytes = period_ms * self.sample_rate as u64 / 1000 * self.sample_size_bits as u64 / 8;
        bytes as usize * self.channels as usize
    }

    /// Number of samples in one frame
    pub fn frame_len(&self) -> usize {
        let bytes_per_sample = (self.sample_size_bits / 8).max(1) as usize;
        self.packet_size() / bytes_per_sample
    }

    pub fn frame_period(&self) -> std::time::Duration {
        std::time::Duration::from_nanos(self.frame_period_nanos)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SplitterError> {
        serde_json::from_str(json).map_err(SplitterError::ConfigParse)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SplitterError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }
}

/// Errors raised when building a splitter
#[derive(Debug, thiserror::Error)]
pub enum SplitterError {
    #[error("Invalid splitter configuration: {0}")]
    Configuration(String),

    #[error("Failed to read splitter configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse splitter configuration: {0}")]
    ConfigParse(#[source] serde_json::Error),
}

/// Misbehaviour of a registered component during a mixing cycle
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComponentError {
    #[error("Component {id} failed: {reason}")]
    Failed { id: ComponentId, reason: String },

    #[error("Component {id} panicked during {operation}")]
    Panicked { id: ComponentId, operation: &'static str },

    #[error("Component {id} produced {actual} samples (expected {expected})")]
    WrongFrameLength {
        id: ComponentId,
        expected: usize,
        actual: usize,
    },
}

impl ComponentError {
    pub fn failed(id: ComponentId, reason: impl Into<String>) -> Self {
        Self::Failed {
            id,
            reason: reason.into(),
        }
    }
}
