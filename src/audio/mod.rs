// Audio module - bridge mixing engine
//
// This module provides the audio side of a media bridge broken down into logical components:
// - types: Frame format, configuration and error types
// - component: Contract implemented by every call leg plugged into a bridge
// - mixer: Component pools, directional mixers and the splitter that owns them

pub mod component;
pub mod mixer;
pub mod types;

// Re-export commonly used types for easier imports
pub use types::{
    ComponentError, ComponentId, Frame, SplitterConfig, SplitterError, DEFAULT_CHANNELS,
    DEFAULT_FRAME_PERIOD_NANOS, DEFAULT_SAMPLE_RATE, DEFAULT_SAMPLE_SIZE_BITS, SAMPLE_MAX,
};

pub use component::AudioComponent;

pub use mixer::{
    convert_gain, normalize, ComponentPool, DirectionalMixer, MixDirection, MixerStats,
    Normalization, Splitter, SplitterConfigUtils, SplitterStats,
};
