// Audio mixer module - inside/outside splitter and its directional mixers

pub mod component_pool;
pub mod directional_mixer;
pub mod splitter;
pub mod types;
pub mod validation;

pub use component_pool::{ComponentPool, PoolEntry, PoolPass};
pub use directional_mixer::{normalize, DirectionalMixer};
pub use splitter::Splitter;
pub use types::{
    convert_gain, MixDirection, MixerStats, Normalization, SharedGain, SplitterConfigUtils,
    SplitterStats,
};
