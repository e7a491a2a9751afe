pub mod audio;
pub mod log;
pub mod scheduler;

// Re-export the bridge surface for embedders and tests
pub use audio::{
    AudioComponent, ComponentError, ComponentId, Frame, MixDirection, MixerStats, Splitter,
    SplitterConfig, SplitterConfigUtils, SplitterError, SplitterStats,
};
pub use scheduler::{ManualScheduler, PeriodicScheduler, QueueId, Scheduler, Task};
