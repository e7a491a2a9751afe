// Audio component contract
//
// Call legs plug into the splitter through this trait. The splitter never owns
// the media logic behind it: codecs, jitter buffers and the like live in the
// implementations. All methods are called from scheduler workers on the mixing
// hot path and must not block.

use super::types::{ComponentError, ComponentId, Frame};

/// A producer/consumer of audio frames registered on one side of a splitter
#[cfg_attr(test, mockall::automock)]
pub trait AudioComponent: Send + Sync {
    /// Identity of the component; must stay stable while it is registered
    fn component_id(&self) -> ComponentId;

    /// Advance production for the current cycle
    fn perform(&self) -> Result<(), ComponentError>;

    /// Frame produced for the current cycle, or `None` if the component has
    /// nothing to contribute. The frame must hold exactly one frame's worth of
    /// samples.
    fn get_data(&self) -> Result<Option<Frame>, ComponentError>;

    /// Deliver a mixed frame. The slice is shared with every other recipient
    /// of the same cycle.
    fn offer(&self, frame: &[i16]) -> Result<(), ComponentError>;
}
