#![allow(dead_code)]

use bridge_splitter::audio::{AudioComponent, ComponentError, ComponentId, Frame};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const FRAME_LEN: usize = 160;

/// Produces the same frame every cycle
pub struct ConstantSource {
    id: ComponentId,
    frame: Frame,
    pub performs: AtomicUsize,
}

impl ConstantSource {
    pub fn new(id: ComponentId, value: i16) -> Arc<Self> {
        Self::with_len(id, value, FRAME_LEN)
    }

    pub fn with_len(id: ComponentId, value: i16, len: usize) -> Arc<Self> {
        Arc::new(Self {
            id,
            frame: vec![value; len].into(),
            performs: AtomicUsize::new(0),
        })
    }
}

impl AudioComponent for ConstantSource {
    fn component_id(&self) -> ComponentId {
        self.id
    }

    fn perform(&self) -> Result<(), ComponentError> {
        self.performs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_data(&self) -> Result<Option<Frame>, ComponentError> {
        Ok(Some(self.frame.clone()))
    }

    fn offer(&self, _frame: &[i16]) -> Result<(), ComponentError> {
        Ok(())
    }
}

/// Records every frame offered to it
pub struct RecordingSink {
    id: ComponentId,
    received: Mutex<Vec<Vec<i16>>>,
}

impl RecordingSink {
    pub fn new(id: ComponentId) -> Arc<Self> {
        Arc::new(Self {
            id,
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn frames(&self) -> Vec<Vec<i16>> {
        self.received.lock().unwrap().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn last_frame(&self) -> Option<Vec<i16>> {
        self.received.lock().unwrap().last().cloned()
    }
}

impl AudioComponent for RecordingSink {
    fn component_id(&self) -> ComponentId {
        self.id
    }

    fn perform(&self) -> Result<(), ComponentError> {
        Ok(())
    }

    fn get_data(&self) -> Result<Option<Frame>, ComponentError> {
        Ok(None)
    }

    fn offer(&self, frame: &[i16]) -> Result<(), ComponentError> {
        self.received.lock().unwrap().push(frame.to_vec());
        Ok(())
    }
}

/// Fails every operation
pub struct BrokenLeg {
    id: ComponentId,
}

impl BrokenLeg {
    pub fn new(id: ComponentId) -> Arc<Self> {
        Arc::new(Self { id })
    }
}

impl AudioComponent for BrokenLeg {
    fn component_id(&self) -> ComponentId {
        self.id
    }

    fn perform(&self) -> Result<(), ComponentError> {
        Err(ComponentError::failed(self.id, "transcoder unavailable"))
    }

    fn get_data(&self) -> Result<Option<Frame>, ComponentError> {
        Err(ComponentError::failed(self.id, "transcoder unavailable"))
    }

    fn offer(&self, _frame: &[i16]) -> Result<(), ComponentError> {
        Err(ComponentError::failed(self.id, "transport closed"))
    }
}

pub fn assert_constant(frame: &[i16], expected: i16) {
    assert_eq!(frame.len(), FRAME_LEN);
    assert!(
        frame.iter().all(|&s| s == expected),
        "expected every sample to be {}, got {:?}",
        expected,
        &frame[..4]
    );
}
