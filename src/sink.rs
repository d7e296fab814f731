//! Render sinks - consumers of per-frame transforms

use crate::error::SinkError;
use crate::scene::{Frame, Scene};

/// Accepts one frame per tick; the scene is passed for static data
/// (items, anchor, rings) that frames do not repeat
pub trait RenderSink {
    fn submit(&mut self, frame: &Frame, scene: &Scene) -> Result<(), SinkError>;
}

/// Keeps every `every`-th frame, for headless dumps
#[derive(Debug)]
pub struct FrameRecorder {
    every: u64,
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: Vec::new(),
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl Default for FrameRecorder {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RenderSink for FrameRecorder {
    fn submit(&mut self, frame: &Frame, _scene: &Scene) -> Result<(), SinkError> {
        if frame.tick % self.every == 0 {
            self.frames.push(frame.clone());
        }
        Ok(())
    }
}
