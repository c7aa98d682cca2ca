//! Recording render sink for tests.
//!
//! Keeps a copy of every presented frame; `fail_next` makes the next
//! `present` return an error instead.

use monitor_core::{Color, Grid};

use crate::application::refresh_frame::{RenderError, RenderSink};

/// A [`RenderSink`] that records frames in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Grid<Color>>,
    pub fail_next: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Grid<Color>> {
        self.frames.last()
    }
}

impl RenderSink for RecordingSink {
    fn present(&mut self, frame: &Grid<Color>) -> Result<(), RenderError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(RenderError::Sink("injected present failure".to_string()));
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}
