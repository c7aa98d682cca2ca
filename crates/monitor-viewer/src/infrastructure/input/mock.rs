//! Scripted input source for unit testing.
//!
//! Each call to `poll` hands out the next queued batch, then empty batches
//! once the script runs out, mimicking a keyboard that goes quiet.

use std::collections::VecDeque;

use monitor_core::KeyTransition;

use crate::application::scheduler::InputSource;

/// An [`InputSource`] that replays pre-recorded batches.
#[derive(Debug, Default)]
pub struct ScriptedInputSource {
    batches: VecDeque<Vec<KeyTransition>>,
    polls: usize,
}

impl ScriptedInputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a batch returned by one future `poll`.
    pub fn push_batch(&mut self, batch: Vec<KeyTransition>) {
        self.batches.push_back(batch);
    }

    /// Number of times `poll` has been called.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl InputSource for ScriptedInputSource {
    fn poll(&mut self) -> Vec<KeyTransition> {
        self.polls += 1;
        self.batches.pop_front().unwrap_or_default()
    }
}
