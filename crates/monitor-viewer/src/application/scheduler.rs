//! RedrawScheduler: the viewer's cooperative main loop.
//!
//! One iteration:
//!
//! ```text
//! drain input ──► keyboard bridge (immediate shared-memory writes)
//! sleep one tick
//! tick counter += 1; on every `redraw_divisor`-th tick ──► refresh + present
//! ```
//!
//! Input polling never blocks, so a quiet keyboard cannot stall redraws.
//! Any store, decode, or sink failure ends the loop and is returned to the
//! caller; the viewer does not keep redrawing against a broken segment.

use std::time::Duration;

use monitor_core::KeyTransition;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use super::keyboard_bridge::{BridgeError, KeyboardBridgeUseCase};
use super::refresh_frame::{RefreshError, RefreshFrameUseCase, RenderSink};

/// Default sleep between iterations.
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);

/// Default number of ticks per redraw.
pub const DEFAULT_REDRAW_DIVISOR: u32 = 10;

/// Error type for the scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("redraw divisor must be at least 1")]
    ZeroDivisor,
    #[error(transparent)]
    Keyboard(#[from] BridgeError),
    #[error(transparent)]
    Refresh(#[from] RefreshError),
}

/// A non-blocking source of key transitions.
pub trait InputSource {
    /// Returns every transition that arrived since the last call, oldest
    /// first.  Returns an empty vector when nothing is pending.
    fn poll(&mut self) -> Vec<KeyTransition>;
}

/// Tick length and redraw divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub tick: Duration,
    pub redraw_divisor: u32,
}

impl Default for Cadence {
    /// 50 ms ticks, one redraw every 10 ticks.
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            redraw_divisor: DEFAULT_REDRAW_DIVISOR,
        }
    }
}

/// Result of a single [`RedrawScheduler::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub events: usize,
    pub redrawn: bool,
}

/// Totals accumulated over the scheduler's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub events: u64,
    pub frames: u64,
}

/// Drives input servicing and redraws at a fixed cadence.
#[derive(Debug)]
pub struct RedrawScheduler {
    cadence: Cadence,
    counter: u32,
    summary: RunSummary,
}

impl RedrawScheduler {
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroDivisor`] if `cadence.redraw_divisor` is 0.
    pub fn new(cadence: Cadence) -> Result<Self, SchedulerError> {
        if cadence.redraw_divisor == 0 {
            return Err(SchedulerError::ZeroDivisor);
        }
        Ok(Self {
            cadence,
            counter: 0,
            summary: RunSummary::default(),
        })
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Applies every pending transition to the keyboard bridge.
    ///
    /// # Errors
    ///
    /// Returns the first keyboard write failure; later transitions in the
    /// same batch are not applied.
    pub fn service_input(
        &mut self,
        input: &mut dyn InputSource,
        keyboard: &mut KeyboardBridgeUseCase,
    ) -> Result<usize, SchedulerError> {
        let events = input.poll();
        for event in &events {
            keyboard.apply_event(event.transition, event.key)?;
        }
        self.summary.events += events.len() as u64;
        Ok(events.len())
    }

    /// Counts one tick and redraws when the counter reaches the divisor.
    ///
    /// Returns `true` if a frame was presented.
    ///
    /// # Errors
    ///
    /// Returns the refresh failure, if a redraw was due and failed.
    pub fn advance_tick(
        &mut self,
        refresh: &mut RefreshFrameUseCase,
        sink: &mut dyn RenderSink,
    ) -> Result<bool, SchedulerError> {
        self.summary.ticks += 1;
        self.counter += 1;
        if self.counter < self.cadence.redraw_divisor {
            return Ok(false);
        }
        self.counter = 0;
        refresh.refresh(sink)?;
        self.summary.frames += 1;
        Ok(true)
    }

    /// One iteration without the sleep: service input, then count a tick.
    ///
    /// # Errors
    ///
    /// See [`service_input`](Self::service_input) and
    /// [`advance_tick`](Self::advance_tick).
    pub fn step(
        &mut self,
        input: &mut dyn InputSource,
        keyboard: &mut KeyboardBridgeUseCase,
        refresh: &mut RefreshFrameUseCase,
        sink: &mut dyn RenderSink,
    ) -> Result<StepReport, SchedulerError> {
        let events = self.service_input(input, keyboard)?;
        let redrawn = self.advance_tick(refresh, sink)?;
        Ok(StepReport { events, redrawn })
    }

    /// Runs until `shutdown` changes (or its sender is dropped) or a step
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchedulerError`] raised by a step.
    pub async fn run(
        &mut self,
        input: &mut dyn InputSource,
        keyboard: &mut KeyboardBridgeUseCase,
        refresh: &mut RefreshFrameUseCase,
        sink: &mut dyn RenderSink,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<RunSummary, SchedulerError> {
        info!(
            tick_ms = self.cadence.tick.as_millis() as u64,
            redraw_divisor = self.cadence.redraw_divisor,
            "scheduler started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.service_input(input, keyboard)?;

            tokio::select! {
                _ = tokio::time::sleep(self.cadence.tick) => {}
                _ = shutdown.changed() => break,
            }

            if self.advance_tick(refresh, sink)? {
                debug!(frames = self.summary.frames, "redraw");
            }
        }

        info!(
            ticks = self.summary.ticks,
            events = self.summary.events,
            frames = self.summary.frames,
            "scheduler stopped"
        );
        Ok(self.summary)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
