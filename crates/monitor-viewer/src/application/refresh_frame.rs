//! RefreshFrameUseCase: reads the grid from the frame store and presents it.
//!
//! The use case owns a scratch byte buffer and a reusable color grid, so a
//! steady-state redraw performs no allocation.  Failures are reported to the
//! caller as-is; retrying on the next tick or stopping is the caller's call.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use monitor_core::{Color, DecodeError, FrameDecoder, Grid};
use thiserror::Error;
use tracing::trace;

use super::frame_store::{FrameStore, StoreError};

/// Error type for rendering sinks.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write frame to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("render sink error: {0}")]
    Sink(String),
}

/// Error type for the refresh use case.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("failed to read frame: {0}")]
    Store(#[from] StoreError),
    #[error("failed to decode frame: {0}")]
    Decode(#[from] DecodeError),
    #[error("failed to present frame: {0}")]
    Render(#[from] RenderError),
}

/// Receives one decoded frame per redraw.
///
/// Window-backed sinks would flip their surface here; the headless sink in
/// `infrastructure::render` writes an image file.
#[cfg_attr(test, mockall::automock)]
pub trait RenderSink {
    /// Presents a `width × height` frame addressed `[x][y]`.
    fn present(&mut self, frame: &Grid<Color>) -> Result<(), RenderError>;
}

/// The Refresh Frame use case.
pub struct RefreshFrameUseCase {
    store: Arc<dyn FrameStore>,
    decoder: FrameDecoder,
    raw: Vec<u8>,
    frame: Grid<Color>,
    frames_presented: u64,
}

impl RefreshFrameUseCase {
    pub fn new(store: Arc<dyn FrameStore>, decoder: FrameDecoder) -> Self {
        let layout = *decoder.layout();
        Self {
            store,
            raw: vec![0; layout.grid_len()],
            frame: Grid::filled(layout.width(), layout.height(), Color::default()),
            decoder,
            frames_presented: 0,
        }
    }

    /// Reads exactly `width * height` bytes from offset 0 and decodes them.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Store`] if the read fails or comes up short.
    pub fn decode_frame(&mut self) -> Result<&Grid<Color>, RefreshError> {
        self.store.read_into(0, &mut self.raw)?;
        self.decoder.decode_into(&self.raw, &mut self.frame)?;
        Ok(&self.frame)
    }

    /// Decodes the current frame and hands it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RefreshError`] from reading, decoding, or
    /// presenting.
    pub fn refresh(&mut self, sink: &mut dyn RenderSink) -> Result<(), RefreshError> {
        let frame = self.decode_frame()?;
        sink.present(frame)?;
        self.frames_presented += 1;
        trace!(frame = self.frames_presented, "frame presented");
        Ok(())
    }

    /// Number of frames successfully presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::shm::memory::MemoryFrameStore;
    use monitor_core::{ColorTable, FrameLayout};

    fn make_use_case(bytes: Vec<u8>) -> (RefreshFrameUseCase, Arc<MemoryFrameStore>) {
        let layout = FrameLayout::new(3, 2).unwrap();
        let store = Arc::new(MemoryFrameStore::from_bytes(bytes));
        let uc = RefreshFrameUseCase::new(
            Arc::clone(&store) as Arc<dyn FrameStore>,
            FrameDecoder::new(layout, ColorTable::c64()),
        );
        (uc, store)
    }

    #[test]
    fn test_decode_frame_reads_grid_from_store() {
        // Arrange
        let (mut uc, _) = make_use_case(vec![0, 1, 2, 3, 4, 5, 0xFF, 0xFF]);

        // Act
        let frame = uc.decode_frame().unwrap();

        // Assert
        let table = ColorTable::c64();
        assert_eq!(frame[0][0], table.lookup(0));
        assert_eq!(frame[2][0], table.lookup(2));
        assert_eq!(frame[0][1], table.lookup(3));
        assert_eq!(frame[2][1], table.lookup(5));
    }

    #[test]
    fn test_decode_frame_sees_new_bytes_on_next_call() {
        let (mut uc, store) = make_use_case(vec![0; 8]);
        uc.decode_frame().unwrap();
        store.set_byte(4, 0x17);
        assert_eq!(uc.decode_frame().unwrap()[1][1], ColorTable::c64().lookup(7));
    }

    #[test]
    fn test_short_store_reports_read_error() {
        // Arrange: 5 bytes cannot hold a 3x2 grid
        let (mut uc, _) = make_use_case(vec![0; 5]);

        // Act
        let err = uc.decode_frame().unwrap_err();

        // Assert
        match err {
            RefreshError::Store(inner) => {
                assert_eq!(inner.operation(), "read");
                assert_eq!(inner.kind(), Some(io::ErrorKind::UnexpectedEof));
            }
            other => panic!("expected store error, got {other:?}"),
        }
    }

    #[test]
    fn test_refresh_presents_decoded_frame_once() {
        // Arrange
        let (mut uc, _) = make_use_case(vec![1; 8]);
        let white = ColorTable::c64().lookup(1);
        let mut sink = MockRenderSink::new();
        sink.expect_present()
            .withf(move |frame| frame.width() == 3 && frame.cells().all(|&c| c == white))
            .times(1)
            .returning(|_| Ok(()));

        // Act
        uc.refresh(&mut sink).unwrap();

        // Assert
        assert_eq!(uc.frames_presented(), 1);
    }

    #[test]
    fn test_refresh_propagates_sink_failure() {
        let (mut uc, _) = make_use_case(vec![0; 8]);
        let mut sink = MockRenderSink::new();
        sink.expect_present()
            .returning(|_| Err(RenderError::Sink("display lost".to_string())));

        let err = uc.refresh(&mut sink).unwrap_err();

        assert!(matches!(err, RefreshError::Render(_)));
        assert_eq!(uc.frames_presented(), 0);
    }

    #[test]
    fn test_refresh_does_not_present_when_read_fails() {
        let (mut uc, store) = make_use_case(vec![0; 8]);
        store.fail_reads(true);
        let mut sink = MockRenderSink::new();
        sink.expect_present().times(0);

        assert!(uc.refresh(&mut sink).is_err());
    }
}
