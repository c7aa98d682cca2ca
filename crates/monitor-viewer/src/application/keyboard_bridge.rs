//! KeyboardBridgeUseCase: publishes key transitions into the frame store.
//!
//! Each transition is applied to the [`KeyboardMatrixEncoder`] and, if the
//! held state changed, the packed column byte and then the packed row byte
//! are written to their fixed offsets.  The two writes are independent single
//! bytes; the emulator may briefly see the new column byte next to the old
//! row byte, which the next transition corrects.
//!
//! Numeric keypad keys optionally drive a joystick port instead of the
//! matrix.

use std::sync::Arc;

use monitor_core::{
    EncodeOutcome, FrameLayout, HostKey, JoystickEncoder, JoystickOutcome, KeyboardMatrixEncoder,
    MatrixStatus, Transition,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::frame_store::{FrameStore, StoreError};

/// Error type for the keyboard bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to publish keyboard state: {0}")]
    Store(#[from] StoreError),
}

/// The Keyboard Bridge use case.
pub struct KeyboardBridgeUseCase {
    store: Arc<dyn FrameStore>,
    layout: FrameLayout,
    encoder: KeyboardMatrixEncoder,
    joystick: Option<JoystickEncoder>,
}

impl KeyboardBridgeUseCase {
    /// Creates a bridge writing into `store` at the offsets of `layout`.
    pub fn new(
        store: Arc<dyn FrameStore>,
        layout: FrameLayout,
        encoder: KeyboardMatrixEncoder,
    ) -> Self {
        Self {
            store,
            layout,
            encoder,
            joystick: None,
        }
    }

    /// Routes joystick keys to `joystick` instead of the matrix.
    pub fn with_joystick(mut self, joystick: JoystickEncoder) -> Self {
        self.joystick = Some(joystick);
        self
    }

    /// Applies one key transition and publishes the result.
    ///
    /// Keys outside the matrix, auto-repeats, and releases of keys that were
    /// never pressed leave the store untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Store`] if a status byte cannot be written.
    pub fn apply_event(&mut self, transition: Transition, key: HostKey) -> Result<(), BridgeError> {
        if let Some(joystick) = self.joystick.as_mut() {
            match joystick.apply(transition, key) {
                JoystickOutcome::Changed(state) => {
                    let port = joystick.port().number();
                    return self.publish_joystick(port, state);
                }
                JoystickOutcome::Unchanged => {
                    trace!(%key, ?transition, "joystick state unchanged; ignored");
                    return Ok(());
                }
                JoystickOutcome::NotJoystick => {}
            }
        }

        match self.encoder.apply(transition, key) {
            EncodeOutcome::Applied { status, cells } => {
                debug!(%key, ?transition, cells, "key transition");
                self.publish(status)
            }
            EncodeOutcome::Unmapped => {
                trace!(%key, "key not in matrix; ignored");
                Ok(())
            }
            EncodeOutcome::Repeat => {
                trace!(%key, "key already held; ignored");
                Ok(())
            }
            EncodeOutcome::Unbalanced => {
                warn!(%key, "release of a key that is not held; ignored");
                Ok(())
            }
        }
    }

    /// Releases every held key and publishes the cleared state.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Store`] if a status byte cannot be written.
    pub fn release_all(&mut self) -> Result<(), BridgeError> {
        let status = self.encoder.release_all();
        self.publish(status)?;
        if let Some(joystick) = self.joystick.as_mut() {
            let state = joystick.release_all();
            let port = joystick.port().number();
            self.publish_joystick(port, state)?;
        }
        Ok(())
    }

    /// The packed state most recently computed.
    pub fn status(&self) -> MatrixStatus {
        self.encoder.status()
    }

    pub fn encoder(&self) -> &KeyboardMatrixEncoder {
        &self.encoder
    }

    fn publish(&self, status: MatrixStatus) -> Result<(), BridgeError> {
        self.store
            .write_byte(self.layout.col_status_offset(), status.col_status)?;
        self.store
            .write_byte(self.layout.row_status_offset(), status.row_status)?;
        Ok(())
    }

    fn publish_joystick(&self, port: u8, state: u8) -> Result<(), BridgeError> {
        match self.layout.joystick_offset(port) {
            Some(offset) if offset < self.store.len() => {
                debug!(port, state, "joystick update");
                self.store.write_byte(offset, state)?;
            }
            _ => trace!(port, "segment has no joystick bytes; update dropped"),
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::shm::memory::MemoryFrameStore;
    use monitor_core::JoystickPort;

    fn make_bridge(len: usize) -> (KeyboardBridgeUseCase, Arc<MemoryFrameStore>, FrameLayout) {
        let layout = FrameLayout::new(4, 3).unwrap();
        let store = Arc::new(MemoryFrameStore::zeroed(len));
        let bridge = KeyboardBridgeUseCase::new(
            Arc::clone(&store) as Arc<dyn FrameStore>,
            layout,
            KeyboardMatrixEncoder::default(),
        );
        (bridge, store, layout)
    }

    #[test]
    fn test_key_down_writes_both_status_bytes() {
        // Arrange
        let (mut bridge, store, layout) = make_bridge(16);

        // Act
        bridge.apply_event(Transition::Down, HostKey::Delete).unwrap();

        // Assert
        assert_eq!(store.byte(layout.col_status_offset()), 0b0000_0001);
        assert_eq!(store.byte(layout.row_status_offset()), 0b0000_0001);
    }

    #[test]
    fn test_writes_happen_column_first() {
        let (mut bridge, store, layout) = make_bridge(16);
        bridge.apply_event(Transition::Down, HostKey::KeyA).unwrap();
        assert_eq!(
            store.write_log(),
            vec![layout.col_status_offset(), layout.row_status_offset()]
        );
    }

    #[test]
    fn test_unmapped_key_leaves_store_untouched() {
        let (mut bridge, store, _) = make_bridge(16);
        bridge.apply_event(Transition::Down, HostKey::Keypad5).unwrap();
        assert!(store.write_log().is_empty());
    }

    #[test]
    fn test_unbalanced_release_leaves_store_untouched() {
        let (mut bridge, store, _) = make_bridge(16);
        bridge.apply_event(Transition::Up, HostKey::KeyA).unwrap();
        assert!(store.write_log().is_empty());
    }

    #[test]
    fn test_write_failure_propagates_as_store_error() {
        // Arrange
        let (mut bridge, store, _) = make_bridge(16);
        store.fail_writes(true);

        // Act
        let err = bridge
            .apply_event(Transition::Down, HostKey::KeyA)
            .unwrap_err();

        // Assert
        let BridgeError::Store(inner) = err;
        assert_eq!(inner.operation(), "write");
    }

    #[test]
    fn test_release_all_publishes_zeroes() {
        let (mut bridge, store, layout) = make_bridge(16);
        bridge.apply_event(Transition::Down, HostKey::KeyQ).unwrap();
        bridge.release_all().unwrap();
        assert_eq!(store.byte(layout.col_status_offset()), 0);
        assert_eq!(store.byte(layout.row_status_offset()), 0);
    }

    #[test]
    fn test_joystick_key_writes_port_byte_not_matrix() {
        // Arrange: 4x3 grid = 12 bytes, keyboard at 12..14, joysticks at 14..16
        let (bridge, store, layout) = make_bridge(16);
        let mut bridge = bridge.with_joystick(JoystickEncoder::new(JoystickPort::Two));

        // Act
        bridge.apply_event(Transition::Down, HostKey::Keypad0).unwrap();

        // Assert
        assert_eq!(store.byte(layout.joystick_offset(2).unwrap()), 0b1_0000);
        assert_eq!(store.byte(layout.col_status_offset()), 0);
    }

    #[test]
    fn test_joystick_repeat_and_stray_release_do_not_write() {
        // Arrange
        let (bridge, store, layout) = make_bridge(16);
        let mut bridge = bridge.with_joystick(JoystickEncoder::new(JoystickPort::Two));
        bridge.apply_event(Transition::Down, HostKey::Keypad8).unwrap();
        let port_offset = layout.joystick_offset(2).unwrap();

        // Act
        bridge.apply_event(Transition::Down, HostKey::Keypad8).unwrap();
        bridge.apply_event(Transition::Up, HostKey::Keypad4).unwrap();

        // Assert: only the first press was written
        assert_eq!(store.write_log(), vec![port_offset]);
        assert_eq!(store.byte(port_offset), 0b0_0001);
    }

    #[test]
    fn test_joystick_update_dropped_when_segment_lacks_joystick_bytes() {
        let (bridge, store, _) = make_bridge(14);
        let mut bridge = bridge.with_joystick(JoystickEncoder::new(JoystickPort::Two));
        bridge.apply_event(Transition::Down, HostKey::Keypad8).unwrap();
        assert!(store.write_log().is_empty());
    }
}
