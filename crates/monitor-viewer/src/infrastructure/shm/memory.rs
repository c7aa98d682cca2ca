//! In-memory frame store for unit testing.
//!
//! `MemoryFrameStore` stands in for the shared segment without any OS calls.
//! Every successful `write_byte` offset is appended to a log so tests can
//! assert write order, and the `fail_reads` / `fail_writes` switches make
//! the next calls return errors, exercising error paths in the use cases.
//!
//! # Usage in tests
//!
//! ```ignore
//! let store = Arc::new(MemoryFrameStore::zeroed(layout.full_segment_len()));
//! let bridge = KeyboardBridgeUseCase::new(Arc::clone(&store) as Arc<dyn FrameStore>, layout, encoder);
//!
//! bridge.apply_event(Transition::Down, HostKey::KeyA)?;
//! assert_eq!(store.write_log(), vec![layout.col_status_offset(), layout.row_status_offset()]);
//! ```

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::application::frame_store::{check_range, FrameStore, StoreError};

/// A byte buffer implementing [`FrameStore`].
#[derive(Debug, Default)]
pub struct MemoryFrameStore {
    bytes: Mutex<Vec<u8>>,
    writes: Mutex<Vec<usize>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryFrameStore {
    /// Creates a store of `len` zero bytes.
    pub fn zeroed(len: usize) -> Self {
        Self::from_bytes(vec![0; len])
    }

    /// Creates a store holding `bytes`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Mutex::new(bytes),
            ..Self::default()
        }
    }

    /// The byte at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is out of range.
    pub fn byte(&self, offset: usize) -> u8 {
        self.bytes.lock().unwrap()[offset]
    }

    /// Overwrites the byte at `offset` without logging, as the emulator would.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is out of range.
    pub fn set_byte(&self, offset: usize, value: u8) {
        self.bytes.lock().unwrap()[offset] = value;
    }

    /// A copy of the whole buffer.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.lock().unwrap().clone()
    }

    /// Offsets of every successful `write_byte`, in order.
    pub fn write_log(&self) -> Vec<usize> {
        self.writes.lock().unwrap().clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl FrameStore for MemoryFrameStore {
    fn len(&self) -> usize {
        self.bytes.lock().unwrap().len()
    }

    fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        let len = buf.len();
        let err = |source| StoreError::Read {
            offset,
            len,
            source,
        };
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(err(io::Error::new(io::ErrorKind::Other, "injected read failure")));
        }
        let bytes = self.bytes.lock().unwrap();
        check_range(offset, len, bytes.len()).map_err(err)?;
        buf.copy_from_slice(&bytes[offset..offset + len]);
        Ok(())
    }

    fn write_byte(&self, offset: usize, value: u8) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                offset,
                source: io::Error::new(io::ErrorKind::Other, "injected write failure"),
            });
        }
        let mut bytes = self.bytes.lock().unwrap();
        check_range(offset, 1, bytes.len()).map_err(|source| StoreError::Write { offset, source })?;
        bytes[offset] = value;
        self.writes.lock().unwrap().push(offset);
        Ok(())
    }
}
