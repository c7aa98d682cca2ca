//! System V shared-memory segment backed by `shmget` / `shmat`.

use std::io;
use std::ptr::{self, NonNull};

use tracing::{debug, info, warn};

use crate::application::frame_store::{check_range, FrameStore, StoreError};

/// Permission bits for a segment created by the viewer.
const CREATE_MODE: libc::c_int = 0o644;

/// An attached System V segment.
///
/// Detached on drop.  The segment itself is left in place unless
/// [`remove`](Self::remove) was called; it belongs to the emulator.
pub struct SharedMemorySegment {
    key: u32,
    id: libc::c_int,
    addr: NonNull<u8>,
    len: usize,
}

// SAFETY: the mapping stays valid until `Drop` runs `shmdt`, and every access
// goes through a raw-pointer copy or a single-byte volatile write.  Sharing the
// handle across threads adds no hazard beyond the one already inherent in the
// memory being shared with another process.
unsafe impl Send for SharedMemorySegment {}
// SAFETY: see `Send` above; no method hands out references into the mapping.
unsafe impl Sync for SharedMemorySegment {}

impl SharedMemorySegment {
    /// Attaches an existing segment and checks it holds at least
    /// `required_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Attach`] if the segment does not exist or cannot
    /// be mapped, and [`StoreError::TooSmall`] if it is shorter than
    /// `required_len`.
    pub fn attach(key: u32, required_len: usize) -> Result<Self, StoreError> {
        // SAFETY: shmget has no memory-safety preconditions.
        let id = unsafe { libc::shmget(key as libc::key_t, 0, 0) };
        if id < 0 {
            return Err(attach_error(key));
        }

        let len = segment_size(key, id)?;
        if len < required_len {
            return Err(StoreError::TooSmall {
                key,
                actual: len,
                required: required_len,
            });
        }

        let segment = Self::map(key, id, len)?;
        info!(key = format_args!("{key:#010x}"), len, "attached shared memory");
        Ok(segment)
    }

    /// Attaches the segment at `key`, creating and zeroing an
    /// `alloc_len`-byte segment first if none exists.
    ///
    /// An existing segment is attached as-is and only has to hold
    /// `required_len` bytes; its contents are not touched.
    ///
    /// # Errors
    ///
    /// Same as [`attach`](Self::attach).
    pub fn create(key: u32, required_len: usize, alloc_len: usize) -> Result<Self, StoreError> {
        let alloc_len = alloc_len.max(required_len);
        let flags = libc::IPC_CREAT | libc::IPC_EXCL | CREATE_MODE;
        // SAFETY: shmget has no memory-safety preconditions.
        let id = unsafe { libc::shmget(key as libc::key_t, alloc_len, flags) };
        if id < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EEXIST) {
                debug!(key = format_args!("{key:#010x}"), "segment exists; attaching");
                return Self::attach(key, required_len);
            }
            return Err(StoreError::Attach { key, source: err });
        }

        let segment = Self::map(key, id, alloc_len)?;
        // SAFETY: the mapping is `alloc_len` bytes long and owned by this handle.
        unsafe { ptr::write_bytes(segment.addr.as_ptr(), 0, alloc_len) };
        info!(key = format_args!("{key:#010x}"), len = alloc_len, "created shared memory");
        Ok(segment)
    }

    fn map(key: u32, id: libc::c_int, len: usize) -> Result<Self, StoreError> {
        // SAFETY: a null address lets the kernel pick the mapping location.
        let raw = unsafe { libc::shmat(id, ptr::null(), 0) };
        if raw as isize == -1 {
            return Err(attach_error(key));
        }
        let addr = NonNull::new(raw.cast::<u8>()).ok_or_else(|| StoreError::Attach {
            key,
            source: io::Error::new(io::ErrorKind::Other, "shmat returned null"),
        })?;
        Ok(Self { key, id, addr, len })
    }

    pub fn key(&self) -> u32 {
        self.key
    }

    /// Marks the segment for removal once every process has detached.
    ///
    /// # Errors
    ///
    /// Returns the OS error from `shmctl(IPC_RMID)`.
    pub fn remove(&self) -> io::Result<()> {
        // SAFETY: IPC_RMID ignores the buffer argument.
        let rc = unsafe { libc::shmctl(self.id, libc::IPC_RMID, ptr::null_mut()) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl FrameStore for SharedMemorySegment {
    fn len(&self) -> usize {
        self.len
    }

    fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        check_range(offset, buf.len(), self.len).map_err(|source| StoreError::Read {
            offset,
            len: buf.len(),
            source,
        })?;
        // SAFETY: the range was checked against the mapping length above, and
        // `buf` cannot alias the mapping.
        unsafe {
            ptr::copy_nonoverlapping(self.addr.as_ptr().add(offset), buf.as_mut_ptr(), buf.len());
        }
        Ok(())
    }

    fn write_byte(&self, offset: usize, value: u8) -> Result<(), StoreError> {
        check_range(offset, 1, self.len).map_err(|source| StoreError::Write { offset, source })?;
        // SAFETY: `offset < len` was checked above.
        unsafe { ptr::write_volatile(self.addr.as_ptr().add(offset), value) };
        Ok(())
    }
}

impl Drop for SharedMemorySegment {
    fn drop(&mut self) {
        // SAFETY: `addr` came from a successful shmat and is detached only here.
        let rc = unsafe { libc::shmdt(self.addr.as_ptr().cast::<libc::c_void>()) };
        if rc < 0 {
            warn!(
                key = format_args!("{:#010x}", self.key),
                error = %io::Error::last_os_error(),
                "shmdt failed"
            );
        }
    }
}

fn attach_error(key: u32) -> StoreError {
    StoreError::Attach {
        key,
        source: io::Error::last_os_error(),
    }
}

fn segment_size(key: u32, id: libc::c_int) -> Result<usize, StoreError> {
    // SAFETY: shmid_ds is plain old data; IPC_STAT fills it in.
    let mut ds: libc::shmid_ds = unsafe { std::mem::zeroed() };
    // SAFETY: `ds` is a valid, writable shmid_ds.
    let rc = unsafe { libc::shmctl(id, libc::IPC_STAT, &mut ds) };
    if rc < 0 {
        return Err(attach_error(key));
    }
    Ok(ds.shm_segsz as usize)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    /// A key unlikely to collide with a running emulator.
    fn test_key() -> u32 {
        0x5e00_0000 | (std::process::id() & 0x00ff_ffff)
    }

    #[test]
    fn test_attach_missing_segment_reports_attach_error() {
        let err = SharedMemorySegment::attach(test_key() ^ 0x0080_0000, 16).err().unwrap();
        assert_eq!(err.operation(), "attach");
    }

    #[test]
    fn test_create_zeroes_and_round_trips_bytes() {
        // Arrange
        let key = test_key();
        let segment = SharedMemorySegment::create(key, 32, 32).unwrap();

        // Act
        segment.write_byte(30, 0xAB).unwrap();
        let mut buf = [0xFFu8; 32];
        segment.read_into(0, &mut buf).unwrap();

        // Assert
        assert!(buf[..30].iter().all(|&b| b == 0));
        assert_eq!(buf[30], 0xAB);

        let second = SharedMemorySegment::attach(key, 32).unwrap();
        let mut one = [0u8; 1];
        second.read_into(30, &mut one).unwrap();
        assert_eq!(one[0], 0xAB);

        let too_small = SharedMemorySegment::attach(key, 64).err().unwrap();
        assert!(matches!(too_small, StoreError::TooSmall { actual: 32, .. }));

        segment.remove().unwrap();
    }

    #[test]
    fn test_create_attaches_existing_segment_without_joystick_bytes() {
        // Arrange: the emulator made a w*h+2 segment (3x4 grid) and wrote to it
        let key = test_key() ^ 0x0040_0000;
        let emulator = SharedMemorySegment::create(key, 14, 14).unwrap();
        emulator.write_byte(12, 0x42).unwrap();

        // Act: the viewer asks for w*h+2 and would allocate w*h+4
        let viewer = SharedMemorySegment::create(key, 14, 16).unwrap();

        // Assert
        assert_eq!(viewer.len(), 14);
        let mut buf = [0u8; 14];
        viewer.read_into(0, &mut buf).unwrap();
        assert_eq!(buf[12], 0x42);

        emulator.remove().unwrap();
    }
}
