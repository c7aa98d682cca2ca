//! The frame store abstraction: byte-addressed access to the shared segment.
//!
//! The production implementation is the System V segment in
//! `infrastructure::shm`; tests use the in-memory store next to it.

use std::io;

use thiserror::Error;

/// Error type for frame store access.
///
/// Every variant names the operation that failed so the binary can report
/// whether attaching, reading, or writing went wrong.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("attach: shared memory key {key:#010x}: {source}")]
    Attach {
        key: u32,
        #[source]
        source: io::Error,
    },

    #[error("attach: shared memory key {key:#010x} is {actual} bytes, need at least {required}")]
    TooSmall {
        key: u32,
        actual: usize,
        required: usize,
    },

    #[error("read: {len} bytes at offset {offset}: {source}")]
    Read {
        offset: usize,
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("write: offset {offset}: {source}")]
    Write {
        offset: usize,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// The failed operation: `"attach"`, `"read"`, or `"write"`.
    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::Attach { .. } | StoreError::TooSmall { .. } => "attach",
            StoreError::Read { .. } => "read",
            StoreError::Write { .. } => "write",
        }
    }

    /// The underlying I/O error kind, if any.
    pub fn kind(&self) -> Option<io::ErrorKind> {
        match self {
            StoreError::Attach { source, .. }
            | StoreError::Read { source, .. }
            | StoreError::Write { source, .. } => Some(source.kind()),
            StoreError::TooSmall { .. } => None,
        }
    }
}

/// Byte-addressed access to the shared frame store.
///
/// Methods take `&self`: the segment is shared across processes, and the
/// store is shared between the keyboard and refresh use cases through an
/// `Arc`.
pub trait FrameStore: Send + Sync {
    /// Size of the store in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the store has no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies `buf.len()` bytes starting at `offset` into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the range is out of bounds or the store
    /// is no longer accessible.
    fn read_into(&self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError>;

    /// Writes a single byte at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if `offset` is out of bounds or the store
    /// is no longer accessible.
    fn write_byte(&self, offset: usize, value: u8) -> Result<(), StoreError>;
}

/// Checks that `offset..offset + len` lies inside a store of `size` bytes.
pub(crate) fn check_range(offset: usize, len: usize, size: usize) -> io::Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("range {offset}+{len} exceeds segment size {size}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_accepts_exact_fit() {
        assert!(check_range(0, 10, 10).is_ok());
        assert!(check_range(9, 1, 10).is_ok());
    }

    #[test]
    fn test_check_range_rejects_overrun_and_overflow() {
        assert_eq!(
            check_range(9, 2, 10).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
        assert!(check_range(usize::MAX, 1, 10).is_err());
    }

    #[test]
    fn test_error_operation_names() {
        let attach = StoreError::TooSmall {
            key: 1,
            actual: 1,
            required: 2,
        };
        let read = StoreError::Read {
            offset: 0,
            len: 1,
            source: io::Error::from(io::ErrorKind::UnexpectedEof),
        };
        let write = StoreError::Write {
            offset: 0,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(attach.operation(), "attach");
        assert_eq!(read.operation(), "read");
        assert_eq!(write.operation(), "write");
        assert_eq!(write.kind(), Some(io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_attach_error_message_shows_hex_key() {
        let err = StoreError::Attach {
            key: 0x6303_b5eb,
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("attach: shared memory key 0x6303b5eb"));
    }
}
