//! Frame store adapters.
//!
//! - `sysv`   – the System V shared-memory segment the emulator publishes
//!   (Unix only).
//! - `memory` – an in-process byte buffer with failure injection and a write
//!   log, used by tests and benches.
//!
//! # What is System V shared memory? (for beginners)
//!
//! A System V segment is a block of memory identified by a numeric key.  Any
//! process that knows the key can `shmget` the segment id and `shmat` it into
//! its own address space; from then on, plain loads and stores are visible to
//! every other process attached to the same segment.  There is no locking and
//! no notification: the viewer simply re-reads the framebuffer on each redraw,
//! and the emulator polls the keyboard bytes whenever it scans the matrix.

pub mod memory;

#[cfg(unix)]
mod sysv;

#[cfg(unix)]
pub use sysv::SharedMemorySegment;

/// Default key of the emulator's segment.
pub const DEFAULT_SHM_KEY: u32 = 0x6303_b5eb;
