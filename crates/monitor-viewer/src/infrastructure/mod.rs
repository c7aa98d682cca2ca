//! Infrastructure layer for the viewer.
//!
//! Contains OS-facing adapters: the System V shared-memory segment, the
//! stdin key-event reader, the snapshot render sink, and config file storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `monitor_core`, but MUST NOT be imported by the `application` or domain
//! layers (test code excepted).

pub mod input;
pub mod render;
pub mod shm;
pub mod storage;
