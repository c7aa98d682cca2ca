//! monitor-viewer library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the viewer do? (for beginners)
//!
//! The emulator owns a System V shared memory segment holding its video
//! output.  The viewer:
//!
//! 1. Attaches to that segment (or creates it in standalone mode).
//! 2. Reads key transitions from an input source and, for each one, updates
//!    the keyboard matrix counters and writes the two packed status bytes
//!    straight into the segment.
//! 3. Every few ticks, reads the grid bytes, resolves them to colors, and
//!    hands the frame to a rendering sink.
//!
//! Input and video share nothing but the segment.

/// Application layer: use cases and the traits they depend on.
pub mod application;

/// Infrastructure layer: shared memory, config storage, input sources, sinks.
pub mod infrastructure;
