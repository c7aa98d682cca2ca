//! Application layer use cases for the viewer.
//!
//! # What use cases does the viewer have?
//!
//! - **`keyboard_bridge`** – Applies key transitions to the matrix encoder and
//!   publishes the packed status bytes to the [`frame_store::FrameStore`].
//!
//! - **`refresh_frame`** – Reads the grid from the frame store, decodes it,
//!   and presents it to a [`refresh_frame::RenderSink`].
//!
//! - **`scheduler`** – The cooperative loop: drain input, sleep one tick,
//!   redraw every Nth tick.
//!
//! All OS access goes through traits injected at construction time, so every
//! use case runs against in-memory doubles in tests.

pub mod frame_store;
pub mod keyboard_bridge;
pub mod refresh_frame;
pub mod scheduler;
