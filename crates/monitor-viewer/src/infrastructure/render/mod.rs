//! Render sinks.
//!
//! The viewer runs headless: each redraw is written as a binary PPM (`P6`)
//! image that any image viewer can open and that refreshes in place.
//!
//! # What is PPM? (for beginners)
//!
//! PPM is the simplest colour image format there is: an ASCII header
//! `P6\n<width> <height>\n255\n` followed by `width * height` RGB triples, one
//! byte per channel, row by row from the top-left corner.

pub mod mock;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use monitor_core::{Color, Grid};
use tracing::debug;

use crate::application::refresh_frame::{RenderError, RenderSink};

/// Writes every presented frame to a PPM file.
///
/// The image is written to `<path>.tmp` and renamed over `path`, so readers
/// never see a half-written file.
#[derive(Debug, Clone)]
pub struct PpmSnapshotSink {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl PpmSnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        Self {
            path,
            tmp_path: PathBuf::from(tmp),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_tmp(&self, frame: &Grid<Color>) -> io::Result<()> {
        let mut out = BufWriter::new(fs::File::create(&self.tmp_path)?);
        encode_ppm(frame, &mut out)?;
        out.flush()
    }
}

impl RenderSink for PpmSnapshotSink {
    fn present(&mut self, frame: &Grid<Color>) -> Result<(), RenderError> {
        self.write_tmp(frame).map_err(|source| RenderError::Io {
            path: self.tmp_path.clone(),
            source,
        })?;
        fs::rename(&self.tmp_path, &self.path).map_err(|source| RenderError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

/// Encodes `frame` as a binary PPM image.
pub fn encode_ppm<W: Write>(frame: &Grid<Color>, out: &mut W) -> io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
    for color in frame.rows() {
        out.write_all(&[color.r(), color.g(), color.b()])?;
    }
    Ok(())
}
