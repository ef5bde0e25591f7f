//! Frame files: naming and persistence.
//!
//! Frames land in `<dir>/frame_<n>.scr`, raw display file bytes with no
//! header, loadable by any tool that reads `.scr` screens.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "frames";

pub const FRAME_PREFIX: &str = "frame_";
pub const FRAME_EXTENSION: &str = "scr";

/// Path of frame `index` inside `dir`.
#[must_use]
pub fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("{FRAME_PREFIX}{index}.{FRAME_EXTENSION}"))
}

/// Somewhere to put frames.
///
/// Called synchronously on the emulation thread: a slow writer stalls the
/// emulated machine. Must persist all of `bytes` or fail.
pub trait FrameWriter {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Writes each frame straight to the filesystem.
#[derive(Debug, Default)]
pub struct FsFrameWriter {
    written: u64,
}

impl FsFrameWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames successfully written over the writer's lifetime.
    #[must_use]
    pub fn frames_written(&self) -> u64 {
        self.written
    }
}

impl FrameWriter for FsFrameWriter {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)?;
        self.written += 1;
        Ok(())
    }
}
