//! Error type for the capture plugin and its headless driver.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SloMoError {
    /// A frame file could not be written. Raised on the emulator's write path.
    #[error("failed to write frame {}: {source}", path.display())]
    FrameWrite { path: PathBuf, source: io::Error },

    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("invalid replay script: {0}")]
    Script(#[source] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, SloMoError>;
