//! Plugin configuration.
//!
//! Only where frames go is configurable. Addresses, ports, cheat values and
//! file naming are fixed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SloMoError};
use crate::frame::DEFAULT_OUTPUT_DIR;

/// Configuration for a [`crate::SloMo`] instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SloMoConfig {
    /// Directory frame files are written to.
    pub output_dir: PathBuf,
    /// Create `output_dir` when the plugin initialises. Off by default: a
    /// missing directory then fails the first frame write.
    pub create_output_dir: bool,
}

impl Default for SloMoConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            create_output_dir: false,
        }
    }
}

impl SloMoConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(SloMoError::Config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| SloMoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
