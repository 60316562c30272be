//! `[cleanup]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cleanup]
//! temp_dir = "/var/tmp"           # default: system temp directory
//! discard_source = true           # move the source away after compiling
//! discard_dir = "~/.texr/discard" # default: <temp_dir>/texr-discard
//! ```

use crate::relocate::DiscardPolicy;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Root for working directories and logs.
    pub temp_dir: Option<PathBuf>,

    /// Move the source document to `discard_dir` after a non-preview compile.
    pub discard_source: bool,

    pub discard_dir: Option<PathBuf>,
}

impl CleanupConfig {
    pub fn temp_root(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn discard_policy(&self) -> DiscardPolicy {
        if !self.discard_source {
            return DiscardPolicy::Keep;
        }
        match &self.discard_dir {
            Some(dir) => DiscardPolicy::MoveTo(dir.clone()),
            None => DiscardPolicy::under(&self.temp_root()),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            discard_source: true,
            discard_dir: None,
        }
    }
}
