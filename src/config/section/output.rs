//! `[output]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [output]
//! dir = "~/papers/pdf"   # default: the document's own directory
//! extension = "pdf"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where compiled artifacts are moved to.
    /// `None`: next to the source document.
    pub dir: Option<PathBuf>,

    /// Extension of the artifact the pipeline produces.
    pub extension: String,
}

impl OutputConfig {
    pub const EXTENSION: FieldPath = FieldPath::new("output.extension");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let ext = self.extension.trim();
        if ext.is_empty() {
            diag.error(Self::EXTENSION, "must not be empty");
        } else if ext.starts_with('.') {
            diag.error_with_hint(
                Self::EXTENSION,
                "must not start with a dot",
                format!("use `extension = \"{}\"`", ext.trim_start_matches('.')),
            );
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extension: "pdf".to_string(),
        }
    }
}
