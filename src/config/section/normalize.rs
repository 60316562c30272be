//! `[normalize]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [normalize]
//! enable = true
//! directives = ["includegraphics", "includesvg"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::resource::{DEFAULT_DIRECTIVE, ResourcePattern, is_control_word};
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Rewrite relative resource paths before compiling.
    pub enable: bool,

    /// Inclusion directives to scan for, without the backslash.
    pub directives: Vec<String>,
}

impl NormalizeConfig {
    pub const DIRECTIVES: FieldPath = FieldPath::new("normalize.directives");

    /// Matcher for the configured directives, `None` when disabled.
    pub fn pattern(&self) -> Result<Option<ResourcePattern>> {
        if !self.enable {
            return Ok(None);
        }
        ResourcePattern::new(&self.directives).map(Some)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        if self.directives.is_empty() {
            diag.error_with_hint(
                Self::DIRECTIVES,
                "no directives configured",
                "set `enable = false` to skip normalization",
            );
        }
        for name in &self.directives {
            if !is_control_word(name) {
                diag.error_with_hint(
                    Self::DIRECTIVES,
                    format!("`{name}` is not a TeX control word"),
                    "write the name without a backslash, letters only",
                );
            }
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            enable: true,
            directives: vec![DEFAULT_DIRECTIVE.to_string()],
        }
    }
}
