//! `[compiler]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [compiler]
//! preset = "xelatex"      # pdflatex | xelatex | lualatex | latexmk | tectonic
//!                         # plain engines rerun (up to 3 passes) until settled
//!
//! # or spell the passes out; takes precedence over `preset`
//! commands = [
//!     "pdflatex -interaction nonstopmode -output-directory %o %f",
//!     "bibtex %b",
//!     "pdflatex -interaction nonstopmode -output-directory %o %f",
//! ]
//! shell = "sh"
//! ```

use crate::compiler::{CommandTemplate, Pipeline, Preset};
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Built-in command list, used when `commands` is not set.
    pub preset: Preset,

    /// Explicit command templates (`%f`, `%b`, `%o` placeholders).
    pub commands: Option<Vec<CommandTemplate>>,

    /// Shell that runs each command line.
    pub shell: String,
}

impl CompilerConfig {
    pub const COMMANDS: FieldPath = FieldPath::new("compiler.commands");
    pub const SHELL: FieldPath = FieldPath::new("compiler.shell");

    /// Command templates that will actually run.
    pub fn templates(&self) -> Vec<CommandTemplate> {
        match &self.commands {
            Some(commands) => commands.clone(),
            None => self.preset.templates(),
        }
    }

    /// Explicit commands run as given; a preset may rerun its engine.
    pub fn pipeline(&self) -> Pipeline {
        match &self.commands {
            Some(commands) => Pipeline::Commands(commands.clone()),
            None => self.preset.into(),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(commands) = &self.commands {
            if commands.is_empty() {
                diag.error_with_hint(
                    Self::COMMANDS,
                    "empty command list",
                    "remove `commands` to fall back to `preset`",
                );
            }
            if commands.iter().any(|c| c.as_str().trim().is_empty()) {
                diag.error(Self::COMMANDS, "contains an empty command");
            }
        }
        if self.shell.trim().is_empty() {
            diag.error(Self::SHELL, "must not be empty");
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            commands: None,
            shell: "sh".to_string(),
        }
    }
}
