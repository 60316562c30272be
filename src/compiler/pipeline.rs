//! Compiler pipeline definitions.
//!
//! A pipeline is either an ordered list of shell command templates or a
//! custom step implemented in Rust.
//!
//! # Placeholders
//!
//! | Placeholder | Value                                   |
//! |-------------|-----------------------------------------|
//! | `%f`        | file name of the working copy           |
//! | `%b`        | base name (file name without extension) |
//! | `%o`        | working directory                       |
//! | `%%`        | a literal `%`                           |
//!
//! Values are shell-quoted before substitution.

use super::{DiagnosticLog, RerunStep};
use crate::utils::exec::shell_quote;
use anyhow::Result;
use serde::Deserialize;
use std::{fmt, path::Path, sync::Arc};

/// What a pipeline step gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Working copy file name, e.g. `paper.tex`.
    pub file_name: &'a str,
    /// Base name, e.g. `paper`.
    pub base_name: &'a str,
    /// Working directory (also the cwd of every command).
    pub work_dir: &'a Path,
    /// Shell that runs command lines (`<shell> -c <line>`).
    pub shell: &'a str,
}

impl StepContext<'_> {
    /// Environment exported to command templates, mirroring the placeholders.
    pub fn env_vars(&self) -> [(&'static str, String); 3] {
        [
            ("TEXR_FILE", self.file_name.to_string()),
            ("TEXR_BASE", self.base_name.to_string()),
            ("TEXR_OUTDIR", self.work_dir.to_string_lossy().into_owned()),
        ]
    }
}

/// A pipeline step implemented in Rust.
pub trait CompileStep: Send + Sync {
    fn name(&self) -> &str {
        "custom"
    }

    /// Produce `<base_name>.<ext>` inside `ctx.work_dir`.
    fn run(&self, ctx: &StepContext<'_>, log: &mut DiagnosticLog) -> Result<()>;
}

impl<F> CompileStep for F
where
    F: Fn(&StepContext<'_>, &mut DiagnosticLog) -> Result<()> + Send + Sync,
{
    fn run(&self, ctx: &StepContext<'_>, log: &mut DiagnosticLog) -> Result<()> {
        self(ctx, log)
    }
}

/// Pin a closure to the `CompileStep` signature so its argument types are
/// inferred.
#[cfg(test)]
pub fn step_fn<F>(f: F) -> F
where
    F: Fn(&StepContext<'_>, &mut DiagnosticLog) -> Result<()> + Send + Sync,
{
    f
}

// ============================================================================
// Command templates
// ============================================================================

/// A shell command line with `%f`/`%b`/`%o` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CommandTemplate(String);

impl CommandTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First word of the template, used to check the program is installed.
    pub fn program(&self) -> Option<&str> {
        self.0.split_whitespace().next()
    }

    /// Substitute placeholders for `ctx`.
    ///
    /// Unknown `%x` sequences are kept verbatim.
    pub fn expand(&self, ctx: &StepContext<'_>) -> String {
        let mut out = String::with_capacity(self.0.len() + 32);
        let mut chars = self.0.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek().copied() {
                Some('f') => out.push_str(&shell_quote(ctx.file_name)),
                Some('b') => out.push_str(&shell_quote(ctx.base_name)),
                Some('o') => out.push_str(&shell_quote(&ctx.work_dir.to_string_lossy())),
                Some('%') => out.push('%'),
                _ => {
                    out.push('%');
                    continue;
                }
            }
            chars.next();
        }
        out
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Built-in command lists for common TeX engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Pdflatex,
    Xelatex,
    Lualatex,
    Latexmk,
    Tectonic,
}

/// Upper bound on engine passes; enough for the table of contents and
/// cross-references to settle.
pub const MAX_ENGINE_PASSES: usize = 3;

impl Preset {
    /// Command line(s) a single run of this preset executes.
    pub fn templates(self) -> Vec<CommandTemplate> {
        match self.engine() {
            Some(engine) => vec![CommandTemplate::new(format!(
                "{engine} -interaction nonstopmode -output-directory %o %f"
            ))],
            None if self == Self::Latexmk => vec![CommandTemplate::new(
                "latexmk -f -pdf -interaction=nonstopmode -output-directory=%o %f",
            )],
            None => vec![CommandTemplate::new("tectonic --outdir %o %f")],
        }
    }

    /// Plain TeX engine name; `None` for drivers that rerun on their own.
    fn engine(self) -> Option<&'static str> {
        match self {
            Self::Pdflatex => Some("pdflatex"),
            Self::Xelatex => Some("xelatex"),
            Self::Lualatex => Some("lualatex"),
            Self::Latexmk | Self::Tectonic => None,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdflatex => "pdflatex",
            Self::Xelatex => "xelatex",
            Self::Lualatex => "lualatex",
            Self::Latexmk => "latexmk",
            Self::Tectonic => "tectonic",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// How a document gets compiled.
#[derive(Clone)]
pub enum Pipeline {
    /// Shell command templates, run in order; the first failure stops.
    Commands(Vec<CommandTemplate>),
    /// A single step implemented in Rust.
    Custom(Arc<dyn CompileStep>),
}

impl Pipeline {
    pub fn custom<S: CompileStep + 'static>(step: S) -> Self {
        Self::Custom(Arc::new(step))
    }

    /// Number of steps that will run.
    pub fn len(&self) -> usize {
        match self {
            Self::Commands(templates) => templates.len(),
            Self::Custom(_) => 1,
        }
    }
}

impl From<Preset> for Pipeline {
    /// Plain engines rerun until their output stops asking for it; latexmk
    /// and tectonic handle reruns themselves.
    fn from(preset: Preset) -> Self {
        let mut templates = preset.templates();
        match (preset.engine(), templates.pop()) {
            (Some(_), Some(pass)) => Self::custom(RerunStep::new(pass, MAX_ENGINE_PASSES)),
            (_, last) => {
                templates.extend(last);
                Self::Commands(templates)
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Preset::default().into()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commands(templates) => f.debug_tuple("Commands").field(templates).finish(),
            Self::Custom(step) => f.debug_tuple("Custom").field(&step.name()).finish(),
        }
    }
}
