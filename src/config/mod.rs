//! Configuration management for `texr.toml`.
//!
//! ```text
//! config/
//! ├── section/   # [output] [compiler] [normalize] [cleanup]
//! ├── types/     # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs    # config discovery, path expansion
//! └── mod.rs     # TexrConfig (this file)
//! ```
//!
//! The config file is searched upward from the document's directory, so a
//! `texr.toml` at the root of a thesis applies to every chapter below it.
//! Without one, every section falls back to its defaults.

pub mod section;
pub mod types;
mod util;

pub use section::{CleanupConfig, CompilerConfig, NormalizeConfig, OutputConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};
pub use util::CONFIG_FILE;

use crate::cli::{Cli, Commands};
use crate::relocate::Settings;
use crate::resource::document_dir;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use util::{expand_path, find_config_file};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `texr.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TexrConfig {
    /// Config file that was loaded, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    pub output: OutputConfig,
    pub compiler: CompilerConfig,
    pub normalize: NormalizeConfig,
    pub cleanup: CleanupConfig,
}

impl TexrConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// `-C` wins; otherwise `texr.toml` is searched upward from the
    /// document's directory (or cwd when the command has no document).
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let start = cli.document().map_or_else(|| cwd.clone(), document_dir);

        let config_path = match &cli.config {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    cwd.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(Path::new(CONFIG_FILE), &start),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(start, Path::to_path_buf);
        config.config_path = config_path.map(|p| normalize_path(&p));
        config.finalize(&root);
        config.apply_command_options(cli, &cwd);
        config.validate()?;

        Ok(config)
    }

    /// Load from file; unknown keys are reported and ignored.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .map_err(ConfigError::Toml)
            .with_context(|| format!("in {}", path.display()))?;

        let mut diag = ConfigDiagnostics::new();
        diag.unknown_fields(ignored);
        diag.print_warnings(path);

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Resolve every configured path against `root`.
    fn finalize(&mut self, root: &Path) {
        let root = normalize_path(root);

        if let Some(dir) = self.output.dir.take() {
            self.output.dir = Some(expand_path(&dir, &root));
        }
        if let Some(dir) = self.cleanup.temp_dir.take() {
            self.cleanup.temp_dir = Some(expand_path(&dir, &root));
        }
        if let Some(dir) = self.cleanup.discard_dir.take() {
            self.cleanup.discard_dir = Some(expand_path(&dir, &root));
        }
    }

    /// Apply command-specific CLI overrides.
    ///
    /// CLI paths are relative to the cwd, not to the config file.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        if let Commands::Compile {
            output_dir,
            keep_source,
            ..
        } = &cli.command
        {
            if let Some(dir) = output_dir {
                self.output.dir = Some(expand_path(dir, cwd));
            }
            if *keep_source {
                self.cleanup.discard_source = false;
            }
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.output.validate(&mut diag);
        self.compiler.validate(&mut diag);
        self.normalize.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Configured output directory; `None` means "next to the document".
    pub fn output_dir(&self) -> Option<&Path> {
        self.output.dir.as_deref()
    }

    /// Compile settings derived from this config.
    pub fn settings(&self) -> Result<Settings> {
        let pattern = self
            .normalize
            .pattern()
            .map_err(|e| ConfigError::Validation(format!("{e:#}")))?;

        Ok(Settings {
            pipeline: self.compiler.pipeline(),
            shell: self.compiler.shell.clone(),
            output_ext: self.output.extension.trim().to_string(),
            pattern,
            discard: self.cleanup.discard_policy(),
            temp_root: self.cleanup.temp_root(),
        })
    }
}

impl FromStr for TexrConfig {
    type Err = ConfigError;

    /// Parse configuration from a TOML string; unknown keys are ignored
    /// silently.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

/// Parse a config snippet for section tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> TexrConfig {
    let (parsed, ignored) = TexrConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
