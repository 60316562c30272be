//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Compile LaTeX documents and move the result where it belongs
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: nearest texr.toml above the document)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile a document and relocate the artifact
    #[command(visible_alias = "c")]
    Compile {
        /// Document to compile
        #[arg(value_hint = clap::ValueHint::FilePath)]
        document: PathBuf,

        /// Keep the working directory and log, leave the document untouched
        #[arg(short, long)]
        preview: bool,

        /// Directory receiving the artifact (default: next to the document)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output_dir: Option<PathBuf>,

        /// Do not move the document into the discard directory afterwards
        #[arg(short, long)]
        keep_source: bool,
    },

    /// Rewrite relative resource references to absolute paths
    #[command(visible_alias = "n")]
    Normalize {
        /// Document to normalize
        #[arg(value_hint = clap::ValueHint::FilePath)]
        document: PathBuf,

        /// Report rewrites without touching the file
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Check that the configured toolchain is installed
    Check {
        /// Resolve config as if compiling this document
        #[arg(value_hint = clap::ValueHint::FilePath)]
        document: Option<PathBuf>,
    },
}

impl Cli {
    /// Document the command operates on, if any.
    pub fn document(&self) -> Option<&Path> {
        match &self.command {
            Commands::Compile { document, .. } | Commands::Normalize { document, .. } => {
                Some(document)
            }
            Commands::Check { document } => document.as_deref(),
        }
    }
}
