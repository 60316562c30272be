//! texr - compile LaTeX documents and relocate the artifacts.

mod cli;
mod compiler;
mod config;
mod diagnostics;
mod error;
mod logger;
mod relocate;
mod resource;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::TexrConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = TexrConfig::load(&cli)?;

    match &cli.command {
        Commands::Compile {
            document, preview, ..
        } => cli::compile::compile_document(document, *preview, &config),
        Commands::Normalize { document, dry_run } => {
            cli::normalize::normalize(document, *dry_run, &config)
        }
        Commands::Check { .. } => cli::check::check_toolchain(&config),
    }
}
