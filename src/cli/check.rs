//! `texr check`: verify the configured toolchain is on `PATH`.

use crate::compiler::Pipeline;
use crate::config::{CONFIG_FILE, TexrConfig};
use crate::log;
use crate::logger::Status;
use crate::utils::plural::plural_count;
use anyhow::Result;
use rustc_hash::FxHashSet;

pub fn check_toolchain(config: &TexrConfig) -> Result<()> {
    match &config.config_path {
        Some(path) => log!("check"; "config {}", path.display()),
        None => log!("check"; "no {} found, using defaults", CONFIG_FILE),
    }

    let templates = config.compiler.templates();
    log!("check"; "pipeline: {}", plural_count(templates.len(), "command"));
    for template in &templates {
        log!("check"; "  {}", template);
    }
    if let Pipeline::Custom(step) = config.compiler.pipeline() {
        log!("check"; "preset {} runs as `{}` step", config.compiler.preset, step.name());
    }

    let programs = std::iter::once(config.compiler.shell.as_str())
        .chain(templates.iter().filter_map(|t| t.program()));
    let missing = find_missing(programs, |program| which::which(program).is_ok());

    for program in &missing {
        log!("missing"; "`{}` not found in PATH", program);
    }
    if !missing.is_empty() {
        anyhow::bail!("found {}", plural_count(missing.len(), "missing program"));
    }

    Status::success("toolchain ready");
    Ok(())
}

/// Programs for which `exists` fails, deduplicated, in first-seen order.
fn find_missing<'a>(
    programs: impl IntoIterator<Item = &'a str>,
    exists: impl Fn(&str) -> bool,
) -> Vec<&'a str> {
    let mut seen = FxHashSet::default();
    programs
        .into_iter()
        .filter(|program| seen.insert(*program))
        .filter(|program| !exists(program))
        .collect()
}
