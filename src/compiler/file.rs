//! Generic "compile this file" helper.
//!
//! Runs a pipeline against a source file sitting in its working directory and
//! locates the produced `<base>.<ext>` next to it.

use super::{DiagnosticLog, EXCERPT_LINES, Pipeline, StepContext};
use crate::error::CompileError;
use crate::utils::exec::{Cmd, combined_output};
use crate::utils::plural::plural_count;
use crate::{debug, log};
use std::path::{Path, PathBuf};

/// Everything `compile_file` needs besides the log.
#[derive(Debug, Clone, Copy)]
pub struct CompileJob<'a> {
    /// Source file; its parent directory is the working directory.
    pub source: &'a Path,
    pub pipeline: &'a Pipeline,
    /// Shell used for command templates (`sh -c <line>`).
    pub shell: &'a str,
    /// Extension of the expected artifact, without the dot.
    pub output_ext: &'a str,
}

/// Run `job.pipeline` and return the path of the produced artifact.
///
/// Steps run in order with the working directory as cwd; the first step
/// that fails stops the pipeline. No step is retried.
pub fn compile_file(job: &CompileJob<'_>, log: &mut DiagnosticLog) -> Result<PathBuf, CompileError> {
    let source = job.source;
    let work_dir = source
        .parent()
        .ok_or_else(|| CompileError::MissingInput(source.to_path_buf()))?;
    let file_name = file_name_str(source)?;
    let base_name = base_name_str(source)?;

    let ctx = StepContext {
        file_name,
        base_name,
        work_dir,
        shell: job.shell,
    };

    debug!("compile"; "running {} for {}", plural_count(job.pipeline.len(), "step"), file_name);

    match job.pipeline {
        Pipeline::Commands(templates) => {
            for (i, template) in templates.iter().enumerate() {
                let line = template.expand(&ctx);
                run_command(&line, i + 1, &ctx, log)?;
            }
        }
        Pipeline::Custom(step) => {
            log.command(step.name());
            if let Err(e) = step.run(&ctx, log) {
                log.write(&format!("{e:#}"));
                return Err(failure(
                    format!("compile step `{}` failed: {e}", step.name()),
                    log,
                ));
            }
        }
    }

    let expected = work_dir.join(format!("{base_name}.{}", job.output_ext));
    if !expected.is_file() {
        return Err(failure(
            format!(
                "expected output `{}` was not produced",
                expected
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            ),
            log,
        ));
    }

    Ok(expected)
}

fn run_command(
    line: &str,
    index: usize,
    ctx: &StepContext<'_>,
    log: &mut DiagnosticLog,
) -> Result<(), CompileError> {
    log.command(line);
    debug!("compile"; "step {}: {}", index, line);

    let cmd = Cmd::shell(ctx.shell, line).cwd(ctx.work_dir).envs(ctx.env_vars());
    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => {
            log.write(&format!("{e:#}"));
            return Err(failure(format!("step {index} could not start: {e}"), log));
        }
    };

    log.write(&combined_output(&output));

    if !output.status.success() {
        log!("compile"; "step {} failed ({})", index, output.status);
        return Err(failure(
            format!("step {index} `{line}` exited with {}", output.status),
            log,
        ));
    }
    Ok(())
}

fn failure(reason: String, log: &DiagnosticLog) -> CompileError {
    CompileError::CompilationFailure {
        reason,
        log: log.path().to_path_buf(),
        excerpt: log.excerpt(EXCERPT_LINES),
    }
}

fn file_name_str(path: &Path) -> Result<&str, CompileError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CompileError::MissingInput(path.to_path_buf()))
}

fn base_name_str(path: &Path) -> Result<&str, CompileError> {
    path.file_stem()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CompileError::MissingInput(path.to_path_buf()))
}
