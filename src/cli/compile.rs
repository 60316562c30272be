//! `texr compile`: compile a document and relocate the artifact.

use crate::config::TexrConfig;
use crate::diagnostics::TerminalSink;
use crate::logger::Status;
use crate::relocate::{CompileRequest, Compiled, compile_and_relocate};
use crate::utils::plural::plural_count;
use crate::{debug, log};
use anyhow::Result;
use std::path::Path;

/// Compile `document` with the settings from `config`.
///
/// The artifact path goes to stdout so the command composes with scripts;
/// everything else is logged to stderr.
pub fn compile_document(document: &Path, preview: bool, config: &TexrConfig) -> Result<()> {
    let settings = config.settings()?;
    debug!("compile"; "pipeline has {}", plural_count(settings.pipeline.len(), "step"));

    let mut request = CompileRequest::new(document).preview(preview);
    if let Some(dir) = config.output_dir() {
        request = request.output_dir(dir);
    }

    let compiled = match compile_and_relocate(&request, &settings, &TerminalSink) {
        Ok(compiled) => compiled,
        Err(e) => {
            let what = if e.is_missing_input() {
                "document not found"
            } else if e.is_compilation_failure() {
                "compilation failed"
            } else {
                "could not relocate the artifact"
            };
            Status::error(&format!("{what}: {}", document.display()), "");
            return Err(e.into());
        }
    };

    report(&compiled, preview);
    println!("{}", compiled.artifact.display());
    Ok(())
}

fn report(compiled: &Compiled, preview: bool) {
    if let Some(normalize) = &compiled.normalize
        && !normalize.unresolved.is_empty()
    {
        Status::warning(&format!(
            "{} could not be resolved",
            plural_count(normalize.unresolved.len(), "resource")
        ));
    }

    if preview {
        log!("preview"; "working directory {}", compiled.work_dir.display());
        log!("preview"; "log {}", compiled.log.display());
    }

    let name = compiled
        .artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Status::success(&format!("compiled {name}"));
}
