//! Compile-and-relocate workflow.
//!
//! ```text
//! document ──► normalize refs ──► copy into workdir ──► pipeline ──► <out>/<base>.<ext>
//!                                        │
//!                     Workspace guard ───┴── removes workdir + log, discards source
//! ```
//!
//! Preview compiles skip normalization and cleanup: the working directory
//! and its log are left behind for reuse.

mod discard;
mod workspace;

pub use discard::DiscardPolicy;
pub use workspace::Workspace;

#[cfg(test)]
pub use discard::DISCARD_DIR_NAME;

use crate::compiler::{CompileJob, Pipeline, compile_file};
use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use crate::resource::{NormalizeReport, ResourcePattern, document_dir, normalize_document};
use crate::utils::path::{move_file, normalize_path};
use crate::{debug, log};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Settings that stay the same across compiles.
#[derive(Debug, Clone)]
pub struct Settings {
    pub pipeline: Pipeline,
    /// Shell for command templates.
    pub shell: String,
    /// Artifact extension, without the dot.
    pub output_ext: String,
    /// `None` disables resource normalization.
    pub pattern: Option<ResourcePattern>,
    pub discard: DiscardPolicy,
    /// Where working directories and logs are created.
    pub temp_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let temp_root = std::env::temp_dir();
        Self {
            pipeline: Pipeline::default(),
            shell: "sh".to_string(),
            output_ext: "pdf".to_string(),
            pattern: Some(ResourcePattern::default()),
            discard: DiscardPolicy::under(&temp_root),
            temp_root,
        }
    }
}

/// One compile invocation.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    pub document: &'a Path,
    pub preview: bool,
    /// `None`: the document's own directory.
    pub output_dir: Option<&'a Path>,
}

impl<'a> CompileRequest<'a> {
    pub const fn new(document: &'a Path) -> Self {
        Self {
            document,
            preview: false,
            output_dir: None,
        }
    }

    pub const fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub const fn output_dir(mut self, dir: &'a Path) -> Self {
        self.output_dir = Some(dir);
        self
    }
}

/// A successful compile.
#[derive(Debug)]
pub struct Compiled {
    /// `<output dir>/<base>.<ext>`
    pub artifact: PathBuf,
    /// Only still on disk in preview mode.
    pub work_dir: PathBuf,
    /// Only still on disk in preview mode.
    pub log: PathBuf,
    pub normalize: Option<NormalizeReport>,
}

/// Compile `request.document` and move the artifact to the output directory.
///
/// Every exit path after the working directory exists converges on the
/// `Workspace` drop, unless `request.preview` is set.
pub fn compile_and_relocate(
    request: &CompileRequest<'_>,
    settings: &Settings,
    sink: &dyn Diagnostics,
) -> Result<Compiled, CompileError> {
    let document = normalize_path(request.document);
    if !document.is_file() {
        return Err(CompileError::MissingInput(document));
    }

    let output_dir = match request.output_dir {
        Some(dir) => normalize_path(dir),
        None => document_dir(&document),
    };
    let file_name = document
        .file_name()
        .ok_or_else(|| CompileError::MissingInput(document.clone()))?
        .to_owned();
    let base_name = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| CompileError::MissingInput(document.clone()))?;

    let workspace =
        Workspace::create(&settings.temp_root, &document, settings.discard.clone(), sink)?;
    let mut workspace = if request.preview {
        workspace.keep()
    } else {
        workspace
    };
    debug!("compile"; "working directory {}", workspace.dir().display());

    let normalize = match (&settings.pattern, request.preview) {
        (Some(pattern), false) => Some(normalize_document(&document, pattern, sink)?),
        _ => None,
    };

    let staged = workspace.dir().join(&file_name);
    fs::copy(&document, &staged).map_err(|e| CompileError::io(&staged, e))?;

    let job = CompileJob {
        source: &staged,
        pipeline: &settings.pipeline,
        shell: &settings.shell,
        output_ext: &settings.output_ext,
    };
    workspace.arm_discard();
    let produced = compile_file(&job, workspace.log_mut())?;

    let artifact = output_dir.join(format!("{base_name}.{}", settings.output_ext));
    move_file(&produced, &artifact).map_err(|e| CompileError::io(&artifact, e))?;
    log!("relocate"; "{}", artifact.display());

    Ok(Compiled {
        artifact,
        work_dir: workspace.dir().to_path_buf(),
        log: workspace.log_path(),
        normalize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CommandTemplate, step_fn};
    use crate::diagnostics::CollectSink;
    use tempfile::TempDir;

    struct Fixture {
        temp_root: TempDir,
        docs: TempDir,
        out: TempDir,
        bin: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                temp_root: TempDir::new().unwrap(),
                docs: TempDir::new().unwrap(),
                out: TempDir::new().unwrap(),
                bin: TempDir::new().unwrap(),
            }
        }

        fn document(&self, text: &str) -> PathBuf {
            let path = self.docs.path().join("paper.tex");
            fs::write(&path, text).unwrap();
            path
        }

        fn settings(&self, pipeline: Pipeline) -> Settings {
            Settings {
                pipeline,
                discard: DiscardPolicy::MoveTo(self.bin.path().to_path_buf()),
                temp_root: self.temp_root.path().to_path_buf(),
                ..Default::default()
            }
        }

        fn temp_entries(&self) -> usize {
            fs::read_dir(self.temp_root.path()).unwrap().count()
        }

        fn out_entries(&self) -> usize {
            fs::read_dir(self.out.path()).unwrap().count()
        }
    }

    fn fake_latex() -> Pipeline {
        Pipeline::custom(step_fn(|ctx, log| {
            log.write("This is fakeTeX");
            let tex = fs::read_to_string(ctx.work_dir.join(ctx.file_name))?;
            fs::write(ctx.work_dir.join(format!("{}.pdf", ctx.base_name)), tex)?;
            Ok(())
        }))
    }

    fn broken_latex() -> Pipeline {
        Pipeline::custom(step_fn(|_, log| {
            log.write("! Emergency stop.");
            anyhow::bail!("exit status 1")
        }))
    }

    #[test]
    fn test_success_relocates_and_cleans() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        let compiled = compile_and_relocate(&request, &fx.settings(fake_latex()), &sink).unwrap();

        let expected = fx.out.path().canonicalize().unwrap().join("paper.pdf");
        assert_eq!(compiled.artifact, expected);
        assert!(expected.is_file());
        assert!(!compiled.work_dir.exists());
        assert!(!compiled.log.exists());
        assert_eq!(fx.temp_entries(), 0);
    }

    #[test]
    fn test_success_discards_source() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        compile_and_relocate(&request, &fx.settings(fake_latex()), &sink).unwrap();

        assert!(!doc.exists());
        assert_eq!(fs::read_dir(fx.bin.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_keep_policy_leaves_source() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();
        let mut settings = fx.settings(fake_latex());
        settings.discard = DiscardPolicy::Keep;

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        compile_and_relocate(&request, &settings, &sink).unwrap();

        assert!(doc.exists());
    }

    #[test]
    fn test_default_output_dir_is_document_dir() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();

        let compiled =
            compile_and_relocate(&CompileRequest::new(&doc), &fx.settings(fake_latex()), &sink)
                .unwrap();

        let expected = fx.docs.path().canonicalize().unwrap().join("paper.pdf");
        assert_eq!(compiled.artifact, expected);
    }

    #[test]
    fn test_overwrites_existing_artifact() {
        let fx = Fixture::new();
        let doc = fx.document("fresh");
        fs::write(fx.out.path().join("paper.pdf"), "stale").unwrap();
        let sink = CollectSink::new();

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        let compiled = compile_and_relocate(&request, &fx.settings(fake_latex()), &sink).unwrap();

        assert_eq!(fs::read_to_string(compiled.artifact).unwrap(), "fresh");
    }

    #[test]
    fn test_failure_cleans_and_writes_nothing() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        let err = compile_and_relocate(&request, &fx.settings(broken_latex()), &sink).unwrap_err();

        assert!(err.is_compilation_failure());
        assert!(err.to_string().contains("Emergency stop"));
        assert_eq!(fx.temp_entries(), 0);
        assert_eq!(fx.out_entries(), 0);
    }

    #[test]
    fn test_failure_discards_source_and_removes_log() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        let err = compile_and_relocate(&request, &fx.settings(broken_latex()), &sink).unwrap_err();

        let log = match &err {
            CompileError::CompilationFailure { log, .. } => log.clone(),
            other => panic!("expected compilation failure, got {other:?}"),
        };
        assert!(!log.exists());
        assert!(!doc.exists());
        assert_eq!(fs::read_dir(fx.bin.path()).unwrap().count(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_latin1_source_compiles() {
        let fx = Fixture::new();
        let doc = fx.docs.path().join("paper.tex");
        let body = b"\\documentclass{article}\nCaf\xe9\n";
        fs::write(&doc, body).unwrap();
        let sink = CollectSink::new();
        let pipeline = Pipeline::custom(step_fn(|ctx, _| {
            fs::copy(
                ctx.work_dir.join(ctx.file_name),
                ctx.work_dir.join(format!("{}.pdf", ctx.base_name)),
            )?;
            Ok(())
        }));

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        let compiled = compile_and_relocate(&request, &fx.settings(pipeline), &sink).unwrap();

        assert_eq!(fs::read(&compiled.artifact).unwrap(), body);
        assert_eq!(fs::read_dir(fx.bin.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_input_creates_nothing() {
        let fx = Fixture::new();
        let sink = CollectSink::new();
        let missing = fx.docs.path().join("nope.tex");

        let request = CompileRequest::new(&missing).output_dir(fx.out.path());
        let err = compile_and_relocate(&request, &fx.settings(fake_latex()), &sink).unwrap_err();

        assert!(err.is_missing_input());
        assert_eq!(fx.temp_entries(), 0);
    }

    #[test]
    fn test_preview_keeps_workspace_on_success() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();

        let request = CompileRequest::new(&doc).preview(true).output_dir(fx.out.path());
        let compiled = compile_and_relocate(&request, &fx.settings(fake_latex()), &sink).unwrap();

        assert!(compiled.artifact.is_file());
        assert!(compiled.work_dir.is_dir());
        assert!(compiled.log.is_file());
        assert!(doc.exists());
        assert_eq!(fs::read_dir(fx.bin.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_preview_keeps_workspace_on_failure() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();

        let request = CompileRequest::new(&doc).preview(true).output_dir(fx.out.path());
        compile_and_relocate(&request, &fx.settings(broken_latex()), &sink).unwrap_err();

        // working directory + its log
        assert_eq!(fx.temp_entries(), 2);
        assert!(doc.exists());
        assert_eq!(fs::read_dir(fx.bin.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_preview_skips_normalization() {
        let fx = Fixture::new();
        fs::write(fx.docs.path().join("img.png"), b"png").unwrap();
        let doc = fx.document("\\includegraphics{img.png}");
        let sink = CollectSink::new();

        let request = CompileRequest::new(&doc).preview(true).output_dir(fx.out.path());
        let compiled = compile_and_relocate(&request, &fx.settings(fake_latex()), &sink).unwrap();

        assert!(compiled.normalize.is_none());
        assert_eq!(fs::read_to_string(&doc).unwrap(), "\\includegraphics{img.png}");
    }

    #[test]
    fn test_staged_copy_has_absolute_references() {
        let fx = Fixture::new();
        fs::write(fx.docs.path().join("img.png"), b"png").unwrap();
        let doc = fx.document("\\includegraphics{img.png} \\includegraphics{missing.png}");
        let sink = CollectSink::new();
        let mut settings = fx.settings(fake_latex());
        settings.discard = DiscardPolicy::Keep;

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        let compiled = compile_and_relocate(&request, &settings, &sink).unwrap();

        // fake_latex copies the staged source into the artifact
        let staged = fs::read_to_string(&compiled.artifact).unwrap();
        let img = fx.docs.path().canonicalize().unwrap().join("img.png");
        assert!(staged.contains(&img.display().to_string()));
        assert!(staged.contains("{missing.png}"));
        assert_eq!(sink.len(), 1);
        assert_eq!(compiled.normalize.unwrap().rewrites.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_templates_end_to_end() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();
        let settings = fx.settings(Pipeline::Commands(vec![
            CommandTemplate::new("test -f %f"),
            CommandTemplate::new("cp %f %b.pdf"),
        ]));

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        let compiled = compile_and_relocate(&request, &settings, &sink).unwrap();

        assert!(compiled.artifact.ends_with("paper.pdf"));
        assert_eq!(fx.temp_entries(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_compilation_failure() {
        let fx = Fixture::new();
        let doc = fx.document("\\documentclass{article}");
        let sink = CollectSink::new();
        let settings = fx.settings(Pipeline::Commands(vec![CommandTemplate::new("exit 2")]));

        let request = CompileRequest::new(&doc).output_dir(fx.out.path());
        let err = compile_and_relocate(&request, &settings, &sink).unwrap_err();

        assert!(err.is_compilation_failure());
        assert_eq!(fx.temp_entries(), 0);
        assert_eq!(fx.out_entries(), 0);
    }
}
