//! Per-invocation working directory with scoped cleanup.
//!
//! Dropping a `Workspace` removes the working directory, deletes the
//! diagnostic log and, once the pipeline has been attempted, discards the
//! source document. A preview workspace skips all of that so the files stay
//! around for inspection.

use super::discard::{DiscardPolicy, discard};
use crate::compiler::DiagnosticLog;
use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Prefix shared by working directories and their logs.
pub const WORKSPACE_PREFIX: &str = "texr-";

pub struct Workspace<'a> {
    dir: PathBuf,
    log: Option<DiagnosticLog>,
    source: PathBuf,
    discard: DiscardPolicy,
    /// Set right before the pipeline runs; earlier failures keep the source.
    discard_armed: bool,
    cleanup: bool,
    sink: &'a dyn Diagnostics,
}

impl<'a> Workspace<'a> {
    /// Create a uniquely named working directory under `temp_root`, plus a
    /// log file `<dir name>.log` next to it.
    pub fn create(
        temp_root: &Path,
        source: &Path,
        discard: DiscardPolicy,
        sink: &'a dyn Diagnostics,
    ) -> Result<Self, CompileError> {
        fs::create_dir_all(temp_root).map_err(|e| CompileError::io(temp_root, e))?;
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(temp_root)
            .map_err(|e| CompileError::io(temp_root, e))?
            .keep();

        let log_name = format!(
            "{}.log",
            dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        );
        let log_path = temp_root.join(log_name);
        let log = match DiagnosticLog::create(&log_path) {
            Ok(log) => log,
            Err(e) => {
                fs::remove_dir_all(&dir).ok();
                return Err(CompileError::io(log_path, e));
            }
        };

        Ok(Self {
            dir,
            log: Some(log),
            source: source.to_path_buf(),
            discard,
            discard_armed: false,
            cleanup: true,
            sink,
        })
    }

    /// Disable cleanup (preview mode).
    pub fn keep(mut self) -> Self {
        self.cleanup = false;
        self
    }

    /// Discard the source on drop from now on.
    pub fn arm_discard(&mut self) {
        self.discard_armed = true;
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn log_path(&self) -> PathBuf {
        self.log
            .as_ref()
            .map(|log| log.path().to_path_buf())
            .unwrap_or_default()
    }

    pub fn log_mut(&mut self) -> &mut DiagnosticLog {
        // Only `Drop` takes the log out.
        self.log.as_mut().expect("log is present until drop")
    }

    fn clean(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            self.sink.warn(
                "cleanup",
                &format!("could not remove {}: {e}", self.dir.display()),
            );
        }

        if let Some(log) = self.log.take() {
            let path = log.path().to_path_buf();
            if let Err(e) = log.release() {
                self.sink.warn(
                    "cleanup",
                    &format!("could not remove {}: {e}", path.display()),
                );
            }
        }

        if self.discard_armed
            && let DiscardPolicy::MoveTo(bin) = &self.discard
            && self.source.exists()
        {
            match discard(&self.source, bin) {
                Ok(target) => self.sink.info(
                    "cleanup",
                    &format!("moved {} to {}", self.source.display(), target.display()),
                ),
                Err(e) => self.sink.warn(
                    "cleanup",
                    &format!("could not discard {}: {e}", self.source.display()),
                ),
            }
        }
    }
}

impl Drop for Workspace<'_> {
    fn drop(&mut self) {
        if self.cleanup {
            self.clean();
        } else if let Some(log) = self.log.take() {
            log.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectSink;
    use tempfile::TempDir;

    fn source_in(dir: &Path) -> PathBuf {
        let source = dir.join("paper.tex");
        fs::write(&source, "\\documentclass{article}").unwrap();
        source
    }

    #[test]
    fn test_drop_cleans_everything() {
        let root = TempDir::new().unwrap();
        let docs = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let source = source_in(docs.path());
        let sink = CollectSink::new();

        let (dir, log) = {
            let mut ws = Workspace::create(
                root.path(),
                &source,
                DiscardPolicy::MoveTo(bin.path().to_path_buf()),
                &sink,
            )
            .unwrap();
            ws.log_mut().write("output");
            ws.arm_discard();
            (ws.dir().to_path_buf(), ws.log_path())
        };

        assert!(!dir.exists());
        assert!(!log.exists());
        assert!(!source.exists());
        assert_eq!(fs::read_dir(bin.path()).unwrap().count(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_unarmed_workspace_keeps_source() {
        let root = TempDir::new().unwrap();
        let docs = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let source = source_in(docs.path());
        let sink = CollectSink::new();

        let dir = {
            let ws = Workspace::create(
                root.path(),
                &source,
                DiscardPolicy::MoveTo(bin.path().to_path_buf()),
                &sink,
            )
            .unwrap();
            ws.dir().to_path_buf()
        };

        assert!(!dir.exists());
        assert!(source.exists());
        assert_eq!(fs::read_dir(bin.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_keep_leaves_files() {
        let root = TempDir::new().unwrap();
        let docs = TempDir::new().unwrap();
        let source = source_in(docs.path());
        let sink = CollectSink::new();

        let (dir, log) = {
            let mut ws =
                Workspace::create(root.path(), &source, DiscardPolicy::under(root.path()), &sink)
                    .unwrap()
                    .keep();
            ws.arm_discard();
            (ws.dir().to_path_buf(), ws.log_path())
        };

        assert!(dir.is_dir());
        assert!(log.is_file());
        assert!(source.exists());
    }

    #[test]
    fn test_unique_names() {
        let root = TempDir::new().unwrap();
        let docs = TempDir::new().unwrap();
        let source = source_in(docs.path());
        let sink = CollectSink::new();

        let a = Workspace::create(root.path(), &source, DiscardPolicy::Keep, &sink).unwrap();
        let b = Workspace::create(root.path(), &source, DiscardPolicy::Keep, &sink).unwrap();

        assert_ne!(a.dir(), b.dir());
        assert!(a.dir().file_name().unwrap().to_string_lossy().starts_with(WORKSPACE_PREFIX));
    }
}
