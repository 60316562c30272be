//! Errors surfaced by the normalize and compile operations.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    /// The source document is gone before any work started.
    #[error("source document `{}` does not exist", .0.display())]
    MissingInput(PathBuf),

    /// The pipeline exited abnormally or produced no artifact.
    ///
    /// Outside preview mode the log is removed during cleanup, so the tail of
    /// it travels with the error.
    #[error("{reason}\nlog: `{}`{}", .log.display(), format_excerpt(.excerpt))]
    CompilationFailure {
        reason: String,
        log: PathBuf,
        excerpt: String,
    },

    #[error("IO error at `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
}

impl CompileError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io(path.into(), err)
    }

    pub const fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput(_))
    }

    pub const fn is_compilation_failure(&self) -> bool {
        matches!(self, Self::CompilationFailure { .. })
    }
}

fn format_excerpt(excerpt: &str) -> String {
    if excerpt.is_empty() {
        String::new()
    } else {
        format!("\n\n{excerpt}")
    }
}
