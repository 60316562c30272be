//! Diagnostic log for a single compile.
//!
//! Every step's combined output is appended to a named file, and mirrored
//! in memory so a failure can quote the tail even after the file is gone.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Lines quoted in a failure message.
pub const EXCERPT_LINES: usize = 20;

#[derive(Debug)]
pub struct DiagnosticLog {
    path: PathBuf,
    file: File,
    buffer: String,
}

impl DiagnosticLog {
    /// Create (or truncate) the log file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            file,
            buffer: String::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a `$ command` header line.
    pub fn command(&mut self, line: &str) {
        self.write(&format!("$ {line}\n"));
    }

    /// Append raw text, adding a trailing newline when missing.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.buffer.push_str(text);
        // A log that cannot be written is not worth failing the compile for.
        self.file.write_all(text.as_bytes()).ok();
        if !text.ends_with('\n') {
            self.buffer.push('\n');
            self.file.write_all(b"\n").ok();
        }
    }

    #[cfg(test)]
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// Last `lines` lines of the log.
    pub fn excerpt(&self, lines: usize) -> String {
        let all: Vec<_> = self.buffer.lines().collect();
        let start = all.len().saturating_sub(lines);
        all[start..].join("\n")
    }

    /// Flush and delete the log file.
    pub fn release(mut self) -> io::Result<()> {
        self.file.flush().ok();
        drop(self.file);
        fs::remove_file(&self.path)
    }

    /// Flush and keep the log file on disk, returning its path.
    pub fn persist(mut self) -> PathBuf {
        self.file.flush().ok();
        self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_mirrors_file() {
        let dir = TempDir::new().unwrap();
        let mut log = DiagnosticLog::create(dir.path().join("compile.log")).unwrap();
        log.command("pdflatex paper.tex");
        log.write("This is pdfTeX");

        let path = log.persist();
        let on_disk = fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, "$ pdflatex paper.tex\nThis is pdfTeX\n");
    }

    #[test]
    fn test_excerpt_keeps_tail() {
        let dir = TempDir::new().unwrap();
        let mut log = DiagnosticLog::create(dir.path().join("compile.log")).unwrap();
        for i in 0..30 {
            log.write(&format!("line {i}"));
        }
        let excerpt = log.excerpt(3);
        assert_eq!(excerpt, "line 27\nline 28\nline 29");
        assert_eq!(log.excerpt(100).lines().count(), 30);
    }

    #[test]
    fn test_release_removes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compile.log");
        let mut log = DiagnosticLog::create(&path).unwrap();
        log.write("output");
        assert!(path.exists());

        log.release().unwrap();
        assert!(!path.exists());
    }
}
