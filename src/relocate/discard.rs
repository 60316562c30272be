//! Non-destructive disposal of source documents.
//!
//! Sources are moved into a discard directory instead of being deleted, with
//! a timestamp prefix so repeated compiles of the same file never collide.

use crate::utils::path::move_file;
use std::{
    io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

/// Name of the discard directory under the temp root.
pub const DISCARD_DIR_NAME: &str = "texr-discard";

/// What happens to the source document after a non-preview compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardPolicy {
    /// Leave the source where it is.
    Keep,
    /// Move the source into this directory.
    MoveTo(PathBuf),
}

impl DiscardPolicy {
    /// Default discard directory under `temp_root`.
    pub fn under(temp_root: &Path) -> Self {
        Self::MoveTo(temp_root.join(DISCARD_DIR_NAME))
    }
}

/// Move `source` into `dir`, returning where it ended up.
pub fn discard(source: &Path, dir: &Path) -> io::Result<PathBuf> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let mut target = dir.join(format!("{stamp}-{name}"));
    let mut n = 1;
    while target.exists() {
        target = dir.join(format!("{stamp}-{n}-{name}"));
        n += 1;
    }

    move_file(source, &target)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discard_moves_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("paper.tex");
        fs::write(&source, "content").unwrap();
        let bin = dir.path().join("bin");

        let target = discard(&source, &bin).unwrap();

        assert!(!source.exists());
        assert!(target.starts_with(&bin));
        assert!(target.to_string_lossy().ends_with("-paper.tex"));
        assert_eq!(fs::read_to_string(target).unwrap(), "content");
    }

    #[test]
    fn test_discard_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("bin");
        let source = dir.path().join("paper.tex");

        fs::write(&source, "one").unwrap();
        let first = discard(&source, &bin).unwrap();
        fs::write(&source, "two").unwrap();
        let second = discard(&source, &bin).unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_dir(&bin).unwrap().count(), 2);
    }

    #[test]
    fn test_policy_under_temp_root() {
        let policy = DiscardPolicy::under(Path::new("/tmp"));
        assert_eq!(policy, DiscardPolicy::MoveTo(PathBuf::from("/tmp/texr-discard")));
    }
}
