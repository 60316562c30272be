//! Filesystem path helpers.
//!
//! - `normalize_path` - absolute form (canonicalize + fallback)
//! - `resolve_path` - relative paths against a base directory
//! - `move_file` - rename with a copy fallback across filesystems

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to the path itself when absolute, or cwd-joined when relative.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `path` against `base_dir` unless it is already absolute.
///
/// Unlike `normalize_path`, relative paths never consult the cwd.
#[inline]
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        normalize_path(&base_dir.join(path))
    }
}

/// Move `from` to `to`, overwriting `to`.
///
/// `rename` cannot cross filesystems (the temp area is often tmpfs), so a
/// failed rename falls back to copy + remove.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}
