//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Default config file name.
pub const CONFIG_FILE: &str = "texr.toml";

/// Find `config_name` by walking upward from `start`.
///
/// ```text
/// /home/user/thesis/chapters/  ← document directory
/// /home/user/thesis/texr.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Expand `~` and resolve relative paths against `root`.
pub fn expand_path(path: &Path, root: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
    if expanded.is_relative() {
        root.join(expanded)
    } else {
        expanded
    }
}

// ============================================================================
// tests
// ============================================================================
