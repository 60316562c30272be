//! Path utilities.
//!
//! - [`fs`]: normalization, resolution against a base dir, cross-device moves

pub mod fs;

pub use fs::{move_file, normalize_path, resolve_path};
