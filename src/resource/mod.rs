//! Resource reference handling for TeX sources.
//!
//! - `pattern`: matches inclusion directives and their path argument
//! - `normalize`: pins relative references to absolute paths

mod normalize;
mod pattern;

pub use normalize::{
    NormalizeReport, Rewrite, UnresolvedResource, document_dir, normalize_document, scan_document,
};
pub use pattern::{DEFAULT_DIRECTIVE, ResourcePattern, is_control_word};
