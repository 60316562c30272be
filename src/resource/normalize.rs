//! Rewrites relative resource references to absolute paths.
//!
//! The document is compiled from a temporary directory, so every relative
//! `\includegraphics{...}` must be pinned to the document's own directory
//! first. References that cannot be found are left alone and reported.

use super::ResourcePattern;
use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use crate::utils::path::resolve_path;
use crate::utils::plural::plural_count;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A relative reference that was pinned to an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub original: String,
    pub absolute: PathBuf,
}

/// A relative reference whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedResource {
    pub reference: String,
    pub resolved: PathBuf,
}

/// Result of normalizing a piece of text.
#[derive(Debug, Default)]
pub struct Normalized {
    /// Document bytes with rewrites applied; encoding is left as found.
    pub text: Vec<u8>,
    pub rewrites: Vec<Rewrite>,
    pub unresolved: Vec<UnresolvedResource>,
    /// References that were already absolute.
    pub absolute: usize,
}

impl Normalized {
    pub fn changed(&self) -> bool {
        !self.rewrites.is_empty()
    }
}

/// Result of normalizing a document on disk.
#[derive(Debug)]
pub struct NormalizeReport {
    pub document: PathBuf,
    pub rewrites: Vec<Rewrite>,
    pub unresolved: Vec<UnresolvedResource>,
    pub absolute: usize,
    /// Whether the file on disk was rewritten.
    pub written: bool,
}

/// Normalize every resource reference in `text`.
///
/// Pure apart from existence checks and the diagnostics sink: one warning
/// per unresolved reference. Only the path arguments have to be UTF-8; a
/// reference that is not is left alone and reported.
pub fn normalize_text(
    text: &[u8],
    doc_dir: &Path,
    pattern: &ResourcePattern,
    sink: &dyn Diagnostics,
) -> Normalized {
    let mut out = Normalized {
        text: Vec::with_capacity(text.len()),
        ..Default::default()
    };
    let mut cursor = 0;

    for (range, raw) in pattern.path_ranges(text) {
        let Ok(raw) = std::str::from_utf8(raw) else {
            sink.warn(
                "normalize",
                &format!(
                    "skipping non-UTF-8 resource reference `{}`",
                    String::from_utf8_lossy(raw)
                ),
            );
            continue;
        };
        let reference = raw.trim();
        if reference.is_empty() {
            continue;
        }

        let path = Path::new(reference);
        if path.is_absolute() {
            sink.info("normalize", &format!("absolute reference kept: {reference}"));
            out.absolute += 1;
            continue;
        }

        let resolved = resolve_path(path, doc_dir);
        if resolved.is_file() {
            out.text.extend_from_slice(&text[cursor..range.start]);
            out.text.extend_from_slice(&tex_path(&resolved));
            cursor = range.end;
            out.rewrites.push(Rewrite {
                original: reference.to_string(),
                absolute: resolved,
            });
        } else {
            sink.warn(
                "missing",
                &format!("resource `{reference}` not found (looked for {})", resolved.display()),
            );
            out.unresolved.push(UnresolvedResource {
                reference: reference.to_string(),
                resolved,
            });
        }
    }

    out.text.extend_from_slice(&text[cursor..]);
    out
}

/// Normalize a document in place.
///
/// The file is written once, after all references are processed, and only
/// when at least one reference changed.
pub fn normalize_document(
    document: &Path,
    pattern: &ResourcePattern,
    sink: &dyn Diagnostics,
) -> Result<NormalizeReport, CompileError> {
    let normalized = scan_document(document, pattern, sink)?;

    let written = normalized.changed();
    if written {
        fs::write(document, &normalized.text).map_err(|e| CompileError::io(document, e))?;
        sink.info(
            "normalize",
            &format!(
                "rewrote {} in {}",
                plural_count(normalized.rewrites.len(), "reference"),
                document.display()
            ),
        );
    }

    Ok(NormalizeReport {
        document: document.to_path_buf(),
        rewrites: normalized.rewrites,
        unresolved: normalized.unresolved,
        absolute: normalized.absolute,
        written,
    })
}

/// Normalize a document without writing it back.
pub fn scan_document(
    document: &Path,
    pattern: &ResourcePattern,
    sink: &dyn Diagnostics,
) -> Result<Normalized, CompileError> {
    if !document.is_file() {
        return Err(CompileError::MissingInput(document.to_path_buf()));
    }

    let text = fs::read(document).map_err(|e| CompileError::io(document, e))?;
    let doc_dir = document_dir(document);
    Ok(normalize_text(&text, &doc_dir, pattern, sink))
}

/// Absolute directory containing `document`.
pub fn document_dir(document: &Path) -> PathBuf {
    let absolute = crate::utils::path::normalize_path(document);
    absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(absolute)
}

/// Path bytes as TeX should see them: forward slashes on every platform.
fn tex_path(path: &Path) -> Vec<u8> {
    if cfg!(windows) {
        path.to_string_lossy().replace('\\', "/").into_bytes()
    } else {
        path.as_os_str().as_encoded_bytes().to_vec()
    }
}
