//! Dotted config field path, e.g. `compiler.commands`.

use owo_colors::{OwoColorize, Stream};
use std::fmt;

/// Names a field in `texr.toml` for diagnostics.
///
/// Sections expose their fields as associated consts:
///
/// ```ignore
/// diag.error(CompilerConfig::COMMANDS, "empty command list");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = format!("`{}`", self.0);
        write!(
            f,
            "{}",
            quoted.if_supports_color(Stream::Stderr, |t| t.bright_blue())
        )
    }
}
