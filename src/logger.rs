//! Terminal logging with colored module prefixes.
//!
//! - `log!` prints `[module] message`
//! - `debug!` prints only when `--verbose` is set
//! - `Status` prints the final one-line outcome of a command
//!
//! ```ignore
//! log!("compile"; "running {} step(s)", steps);
//! debug!("normalize"; "absolute path kept: {}", path);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose)
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Macros
// ============================================================================

/// Log a message with a colored module prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message only when `--verbose` is enabled.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helpers
// ============================================================================

/// Write `[module] message` to stderr.
///
/// Stdout is reserved for command results (artifact paths, dry-run text)
/// so the tool composes in shell pipelines.
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut out = stderr().lock();
    execute!(out, Clear(ClearType::UntilNewLine)).ok();
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Color the `[module]` prefix; plain when colors are off for stderr.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    prefix
        .if_supports_color(Stream::Stderr, |p| match module_lower {
            "compile" => p.bright_blue().bold().to_string(),
            "relocate" => p.bright_green().bold().to_string(),
            "error" => p.bright_red().bold().to_string(),
            "warning" | "missing" => p.bright_magenta().bold().to_string(),
            _ => p.bright_yellow().bold().to_string(),
        })
        .to_string()
}

// ============================================================================
// Status
// ============================================================================

/// One-line outcome display (`✓ ...` / `✗ ...`).
pub struct Status;

impl Status {
    pub fn success(message: &str) {
        Self::display("✓".if_supports_color(Stream::Stderr, |t| t.green()), message);
    }

    /// Error summary with optional multi-line detail.
    pub fn error(summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        Self::display("✗".if_supports_color(Stream::Stderr, |t| t.red()), &message);
    }

    pub fn warning(message: &str) {
        Self::display("⚠".if_supports_color(Stream::Stderr, |t| t.yellow()), message);
    }

    fn display(symbol: impl std::fmt::Display, message: &str) {
        let mut out = stderr().lock();
        writeln!(out, "{symbol} {message}").ok();
        out.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }

    #[test]
    fn test_colorize_prefix_keeps_module_name() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("compile", "compile"), "[compile]");
        assert_eq!(colorize_prefix("Missing", "missing"), "[Missing]");
    }
}
