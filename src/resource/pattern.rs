//! Inclusion directive matching.
//!
//! Matches `\name{path}`, `\name[opts]{path}` and the starred form
//! `\name*[opts]{path}` for every configured directive name.
//!
//! Matching works on raw bytes: TeX sources are not required to be UTF-8
//! (`\usepackage[latin1]{inputenc}`).

use anyhow::{Result, bail};
use regex::bytes::Regex;
use std::ops::Range;

/// Directive used when none is configured.
pub const DEFAULT_DIRECTIVE: &str = "includegraphics";

/// Compiled matcher for a set of inclusion directives.
#[derive(Debug, Clone)]
pub struct ResourcePattern {
    regex: Regex,
}

impl ResourcePattern {
    /// Build a matcher for the given directive names (without backslash).
    pub fn new<S: AsRef<str>>(directives: &[S]) -> Result<Self> {
        if directives.is_empty() {
            bail!("at least one inclusion directive is required");
        }

        let mut names = Vec::with_capacity(directives.len());
        for name in directives {
            let name = name.as_ref();
            if !is_control_word(name) {
                bail!("`{name}` is not a TeX control word");
            }
            names.push(regex::escape(name));
        }

        // group 1: the braced path argument; byte classes, ASCII whitespace
        let source = format!(
            r"(?-u)\\(?:{})\*?[ \t\r\n]*(?:\[[^\]]*\])?[ \t\r\n]*\{{([^{{}}]*)\}}",
            names.join("|")
        );
        Ok(Self {
            regex: Regex::new(&source)?,
        })
    }

    /// Byte ranges of every path argument, in document order.
    pub fn path_ranges<'a>(
        &'a self,
        text: &'a [u8],
    ) -> impl Iterator<Item = (Range<usize>, &'a [u8])> + 'a {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| (m.range(), m.as_bytes()))
    }
}

impl Default for ResourcePattern {
    fn default() -> Self {
        Self::new(&[DEFAULT_DIRECTIVE]).expect("default directive is valid")
    }
}

/// A TeX control word: ASCII letters only, optionally with `@`.
pub fn is_control_word(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == '@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(pattern: &ResourcePattern, text: &str) -> Vec<String> {
        pattern
            .path_ranges(text.as_bytes())
            .map(|(_, path)| String::from_utf8_lossy(path).into_owned())
            .collect()
    }

    #[test]
    fn test_plain_directive() {
        let p = ResourcePattern::default();
        assert_eq!(paths(&p, r"\includegraphics{img.png}"), vec!["img.png"]);
    }

    #[test]
    fn test_directive_with_options() {
        let p = ResourcePattern::default();
        let text = r"\includegraphics[width=.5\linewidth]{fig/plot.pdf}";
        assert_eq!(paths(&p, text), vec!["fig/plot.pdf"]);
    }

    #[test]
    fn test_starred_and_spaced() {
        let p = ResourcePattern::default();
        let text = r"\includegraphics* [scale=2] {a.png} and \includegraphics{b.png}";
        assert_eq!(paths(&p, text), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_other_commands_ignored() {
        let p = ResourcePattern::default();
        assert!(paths(&p, r"\input{chapter1} \includegraphicsx{a.png}").is_empty());
    }

    #[test]
    fn test_custom_directives() {
        let p = ResourcePattern::new(&["includegraphics", "includesvg"]).unwrap();
        let text = r"\includesvg[width=3cm]{diagram.svg} \includegraphics{a.png}";
        assert_eq!(paths(&p, text), vec!["diagram.svg", "a.png"]);
    }

    #[test]
    fn test_latin1_text_around_directive() {
        let p = ResourcePattern::default();
        let text = b"Caf\xe9 \\includegraphics[alt=\xe9t\xe9]{img.png} na\xefve";
        let found: Vec<_> = p.path_ranges(text).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, b"img.png");
        assert_eq!(&text[found[0].0.clone()], b"img.png");
    }

    #[test]
    fn test_invalid_directive_rejected() {
        assert!(ResourcePattern::new(&["include graphics"]).is_err());
        assert!(ResourcePattern::new(&["\\includegraphics"]).is_err());
        assert!(ResourcePattern::new::<&str>(&[]).is_err());
    }

    #[test]
    fn test_is_control_word() {
        assert!(is_control_word("includegraphics"));
        assert!(is_control_word("my@include"));
        assert!(!is_control_word(""));
        assert!(!is_control_word("include2"));
    }
}
