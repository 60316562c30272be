//! `texr normalize`: rewrite resource references without compiling.

use crate::config::TexrConfig;
use crate::diagnostics::{CollectSink, TerminalSink};
use crate::logger::Status;
use crate::resource::{Rewrite, UnresolvedResource, normalize_document, scan_document};
use crate::utils::plural::plural_count;
use crate::{debug, log};
use anyhow::Result;
use std::path::Path;

pub fn normalize(document: &Path, dry_run: bool, config: &TexrConfig) -> Result<()> {
    let Some(pattern) = config.normalize.pattern()? else {
        log!("normalize"; "disabled by [normalize] enable = false");
        return Ok(());
    };
    let document = crate::utils::path::normalize_path(document);

    let (rewrites, unresolved, absolute) = if dry_run {
        // Warnings are printed after the rewrite list, as part of the preview.
        let sink = CollectSink::new();
        let scanned = scan_document(&document, &pattern, &sink)?;
        print_rewrites(&scanned.rewrites, true);
        for warning in sink.warnings() {
            log!("dry-run"; "{}", warning);
        }
        (scanned.rewrites, scanned.unresolved, scanned.absolute)
    } else {
        let report = normalize_document(&document, &pattern, &TerminalSink)?;
        print_rewrites(&report.rewrites, false);
        if report.written {
            debug!("normalize"; "wrote {}", report.document.display());
        }
        (report.rewrites, report.unresolved, report.absolute)
    };

    print_unresolved(&unresolved);
    if absolute > 0 {
        debug!("normalize"; "{} already absolute", plural_count(absolute, "reference"));
    }

    let summary = match (rewrites.len(), dry_run) {
        (0, _) => "nothing to rewrite".to_string(),
        (n, true) => format!("would rewrite {}", plural_count(n, "reference")),
        (n, false) => format!("rewrote {}", plural_count(n, "reference")),
    };
    if unresolved.is_empty() {
        Status::success(&summary);
    } else {
        Status::warning(&format!(
            "{summary}, {} missing",
            plural_count(unresolved.len(), "resource")
        ));
    }
    Ok(())
}

fn print_rewrites(rewrites: &[Rewrite], dry_run: bool) {
    let module = if dry_run { "dry-run" } else { "normalize" };
    for rewrite in rewrites {
        log!(module; "{} -> {}", rewrite.original, rewrite.absolute.display());
    }
}

fn print_unresolved(unresolved: &[UnresolvedResource]) {
    for missing in unresolved {
        debug!("missing"; "{} (looked for {})", missing.reference, missing.resolved.display());
    }
}
