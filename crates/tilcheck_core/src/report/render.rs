//! Text and JSON renderers.

use crate::index::{ExternalKind, ExternalLink};
use crate::model::note::{IndexEntry, NoteFile};
use crate::report::consistency::{CategoryMismatch, MatchedPair};
use crate::report::outcome::{CheckOutcome, CheckWarning};
use crate::report::policy::ReportPolicy;
use serde::Serialize;
use std::fmt::Write;

/// Count summary shared by both output formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub notes: usize,
    pub entries: usize,
    pub matched: usize,
    pub unlisted: usize,
    pub dangling: usize,
    pub duplicates: usize,
    pub external_links: usize,
    pub unparsed: usize,
    pub warnings: usize,
    pub failing: usize,
    pub consistent: bool,
}

impl ReportSummary {
    pub fn from_outcome(outcome: &CheckOutcome) -> Self {
        Self {
            notes: outcome.notes_scanned,
            entries: outcome.entries_parsed,
            matched: outcome.report.matched.len(),
            unlisted: outcome.report.unlisted.len(),
            dangling: outcome.report.dangling.len(),
            duplicates: outcome.report.duplicates.len(),
            external_links: outcome.external_links.len(),
            unparsed: outcome.unparsed_count(),
            warnings: outcome.warnings.len(),
            failing: outcome.failing_findings(),
            consistent: outcome.report.is_consistent(),
        }
    }
}

/// Serializable view of one outcome.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub summary: ReportSummary,
    pub policy: ReportPolicy,
    pub exit_code: u8,
    pub unlisted: &'a [NoteFile],
    pub dangling: &'a [IndexEntry],
    pub duplicates: &'a [IndexEntry],
    pub matched: &'a [MatchedPair],
    pub category_mismatches: &'a [CategoryMismatch],
    pub external_links: &'a [ExternalLink],
    pub warnings: &'a [CheckWarning],
}

impl<'a> ReportDocument<'a> {
    pub fn new(outcome: &'a CheckOutcome) -> Self {
        Self {
            summary: ReportSummary::from_outcome(outcome),
            policy: outcome.policy,
            exit_code: outcome.exit_code(),
            unlisted: &outcome.report.unlisted,
            dangling: &outcome.report.dangling,
            duplicates: &outcome.report.duplicates,
            matched: &outcome.report.matched,
            category_mismatches: &outcome.report.category_mismatches,
            external_links: &outcome.external_links,
            warnings: &outcome.warnings,
        }
    }
}

/// Renders the outcome as pretty-printed JSON.
pub fn render_json(outcome: &CheckOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ReportDocument::new(outcome))
}

/// Renders the outcome as a human-readable report.
///
/// Matched pairs are only counted; every discrepancy is listed by path.
pub fn render_text(outcome: &CheckOutcome) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, outcome);
    out
}

/// Writes the human-readable report into any `fmt::Write` sink.
pub fn write_text(out: &mut impl Write, outcome: &CheckOutcome) -> std::fmt::Result {
    let summary = ReportSummary::from_outcome(outcome);
    let policy = outcome.policy;
    let report = &outcome.report;

    writeln!(out, "notes scanned:     {}", summary.notes)?;
    writeln!(out, "index entries:     {}", summary.entries)?;
    writeln!(out, "matched:           {}", summary.matched)?;
    writeln!(
        out,
        "unlisted files:    {} ({})",
        summary.unlisted, policy.unlisted
    )?;
    writeln!(
        out,
        "dangling entries:  {} ({})",
        summary.dangling, policy.dangling
    )?;
    writeln!(
        out,
        "duplicate entries: {} ({})",
        summary.duplicates, policy.duplicates
    )?;
    writeln!(out, "external links:    {}", summary.external_links)?;
    writeln!(
        out,
        "unparsed items:    {} ({})",
        summary.unparsed,
        if policy.strict { "error" } else { "warning" }
    )?;

    if !report.unlisted.is_empty() {
        writeln!(out, "\nunlisted files:")?;
        for note in &report.unlisted {
            match &note.title {
                Some(title) => writeln!(out, "  {} \"{}\"", note.path, title)?,
                None => writeln!(out, "  {}", note.path)?,
            }
        }
    }

    write_entries(out, "dangling entries", &report.dangling)?;
    write_entries(out, "duplicate entries", &report.duplicates)?;

    if !report.category_mismatches.is_empty() {
        writeln!(out, "\ncategory mismatches:")?;
        for mismatch in &report.category_mismatches {
            writeln!(
                out,
                "  {} listed under \"{}\" but stored in {}/",
                mismatch.path, mismatch.index_category, mismatch.directory
            )?;
        }
    }

    let non_notes = outcome
        .external_links
        .iter()
        .filter(|link| link.kind == ExternalKind::NonNote)
        .collect::<Vec<_>>();
    if !non_notes.is_empty() {
        writeln!(out, "\nnon-note links:")?;
        for link in non_notes {
            writeln!(out, "  line {}: {}", link.line, link.target)?;
        }
    }

    if !outcome.warnings.is_empty() {
        writeln!(out, "\nwarnings:")?;
        for warning in &outcome.warnings {
            match warning {
                CheckWarning::UnreadableFile { path, reason } => {
                    writeln!(out, "  unreadable file {path}: {reason}")?
                }
                CheckWarning::MalformedIndexEntry { line, text } => {
                    writeln!(out, "  malformed index entry at line {line}: {text}")?
                }
            }
        }
    }

    if summary.failing == 0 {
        writeln!(out, "\nstatus: ok")
    } else {
        writeln!(out, "\nstatus: failed ({} failing findings)", summary.failing)
    }
}

fn write_entries(
    out: &mut impl Write,
    heading: &str,
    entries: &[IndexEntry],
) -> std::fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{heading}:")?;
    for entry in entries {
        writeln!(
            out,
            "  {} (line {}, \"{}\")",
            entry.path, entry.line, entry.title
        )?;
    }
    Ok(())
}
