//! Check outcome and exit-code mapping.

use crate::index::ExternalLink;
use crate::model::path::RepoPath;
use crate::report::consistency::ConsistencyReport;
use crate::report::policy::ReportPolicy;
use serde::Serialize;

/// No failing findings.
pub const EXIT_CLEAN: u8 = 0;
/// At least one finding failed under the active policy.
pub const EXIT_DISCREPANCY: u8 = 1;
/// Root or index document could not be read.
pub const EXIT_UNREADABLE_INPUT: u8 = 2;

/// Recoverable condition collected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckWarning {
    UnreadableFile { path: RepoPath, reason: String },
    MalformedIndexEntry { line: usize, text: String },
}

/// Everything one check run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub report: ConsistencyReport,
    /// Notes found on disk, including unreadable ones.
    pub notes_scanned: usize,
    /// Index entries parsed (including duplicates and dangling ones).
    pub entries_parsed: usize,
    pub external_links: Vec<ExternalLink>,
    /// Unreadable files first (by path), then malformed entries (by line).
    pub warnings: Vec<CheckWarning>,
    pub policy: ReportPolicy,
}

impl CheckOutcome {
    /// Number of malformed index list items.
    pub fn unparsed_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, CheckWarning::MalformedIndexEntry { .. }))
            .count()
    }

    /// Number of findings that fail the run under `policy`.
    pub fn failing_findings(&self) -> usize {
        let mut failing = 0;
        if self.policy.unlisted.is_error() {
            failing += self.report.unlisted.len();
        }
        if self.policy.dangling.is_error() {
            failing += self.report.dangling.len();
        }
        if self.policy.duplicates.is_error() {
            failing += self.report.duplicates.len();
        }
        if self.policy.strict {
            failing += self.unparsed_count();
        }
        failing
    }

    pub fn exit_code(&self) -> u8 {
        if self.failing_findings() > 0 {
            EXIT_DISCREPANCY
        } else {
            EXIT_CLEAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckOutcome, CheckWarning, EXIT_CLEAN, EXIT_DISCREPANCY};
    use crate::model::note::NoteFile;
    use crate::model::path::RepoPath;
    use crate::report::consistency::ConsistencyReport;
    use crate::report::policy::{ReportPolicy, Severity};

    fn outcome(report: ConsistencyReport, policy: ReportPolicy) -> CheckOutcome {
        CheckOutcome {
            report,
            notes_scanned: 0,
            entries_parsed: 0,
            external_links: Vec::new(),
            warnings: vec![CheckWarning::MalformedIndexEntry {
                line: 4,
                text: "- no link".to_string(),
            }],
            policy,
        }
    }

    #[test]
    fn warning_severity_does_not_fail() {
        let report =
            ConsistencyReport::build(vec![NoteFile::new(RepoPath::new("a/b.md"), None)], vec![]);
        let strict_off = ReportPolicy {
            unlisted: Severity::Warning,
            ..ReportPolicy::default()
        };
        assert_eq!(outcome(report.clone(), strict_off).exit_code(), EXIT_CLEAN);
        assert_eq!(
            outcome(report, ReportPolicy::default()).exit_code(),
            EXIT_DISCREPANCY
        );
    }

    #[test]
    fn strict_mode_fails_on_unparsed_items() {
        let lenient = outcome(ConsistencyReport::default(), ReportPolicy::default());
        assert_eq!(lenient.exit_code(), EXIT_CLEAN);

        let strict = outcome(
            ConsistencyReport::default(),
            ReportPolicy {
                strict: true,
                ..ReportPolicy::default()
            },
        );
        assert_eq!(strict.unparsed_count(), 1);
        assert_eq!(strict.exit_code(), EXIT_DISCREPANCY);
    }
}
