//! Check use-case service.
//!
//! # Responsibility
//! - Run one index-vs-disk check from a validated `CheckConfig`.
//! - Collect recoverable conditions as warnings instead of aborting.
//!
//! # Invariants
//! - The reporter runs only after both the scan and the index parse finished.
//! - Missing root or index document aborts the run with `CheckError`.
//! - Warnings are ordered deterministically (files by path, entries by line).

use crate::config::{CheckConfig, ConfigError};
use crate::index::{parse_index, IndexOptions};
use crate::model::note::NoteFile;
use crate::model::path::RepoPath;
use crate::report::{CheckOutcome, CheckWarning, ConsistencyReport};
use crate::scan::{NoteScanner, ScanError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type CheckResult<T> = Result<T, CheckError>;

/// Fatal error for one check run.
#[derive(Debug)]
pub enum CheckError {
    /// Configuration failed validation.
    Config(ConfigError),
    /// Root directory or index document does not exist.
    InputNotFound { path: PathBuf, source: std::io::Error },
    /// Index document exists but cannot be read.
    UnreadableIndex { path: PathBuf, source: std::io::Error },
    /// Terminal scanner failure.
    Scan(ScanError),
}

impl Display for CheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::InputNotFound { path, source } => {
                write!(f, "input not found `{}`: {source}", path.display())
            }
            Self::UnreadableIndex { path, source } => {
                write!(f, "cannot read index `{}`: {source}", path.display())
            }
            Self::Scan(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::InputNotFound { source, .. } => Some(source),
            Self::UnreadableIndex { source, .. } => Some(source),
            Self::Scan(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CheckError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ScanError> for CheckError {
    fn from(value: ScanError) -> Self {
        match value {
            ScanError::RootNotFound { root, source } => Self::InputNotFound { path: root, source },
            other => Self::Scan(other),
        }
    }
}

/// Check service facade over one configuration.
#[derive(Debug)]
pub struct CheckService {
    config: CheckConfig,
}

impl CheckService {
    /// Creates a service after validating `config`.
    pub fn new(config: CheckConfig) -> CheckResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Scans, parses, compares and returns the full outcome.
    ///
    /// # Errors
    /// - `CheckError::InputNotFound` when the root or index is missing.
    /// - `CheckError::UnreadableIndex` when the index cannot be read.
    /// - `CheckError::Scan` when directory traversal fails.
    pub fn run(&self) -> CheckResult<CheckOutcome> {
        let config = &self.config;
        info!(
            "event=check_start module=service status=ok root={} index={}",
            config.root.display(),
            config.index.display()
        );

        // Root is validated before the index so a wrong root reports itself.
        let scanner = NoteScanner::new(&config.root, &config.scan_options())?;
        let index_text = self.read_index()?;

        let index_options = IndexOptions {
            extension: config.normalized_extension(),
            base_dir: RepoPath::new(
                &config
                    .index
                    .parent()
                    .map(|parent| parent.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ),
            locator: config.repository_locator(),
        };
        let parsed = parse_index(&index_text, &index_options);

        let mut warnings = Vec::new();
        let mut notes: Vec<NoteFile> = Vec::new();
        for item in scanner {
            match item {
                Ok(note) => notes.push(note),
                Err(ScanError::Unreadable { note, source }) => {
                    warnings.push(CheckWarning::UnreadableFile {
                        path: note.path.clone(),
                        reason: source.to_string(),
                    });
                    notes.push(note);
                }
                Err(err) => return Err(err.into()),
            }
        }
        warnings.extend(parsed.unparsed.into_iter().map(|unparsed| {
            warn!(
                "event=index_item module=service status=malformed line={}",
                unparsed.line
            );
            CheckWarning::MalformedIndexEntry {
                line: unparsed.line,
                text: unparsed.text,
            }
        }));

        let notes_scanned = notes.len();
        let entries_parsed = parsed.entries.len();
        let report = ConsistencyReport::build(notes, parsed.entries);
        let outcome = CheckOutcome {
            report,
            notes_scanned,
            entries_parsed,
            external_links: parsed.external_links,
            warnings,
            policy: config.report_policy(),
        };

        info!(
            "event=check_done module=service status=ok notes={} entries={} unlisted={} dangling={} duplicates={} exit_code={}",
            outcome.notes_scanned,
            outcome.entries_parsed,
            outcome.report.unlisted.len(),
            outcome.report.dangling.len(),
            outcome.report.duplicates.len(),
            outcome.exit_code()
        );
        Ok(outcome)
    }

    fn read_index(&self) -> CheckResult<String> {
        let path = self.config.index_path();
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CheckError::InputNotFound { path, source }
            } else {
                CheckError::UnreadableIndex { path, source }
            }
        })
    }
}
