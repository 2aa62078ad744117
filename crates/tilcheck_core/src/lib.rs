//! Core logic for checking a notes repository against its hand-kept index.
//! The CLI is a thin shell over `CheckService`.

pub mod config;
pub mod index;
pub mod logging;
mod markdown;
pub mod model;
pub mod report;
pub mod scan;
pub mod service;

pub use config::{CheckConfig, ConfigError, ConfigResult};
pub use index::{
    parse_index, ExternalKind, ExternalLink, IndexOptions, ParsedIndex, RepoLocator, UnparsedLine,
};
pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::note::{IndexEntry, NoteFile};
pub use model::path::RepoPath;
pub use report::{
    render_json, render_text, write_text, CategoryMismatch, CheckOutcome, CheckWarning,
    ConsistencyReport, MatchedPair, ReportDocument, ReportPolicy, ReportSummary, Severity,
    EXIT_CLEAN, EXIT_DISCREPANCY, EXIT_UNREADABLE_INPUT,
};
pub use scan::{extract_title, NoteScanner, ScanError, ScanOptions, ScanResult};
pub use service::check_service::{CheckError, CheckResult, CheckService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
