//! Consistency comparison between disk and index, and its rendering.
//!
//! # Responsibility
//! - Split notes and index entries into unlisted, dangling and matched sets.
//! - Decide which findings fail a run and map that to an exit code.
//! - Render deterministic text and JSON reports.
//!
//! # Invariants
//! - Comparison key is the normalized `RepoPath`, case-sensitive.
//! - The unlisted, dangling, duplicate and matched sets are disjoint.
//! - Rendering the same outcome twice produces identical bytes.

pub mod consistency;
pub mod outcome;
pub mod policy;
mod render;

pub use consistency::{CategoryMismatch, ConsistencyReport, MatchedPair};
pub use outcome::{
    CheckOutcome, CheckWarning, EXIT_CLEAN, EXIT_DISCREPANCY, EXIT_UNREADABLE_INPUT,
};
pub use policy::{ReportPolicy, Severity};
pub use render::{render_json, render_text, write_text, ReportDocument, ReportSummary};
