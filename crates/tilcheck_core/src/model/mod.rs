//! Domain records shared by the scanner, index parser and reporter.
//!
//! # Responsibility
//! - Define the immutable per-run shapes for notes on disk and index entries.
//! - Own repository-relative path normalization used as the comparison key.
//!
//! # Invariants
//! - Every comparison between disk and index goes through `RepoPath`.
//! - Records are created once per run and never mutated afterwards.

pub mod note;
pub mod path;
