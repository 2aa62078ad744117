//! Filesystem discovery of note documents.
//!
//! # Responsibility
//! - Walk a repository root lazily and yield one `NoteFile` per note document.
//! - Extract note titles from the first level-one heading.
//!
//! # Invariants
//! - Hidden and excluded directories are never descended into.
//! - Per-file read failures are recoverable; traversal failures are terminal.

mod scanner;
pub mod title;

pub use scanner::{NoteScanner, ScanError, ScanOptions, ScanResult};
pub use title::extract_title;
