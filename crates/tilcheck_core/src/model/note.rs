//! Note file and index entry records.
//!
//! # Invariants
//! - `NoteFile::category` is the immediate containing directory name.
//! - `IndexEntry::path` is always derived from `IndexEntry::target`.

use crate::model::path::RepoPath;
use serde::Serialize;

/// One note document discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteFile {
    pub path: RepoPath,
    /// `None` for notes at the repository root.
    pub category: Option<String>,
    /// Text of the first level-one heading, when present.
    pub title: Option<String>,
}

impl NoteFile {
    /// Creates a note record, deriving `category` from the parent directory.
    pub fn new(path: RepoPath, title: Option<String>) -> Self {
        let category = path.parent_name().map(str::to_string);
        Self {
            path,
            category,
            title,
        }
    }
}

/// One linked note reference declared in the index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// Text of the enclosing `##` heading; `None` before the first one.
    pub category: Option<String>,
    /// Link text as displayed in the index.
    pub title: String,
    /// Link target exactly as written.
    pub target: String,
    /// Normalized repository-relative form of `target`.
    pub path: RepoPath,
    /// 1-based line number in the index document.
    pub line: usize,
}
