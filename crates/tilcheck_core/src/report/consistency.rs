//! Set comparison between scanned notes and index entries.

use crate::model::note::{IndexEntry, NoteFile};
use crate::model::path::RepoPath;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Index entry together with the note it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    pub note: NoteFile,
    pub entry: IndexEntry,
}

/// Matched note filed under an index category that differs from its directory.
///
/// Informational only; never fails a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMismatch {
    pub path: RepoPath,
    pub index_category: String,
    pub directory: String,
}

/// Result of comparing one scan against one parsed index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Notes on disk that no index entry points at.
    pub unlisted: Vec<NoteFile>,
    /// Index entries whose path names no note on disk.
    pub dangling: Vec<IndexEntry>,
    /// Second and later entries for a path that is already listed.
    pub duplicates: Vec<IndexEntry>,
    pub matched: Vec<MatchedPair>,
    pub category_mismatches: Vec<CategoryMismatch>,
}

impl ConsistencyReport {
    /// Compares `notes` against `entries` keyed by normalized path.
    ///
    /// Every output list is sorted by path (then index line), independent of
    /// input order.
    pub fn build(
        notes: impl IntoIterator<Item = NoteFile>,
        entries: impl IntoIterator<Item = IndexEntry>,
    ) -> Self {
        let notes = notes
            .into_iter()
            .map(|note| (note.path.clone(), note))
            .collect::<BTreeMap<_, _>>();
        let mut entries = entries.into_iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));

        let mut report = Self::default();
        let mut listed = BTreeSet::<RepoPath>::new();

        for entry in entries {
            if !listed.insert(entry.path.clone()) {
                report.duplicates.push(entry);
                continue;
            }
            match notes.get(&entry.path) {
                Some(note) => {
                    if let Some(mismatch) = category_mismatch(note, &entry) {
                        report.category_mismatches.push(mismatch);
                    }
                    report.matched.push(MatchedPair {
                        note: note.clone(),
                        entry,
                    });
                }
                None => report.dangling.push(entry),
            }
        }

        report.unlisted = notes
            .into_iter()
            .filter(|(path, _)| !listed.contains(path))
            .map(|(_, note)| note)
            .collect();

        report
    }

    /// Returns whether disk and index agree one-to-one.
    pub fn is_consistent(&self) -> bool {
        self.unlisted.is_empty() && self.dangling.is_empty() && self.duplicates.is_empty()
    }
}

fn category_mismatch(note: &NoteFile, entry: &IndexEntry) -> Option<CategoryMismatch> {
    let index_category = entry.category.as_deref()?;
    let directory = note.category.as_deref()?;
    if category_slug(index_category) == category_slug(directory) {
        return None;
    }
    Some(CategoryMismatch {
        path: note.path.clone(),
        index_category: index_category.to_string(),
        directory: directory.to_string(),
    })
}

/// Lowercase alphanumerics only, so `Build Tools` matches `build-tools`.
fn category_slug(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
