//! Lazy note scanner built on `walkdir`.

use crate::model::note::NoteFile;
use crate::model::path::RepoPath;
use crate::scan::title::extract_title;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub type ScanResult<T> = Result<T, ScanError>;

/// Scanner error for root validation, traversal and per-file reads.
#[derive(Debug)]
pub enum ScanError {
    /// Root path is missing or cannot be inspected.
    RootNotFound { root: PathBuf, source: std::io::Error },
    /// Root path exists but is not a directory.
    NotADirectory(PathBuf),
    /// Directory traversal failed; the scan cannot continue.
    Walk(walkdir::Error),
    /// One note file could not be read; the scan continues.
    ///
    /// The file still exists, so `note` (untitled) stays part of the note set.
    Unreadable { note: NoteFile, source: std::io::Error },
}

impl ScanError {
    /// Returns whether the scan can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootNotFound { root, source } => {
                write!(f, "repository root `{}` not found: {source}", root.display())
            }
            Self::NotADirectory(root) => {
                write!(f, "repository root `{}` is not a directory", root.display())
            }
            Self::Walk(err) => write!(f, "directory traversal failed: {err}"),
            Self::Unreadable { note, source } => {
                write!(f, "cannot read `{}`: {source}", note.path)
            }
        }
    }
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RootNotFound { source, .. } => Some(source),
            Self::NotADirectory(_) => None,
            Self::Walk(err) => Some(err),
            Self::Unreadable { source, .. } => Some(source),
        }
    }
}

impl From<walkdir::Error> for ScanError {
    fn from(value: walkdir::Error) -> Self {
        Self::Walk(value)
    }
}

/// Filters applied while walking the repository.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lowercase extension without the leading dot.
    pub extension: String,
    /// Directory names that are pruned wherever they appear.
    pub excluded_dirs: Vec<String>,
    /// Repository-relative files that are never reported as notes.
    pub excluded_files: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
            excluded_dirs: vec![".git".to_string()],
            excluded_files: Vec::new(),
        }
    }
}

/// Lazy iterator over the note files below one root.
///
/// Entries are visited in file-name order within each directory, so two
/// scans of an unchanged tree yield the same sequence.
pub struct NoteScanner {
    root: PathBuf,
    walker: walkdir::IntoIter,
    extension: String,
    excluded_dirs: BTreeSet<String>,
    excluded_files: BTreeSet<RepoPath>,
    finished: bool,
}

impl NoteScanner {
    /// Prepares a scan of `root`.
    ///
    /// # Errors
    /// - Returns `ScanError::RootNotFound` when `root` cannot be inspected.
    /// - Returns `ScanError::NotADirectory` when `root` is a plain file.
    pub fn new(root: &Path, options: &ScanOptions) -> ScanResult<Self> {
        let metadata = std::fs::metadata(root).map_err(|source| ScanError::RootNotFound {
            root: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        Ok(Self {
            root: root.to_path_buf(),
            walker: WalkDir::new(root).sort_by_file_name().into_iter(),
            extension: options
                .extension
                .trim_start_matches('.')
                .to_ascii_lowercase(),
            excluded_dirs: options.excluded_dirs.iter().cloned().collect(),
            excluded_files: options
                .excluded_files
                .iter()
                .map(|file| RepoPath::new(file))
                .collect(),
            finished: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_pruned_dir(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.excluded_dirs.contains(&*name)
    }

    fn relative_path(&self, entry: &DirEntry) -> RepoPath {
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        RepoPath::new(&relative.to_string_lossy())
    }

    fn read_note(&self, entry: &DirEntry, path: RepoPath) -> ScanResult<NoteFile> {
        let text = std::fs::read_to_string(entry.path()).map_err(|source| {
            warn!(
                "event=note_read module=scan status=error path={} reason={}",
                path, source
            );
            ScanError::Unreadable {
                note: NoteFile::new(path.clone(), None),
                source,
            }
        })?;
        let title = extract_title(&text);
        debug!(
            "event=note_found module=scan status=ok path={} titled={}",
            path,
            title.is_some()
        );
        Ok(NoteFile::new(path, title))
    }
}

impl Iterator for NoteScanner {
    type Item = ScanResult<NoteFile>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(ScanError::Walk(err)));
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            if entry.file_type().is_dir() {
                if self.is_pruned_dir(&entry) {
                    debug!(
                        "event=dir_pruned module=scan status=ok path={}",
                        self.relative_path(&entry)
                    );
                    self.walker.skip_current_dir();
                }
                continue;
            }

            // Symlinked notes count when their target is a regular file.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let path = self.relative_path(&entry);
            if path.extension().as_deref() != Some(self.extension.as_str()) {
                continue;
            }
            if self.excluded_files.contains(&path) {
                continue;
            }

            return Some(self.read_note(&entry, path));
        }
    }
}
