//! Repository-relative path key.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Normalized repository-relative path.
///
/// Separators are always `/`, there is no leading `/` or `./`, and `.`/`..`
/// segments are resolved lexically. Equality is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RepoPath(String);

impl RepoPath {
    /// Normalizes `raw` into a repository-relative path.
    ///
    /// `..` segments never climb above the repository root.
    pub fn new(raw: &str) -> Self {
        let unified = raw.replace('\\', "/");
        let mut segments: Vec<&str> = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        Self(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the parent directory name, or `None` for root-level files.
    pub fn parent_name(&self) -> Option<&str> {
        let (parent, _) = self.0.rsplit_once('/')?;
        Some(parent.rsplit('/').next().unwrap_or(parent))
    }

    /// Returns the lowercase file extension of the last segment, if any.
    pub fn extension(&self) -> Option<String> {
        let file_name = self.0.rsplit('/').next()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

impl Display for RepoPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepoPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::RepoPath;

    #[test]
    fn normalizes_separators_and_dot_segments() {
        assert_eq!(RepoPath::new("./notes\\git/./rebase.md").as_str(), "notes/git/rebase.md");
        assert_eq!(RepoPath::new("/notes//a.md").as_str(), "notes/a.md");
        assert_eq!(RepoPath::new("notes/shell/../git/a.md").as_str(), "notes/git/a.md");
    }

    #[test]
    fn parent_segments_do_not_escape_root() {
        assert_eq!(RepoPath::new("../../a.md").as_str(), "a.md");
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_ne!(RepoPath::new("Notes/A.md"), RepoPath::new("notes/a.md"));
    }

    #[test]
    fn parent_name_and_extension() {
        let path = RepoPath::new("notes/docker/prune.MD");
        assert_eq!(path.parent_name(), Some("docker"));
        assert_eq!(path.extension().as_deref(), Some("md"));
        assert_eq!(RepoPath::new("top.md").parent_name(), None);
        assert_eq!(RepoPath::new("notes/.hidden").extension(), None);
        assert_eq!(RepoPath::new("LICENSE").extension(), None);
    }
}
