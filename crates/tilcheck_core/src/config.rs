//! Check configuration loading and validation.
//!
//! # Responsibility
//! - Hold every knob recognized by a check run with its default.
//! - Load overrides from a JSON file and validate the merged result.
//!
//! # Invariants
//! - A validated config always has a non-empty extension without separators.
//! - The index document is always excluded from the scanned note set.

use crate::index::locator::RepoLocator;
use crate::report::policy::{ReportPolicy, Severity};
use crate::scan::ScanOptions;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_INDEX: &str = "README.md";
pub const DEFAULT_EXTENSION: &str = "md";
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git", ".hg", ".svn", "node_modules", "target"];

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error for file loading and field validation.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    EmptyExtension,
    InvalidExtension(String),
    EmptyIndex,
    InvalidRepository(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
            Self::EmptyExtension => write!(f, "note extension cannot be empty"),
            Self::InvalidExtension(value) => {
                write!(f, "note extension `{value}` must not contain path separators")
            }
            Self::EmptyIndex => write!(f, "index document path cannot be empty"),
            Self::InvalidRepository(value) => {
                write!(f, "repository `{value}` is not a recognized repository URL")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Full set of options for one check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Repository root to scan.
    pub root: PathBuf,
    /// Index document, relative to `root`.
    pub index: PathBuf,
    /// Note file extension, with or without the leading dot.
    pub extension: String,
    /// Directory names never descended into.
    pub excluded_dirs: Vec<String>,
    /// Repository-relative files that are not notes.
    pub excluded_files: Vec<String>,
    /// Treat unparsed index list items as failures.
    pub strict: bool,
    /// Repository URL used to recognize absolute self-links.
    pub repository: Option<String>,
    pub unlisted: Severity,
    pub dangling: Severity,
    pub duplicates: Severity,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: PathBuf::from(DEFAULT_INDEX),
            extension: DEFAULT_EXTENSION.to_string(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|dir| dir.to_string())
                .collect(),
            excluded_files: Vec::new(),
            strict: false,
            repository: None,
            unlisted: Severity::Error,
            dangling: Severity::Error,
            duplicates: Severity::Error,
        }
    }
}

impl CheckConfig {
    /// Creates a default config rooted at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Loads a JSON config file; missing fields take their defaults.
    ///
    /// # Errors
    /// - Returns `ConfigError::Io` when the file cannot be read.
    /// - Returns `ConfigError::Parse` for malformed JSON or unknown fields.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates field-level invariants.
    pub fn validate(&self) -> ConfigResult<()> {
        let extension = self.normalized_extension();
        if extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        if extension.contains(['/', '\\']) {
            return Err(ConfigError::InvalidExtension(self.extension.clone()));
        }
        if self.index.as_os_str().is_empty() {
            return Err(ConfigError::EmptyIndex);
        }
        if let Some(repository) = &self.repository {
            if RepoLocator::parse(repository).is_none() {
                return Err(ConfigError::InvalidRepository(repository.clone()));
            }
        }
        Ok(())
    }

    /// Lowercase extension without the leading dot.
    pub fn normalized_extension(&self) -> String {
        self.extension
            .trim()
            .trim_start_matches('.')
            .to_ascii_lowercase()
    }

    /// Absolute-or-relative path of the index document on disk.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index)
    }

    /// Scanner options derived from this config.
    ///
    /// The index document itself is always added to the excluded files.
    pub fn scan_options(&self) -> ScanOptions {
        let mut excluded_files = self.excluded_files.clone();
        excluded_files.push(self.index.to_string_lossy().into_owned());
        ScanOptions {
            extension: self.normalized_extension(),
            excluded_dirs: self.excluded_dirs.clone(),
            excluded_files,
        }
    }

    /// Explicit repository locator, falling back to the checkout's origin remote.
    pub fn repository_locator(&self) -> Option<RepoLocator> {
        match &self.repository {
            Some(url) => RepoLocator::parse(url),
            None => RepoLocator::from_git_config(&self.root),
        }
    }

    pub fn report_policy(&self) -> ReportPolicy {
        ReportPolicy {
            unlisted: self.unlisted,
            dangling: self.dangling,
            duplicates: self.duplicates,
            strict: self.strict,
        }
    }
}
