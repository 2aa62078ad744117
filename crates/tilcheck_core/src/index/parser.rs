//! Index document parser.
//!
//! # Invariants
//! - A `##` heading sets the category for every following list item.
//! - Fragment-only links are in-page anchors and are silently ignored.
//! - Every list item either yields at least one link or is reported unparsed.

use crate::index::locator::RepoLocator;
use crate::markdown::{atx_heading, FenceTracker};
use crate::model::note::IndexEntry;
use crate::model::path::RepoPath;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static LIST_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s{0,3}(?:[-*+]|\d{1,9}[.)])\s+(.*)$").expect("valid list item regex")
});
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    // Link text may nest one level of brackets; targets are bare or `<...>`.
    Regex::new(
        r#"(!?)\[((?:[^\[\]]|\[[^\[\]]*\])*)\]\(\s*(?:<([^<>\n]+)>|([^()\s<>]+))(?:\s+"[^"]*")?\s*\)"#,
    )
    .expect("valid link regex")
});
static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("valid scheme regex"));

/// Parser settings.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Lowercase note extension without the leading dot.
    pub extension: String,
    /// Directory of the index document; relative links resolve against it.
    pub base_dir: RepoPath,
    /// Repository identity for absolute self-links.
    pub locator: Option<RepoLocator>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            extension: "md".to_string(),
            base_dir: RepoPath::new(""),
            locator: None,
        }
    }
}

/// Why a link was left out of the entry set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalKind {
    /// URL outside this repository (other site, other repo, `mailto:`).
    ForeignUrl,
    /// In-repository target that is not a note (image, license, directory).
    NonNote,
}

/// Link that was recognized but is not an index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalLink {
    pub line: usize,
    pub target: String,
    pub kind: ExternalKind,
}

/// List item that carries no recognizable link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnparsedLine {
    pub line: usize,
    pub text: String,
}

/// Parser output for one index document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIndex {
    pub entries: Vec<IndexEntry>,
    pub external_links: Vec<ExternalLink>,
    pub unparsed: Vec<UnparsedLine>,
}

enum Target {
    Anchor,
    External(ExternalKind),
    Note(RepoPath),
}

/// Parses index text into entries, skipped links and unparsed list items.
pub fn parse_index(text: &str, options: &IndexOptions) -> ParsedIndex {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut parsed = ParsedIndex::default();
    let mut fences = FenceTracker::default();
    let mut category: Option<String> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if fences.is_code(line) {
            continue;
        }

        if let Some((level, heading)) = atx_heading(line) {
            if level == 2 {
                category = Some(heading.to_string());
            }
            continue;
        }

        let Some(item) = LIST_ITEM_RE.captures(line) else {
            continue;
        };
        let body = item.get(1).map_or("", |m| m.as_str());

        let mut saw_link = false;
        for link in LINK_RE.captures_iter(body) {
            if &link[1] == "!" {
                continue;
            }
            saw_link = true;
            let title = link[2].trim().to_string();
            let Some(target) = link.get(3).or_else(|| link.get(4)) else {
                continue;
            };
            let target = target.as_str().to_string();

            match classify_target(&target, options) {
                Target::Anchor => {}
                Target::External(kind) => parsed.external_links.push(ExternalLink {
                    line: line_no,
                    target,
                    kind,
                }),
                Target::Note(path) => {
                    debug!(
                        "event=index_entry module=index status=ok line={} path={}",
                        line_no, path
                    );
                    parsed.entries.push(IndexEntry {
                        category: category.clone(),
                        title,
                        target,
                        path,
                        line: line_no,
                    });
                }
            }
        }

        if !saw_link {
            debug!(
                "event=index_item module=index status=unparsed line={}",
                line_no
            );
            parsed.unparsed.push(UnparsedLine {
                line: line_no,
                text: line.trim().to_string(),
            });
        }
    }

    info!(
        "event=index_parsed module=index status=ok entries={} external={} unparsed={}",
        parsed.entries.len(),
        parsed.external_links.len(),
        parsed.unparsed.len()
    );
    parsed
}

fn classify_target(raw: &str, options: &IndexOptions) -> Target {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return Target::Anchor;
    }

    let path = if SCHEME_RE.is_match(raw) {
        let relative = options
            .locator
            .as_ref()
            .and_then(|locator| locator.relative_path(raw));
        match relative {
            Some(relative) if !relative.is_empty() => RepoPath::new(&percent_decode(&relative)),
            _ => return Target::External(ExternalKind::ForeignUrl),
        }
    } else {
        let local = raw.split(['#', '?']).next().unwrap_or(raw);
        let local = percent_decode(local);
        if local.starts_with('/') {
            RepoPath::new(&local)
        } else {
            RepoPath::new(&format!("{}/{}", options.base_dir, local))
        }
    };

    if path.extension().as_deref() == Some(options.extension.as_str()) {
        Target::Note(path)
    } else {
        Target::External(ExternalKind::NonNote)
    }
}

/// Decodes `%XX` escapes; malformed escapes are kept verbatim.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' && idx + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[idx + 1..idx + 3]).ok();
            if let Some(byte) = hex.and_then(|hex| u8::from_str_radix(hex, 16).ok()) {
                decoded.push(byte);
                idx += 3;
                continue;
            }
        }
        decoded.push(bytes[idx]);
        idx += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
