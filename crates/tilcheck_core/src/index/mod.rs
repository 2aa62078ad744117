//! Index document parsing.
//!
//! # Responsibility
//! - Turn the hand-maintained root index into typed `IndexEntry` records.
//! - Recognize links that point back into the same repository by URL.
//!
//! # Invariants
//! - Parsing never fails; malformed list items are collected, not fatal.
//! - Links to other repositories or sites never become index entries.

pub mod locator;
mod parser;

pub use locator::RepoLocator;
pub use parser::{
    parse_index, ExternalKind, ExternalLink, IndexOptions, ParsedIndex, UnparsedLine,
};
