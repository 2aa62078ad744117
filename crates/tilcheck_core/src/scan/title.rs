//! Note title extraction.

use crate::markdown::{atx_heading, FenceTracker};

/// Returns the text of the first level-one ATX heading (`# Title`).
///
/// Lines inside fenced code blocks are ignored, so shell comments in
/// snippets are never mistaken for headings. Closing `#` runs are trimmed.
pub fn extract_title(text: &str) -> Option<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut fences = FenceTracker::default();

    text.lines()
        .filter(|line| !fences.is_code(line))
        .find_map(|line| match atx_heading(line) {
            Some((1, heading)) => Some(heading.to_string()),
            _ => None,
        })
}
