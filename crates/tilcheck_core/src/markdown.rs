//! Line-level Markdown helpers shared by title extraction and index parsing.
//!
//! Only the small subset needed to locate headings and skip code is
//! recognized; no document model is built.

const FENCE_MARKERS: &[&str] = &["```", "~~~"];

/// Tracks whether the current line sits inside a fenced code block.
#[derive(Debug, Default)]
pub struct FenceTracker {
    open: Option<&'static str>,
}

impl FenceTracker {
    /// Feeds one line and returns whether it belongs to a code fence
    /// (including the opening and closing marker lines).
    pub fn is_code(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        if let Some(fence) = self.open {
            if trimmed.starts_with(fence) {
                self.open = None;
            }
            return true;
        }
        if let Some(fence) = FENCE_MARKERS
            .iter()
            .find(|fence| trimmed.starts_with(**fence))
        {
            self.open = Some(*fence);
            return true;
        }
        false
    }
}

/// Parses an ATX heading line into `(level, text)`.
///
/// Returns `None` for indented code, `#tag`-style text and empty headings.
pub fn atx_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > 3 {
        return None;
    }

    let level = trimmed.chars().take_while(|ch| *ch == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let text = strip_closing_sequence(rest.trim());
    if text.is_empty() {
        return None;
    }
    Some((level, text))
}

/// Removes an optional closing `#` run; it must stand alone or follow a
/// space or tab, so `C#` keeps its hash.
fn strip_closing_sequence(text: &str) -> &str {
    let without = text.trim_end_matches('#');
    if without.is_empty() {
        return without;
    }
    if without.ends_with([' ', '\t']) {
        return without.trim_end();
    }
    text
}
