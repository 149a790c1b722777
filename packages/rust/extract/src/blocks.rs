//! Fenced segment location.
//!
//! A segment starts at a fence token carrying the `tool-result` label and
//! ends at the next bare fence token. Complete segments always win; a
//! trailing unterminated start marker only counts when no complete segment
//! exists (streaming output where the closing fence hasn't arrived yet).

use std::sync::LazyLock;

use regex::Regex;

/// Literal start marker: fence token plus type label.
pub(crate) const START_MARKER: &str = "```tool-result";

/// Matches one complete segment. The inner match is lazy so adjacent
/// segments never merge.
pub(crate) static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```tool-result\s+(.*?)```").expect("block regex")
});

/// Locate segment bodies in `text`, in source order.
///
/// Returns every complete segment when at least one exists; otherwise the
/// trailing unterminated segment, if any; otherwise nothing. Absence of
/// markers is a normal outcome, not an error.
pub(crate) fn segments(text: &str) -> Vec<&str> {
    let complete: Vec<&str> = BLOCK_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    if !complete.is_empty() {
        return complete;
    }

    partial_segment(text)
        .map(|body| vec![body])
        .unwrap_or_default()
}

/// Body of a trailing start-marker-without-end, if present.
fn partial_segment(text: &str) -> Option<&str> {
    let at = find_start_marker(text)?;
    let rest = &text[at + START_MARKER.len()..];
    Some(rest.trim_start())
}

/// Byte offset of the first start marker. The label must be followed by
/// whitespace or end of input, so prose like "```tool-results" does not
/// count.
pub(crate) fn find_start_marker(text: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = text[from..].find(START_MARKER) {
        let at = from + pos;
        let after = at + START_MARKER.len();
        match text[after..].chars().next() {
            None => return Some(at),
            Some(c) if c.is_whitespace() => return Some(at),
            Some(_) => from = after,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_complete_segments_in_order() {
        let text = "intro\n```tool-result\ntool: A\n```\nmiddle\n```tool-result\ntool: B\n```\n";
        assert_eq!(segments(text), vec!["tool: A\n", "tool: B\n"]);
    }

    #[test]
    fn adjacent_segments_do_not_merge() {
        let text = "```tool-result\ntool: A\n``````tool-result\ntool: B\n```";
        assert_eq!(segments(text), vec!["tool: A\n", "tool: B\n"]);
    }

    #[test]
    fn no_markers_means_no_segments() {
        assert!(segments("just prose, nothing else").is_empty());
        assert!(segments("").is_empty());
    }

    #[test]
    fn plain_code_fences_are_not_segments() {
        let text = "```rust\nfn main() {}\n```";
        assert!(segments(text).is_empty());
    }

    #[test]
    fn unterminated_marker_yields_partial_segment() {
        let text = "thinking...\n```tool-result\ntool: BookingSearch\nstatus:";
        assert_eq!(segments(text), vec!["tool: BookingSearch\nstatus:"]);
    }

    #[test]
    fn complete_segment_suppresses_trailing_partial() {
        let text = "```tool-result\ntool: A\n```\n```tool-result\ntool: B";
        assert_eq!(segments(text), vec!["tool: A\n"]);
    }

    #[test]
    fn label_must_be_followed_by_whitespace() {
        assert!(segments("```tool-results are neat").is_empty());
        assert!(find_start_marker("```tool-results are neat").is_none());
    }

    #[test]
    fn marker_at_end_of_text_counts() {
        let text = "streaming ```tool-result";
        assert_eq!(find_start_marker(text), Some(10));
        assert_eq!(segments(text), vec![""]);
    }
}
