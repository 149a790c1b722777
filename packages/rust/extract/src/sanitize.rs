//! Display-side detection and removal of tool-result segments.
//!
//! Shares the marker logic with segment location so the two can never
//! disagree about what counts as a segment.

use crate::blocks::{BLOCK_RE, find_start_marker};

/// True when a start marker occurs anywhere in `text`, terminated or not.
pub fn has_block(text: &str) -> bool {
    find_start_marker(text).is_some()
}

/// Remove every complete segment, plus a trailing unterminated one, from
/// `text`, then trim the trailing whitespace the removal left behind.
/// Text without markers comes back byte-for-byte unchanged.
pub fn strip_blocks(text: &str) -> String {
    let mut result = BLOCK_RE.replace_all(text, "").into_owned();
    let mut removed = result.len() != text.len();

    if let Some(at) = find_start_marker(&result) {
        result.truncate(at);
        removed = true;
    }

    if removed {
        result.truncate(result.trim_end().len());
    }
    result
}
