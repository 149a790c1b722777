//! Best-effort extraction of structured tool results from assistant text.
//!
//! Assistant output interleaves prose with fenced `tool-result` segments
//! whose bodies are informal `key: value` lines. This crate locates those
//! segments (closed or still streaming) and assembles one
//! [`ToolResultRecord`] per segment. Display helpers strip the segments
//! back out of the prose.
//!
//! Parsing is pure and stateless: every call re-derives its output from
//! the input string alone, so callers simply re-run it on each streamed
//! update. Malformed input degrades to plain-text values; nothing here
//! returns an error.

mod blocks;
mod entities;
mod record;
mod sanitize;
mod value;

use toolcard_shared::ToolResultRecord;
use tracing::{debug, instrument};

pub use sanitize::{has_block, strip_blocks};

/// Parse assistant text into one record per tool-result segment, in
/// source order.
///
/// Complete segments take strict priority: a trailing unterminated
/// segment only yields a record when no complete segment exists. Text
/// without markers yields an empty vec.
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_tool_results(text: &str) -> Vec<ToolResultRecord> {
    let records: Vec<ToolResultRecord> = blocks::segments(text)
        .into_iter()
        .map(record::build_record)
        .collect();

    debug!(records = records.len(), "parsed tool results");
    records
}
