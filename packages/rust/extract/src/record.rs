//! Segment body to record assembly.
//!
//! A three-state line walk: `ExpectKey` looks for the first separator,
//! `Single` accumulates a soft-wrapped one-line value, `Multi` accumulates
//! a multi-line value verbatim. Multi-line accumulation only ends at a
//! top-level `key: value` shaped line, so the `- key: value` bullets
//! inside a value never start a new field.

use std::sync::LazyLock;

use regex::Regex;
use toolcard_shared::{Status, ToolResultRecord};
use tracing::debug;

use crate::value::{bullet_content, coerce};

/// Shape of a top-level `key: value` line. Anchored at column 0 and
/// required to start with a word character, so bullet markers and
/// indented continuation lines never match.
static KEY_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][\w .-]*?)\s*:\s*(.*)$").expect("key line regex"));

/// Line-walk state. `key` is the pending field name, `raw` the value text
/// accumulated for it so far.
enum State {
    ExpectKey,
    Single { key: String, raw: String },
    Multi { key: String, raw: String },
}

/// Assemble one record from one segment body.
///
/// Never fails: unusable lines are skipped and a missing tool or status
/// falls back to the record defaults.
pub(crate) fn build_record(body: &str) -> ToolResultRecord {
    let mut record = ToolResultRecord::default();
    let mut state = State::ExpectKey;

    for line in body.lines() {
        state = match state {
            State::ExpectKey => begin_pair(line),
            State::Single { key, mut raw } => {
                if let Some((next_key, next_raw)) = split_key_line(line) {
                    flush(&mut record, &key, &raw);
                    pending(next_key, next_raw)
                } else if line.trim().is_empty() {
                    State::Single { key, raw }
                } else {
                    if !raw.is_empty() {
                        raw.push(' ');
                    }
                    raw.push_str(line.trim());
                    State::Single { key, raw }
                }
            }
            State::Multi { key, mut raw } => {
                if let Some((next_key, next_raw)) = split_key_line(line) {
                    flush(&mut record, &key, &raw);
                    pending(next_key, next_raw)
                } else {
                    raw.push('\n');
                    raw.push_str(line);
                    State::Multi { key, raw }
                }
            }
        };
    }

    if let State::Single { key, raw } | State::Multi { key, raw } = state {
        flush(&mut record, &key, &raw);
    }

    debug!(
        tool = %record.tool,
        status = %record.status,
        fields = record.fields.len(),
        "built record"
    );
    record
}

/// `ExpectKey` decision: any line containing a separator with a non-empty
/// left-hand side starts a pair; everything else is skipped.
fn begin_pair(line: &str) -> State {
    match line.split_once(':') {
        Some((lhs, rhs)) if !lhs.trim().is_empty() => pending(lhs.trim(), rhs.trim()),
        _ => State::ExpectKey,
    }
}

/// Choose the accumulation state for a fresh pair. Empty, bracket-led and
/// bullet-led values expect more lines; anything else is a single value.
fn pending(key: &str, raw: &str) -> State {
    let key = key.to_string();
    let raw = raw.to_string();
    if raw.is_empty() || raw.starts_with('[') || bullet_content(&raw).is_some() {
        State::Multi { key, raw }
    } else {
        State::Single { key, raw }
    }
}

/// Strict `key: value` test used while a value is accumulating. Rejects
/// `//`-led right-hand sides so a bare URL on its own line does not flush
/// the pending field.
fn split_key_line(line: &str) -> Option<(&str, &str)> {
    let caps = KEY_LINE_RE.captures(line)?;
    let value = caps.get(2).map_or("", |m| m.as_str());
    if value.starts_with("//") {
        return None;
    }
    let key = caps.get(1).map_or("", |m| m.as_str());
    Some((key, value.trim()))
}

/// Store a completed pair. `tool`, `status` and `title` route to record
/// slots (empty values keep the defaults); everything else is coerced
/// into `fields`, a later duplicate replacing the value while keeping the
/// first key's position.
fn flush(record: &mut ToolResultRecord, key: &str, raw: &str) {
    if key.eq_ignore_ascii_case("tool") {
        let value = raw.trim();
        if !value.is_empty() {
            record.tool = value.to_string();
        }
    } else if key.eq_ignore_ascii_case("status") {
        let value = raw.trim();
        if !value.is_empty() {
            record.status = Status::parse(value);
        }
    } else if key.eq_ignore_ascii_case("title") {
        let value = raw.trim();
        if !value.is_empty() {
            record.title = Some(value.to_string());
        }
    } else {
        record.fields.insert(key.to_string(), coerce(raw));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use toolcard_shared::Value;

    use super::*;

    #[test]
    fn booking_search_body() {
        let body = "tool: BookingSearch\nstatus: success\nrooms: [101, 102]\n";
        let record = build_record(body);

        assert_eq!(record.tool, "BookingSearch");
        assert_eq!(record.status, Status::Success);
        assert_eq!(record.title, None);
        assert_eq!(
            record.fields.get("rooms"),
            Some(&Value::List(vec![
                Value::Number(101.0),
                Value::Number(102.0)
            ]))
        );
    }

    #[test]
    fn defaults_when_body_is_empty() {
        let record = build_record("");
        assert_eq!(record.tool, "Unknown Tool");
        assert_eq!(record.status, Status::Info);
        assert_eq!(record.title, None);
        assert!(record.fields.is_empty());
    }

    #[test]
    fn routed_keys_never_reach_fields() {
        let body = "tool: Weather\nstatus: error\ntitle: Forecast failed\nreason: upstream timeout\n";
        let record = build_record(body);

        assert_eq!(record.tool, "Weather");
        assert_eq!(record.status, Status::Error);
        assert_eq!(record.title.as_deref(), Some("Forecast failed"));
        assert!(!record.fields.contains_key("tool"));
        assert!(!record.fields.contains_key("status"));
        assert!(!record.fields.contains_key("title"));
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn routing_is_case_insensitive() {
        let record = build_record("Tool: Ledger\nStatus: SUCCESS\n");
        assert_eq!(record.tool, "Ledger");
        assert_eq!(record.status, Status::Success);
        assert!(record.fields.is_empty());
    }

    #[test]
    fn field_keys_keep_their_case() {
        let record = build_record("Room Type: deluxe\n");
        let keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Room Type"]);
    }

    #[test]
    fn soft_wrap_joins_with_single_space() {
        let body = "note: the booking is held\n  until Friday\nstatus: success\n";
        let record = build_record(body);

        assert_eq!(
            record.fields.get("note"),
            Some(&Value::Text("the booking is held until Friday".into()))
        );
        assert_eq!(record.status, Status::Success);
    }

    #[test]
    fn bracket_value_spanning_lines() {
        let body = "rooms: [101,\n102]\nstatus: success\n";
        let record = build_record(body);

        assert_eq!(
            record.fields.get("rooms"),
            Some(&Value::List(vec![
                Value::Number(101.0),
                Value::Number(102.0)
            ]))
        );
        assert_eq!(record.status, Status::Success);
    }

    #[test]
    fn nested_bullets_stay_inside_multi_value() {
        let body = "hospitals:\n- ROYAL PRINCE ALFRED HOSPITAL: Template A\n- surgeon: Dr Smith\n- ST VINCENT HOSPITAL\n- surgeon: Dr Lee\nstatus: success\n";
        let record = build_record(body);

        assert_eq!(record.status, Status::Success);
        let Some(Value::Entities(entities)) = record.fields.get("hospitals") else {
            panic!("expected entities for hospitals");
        };
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].title, "ROYAL PRINCE ALFRED HOSPITAL");
        assert_eq!(entities[0].template.as_deref(), Some("Template A"));
        assert_eq!(
            entities[0].attributes.get("surgeon").map(String::as_str),
            Some("Dr Smith")
        );
        assert_eq!(entities[1].title, "ST VINCENT HOSPITAL");
        assert_eq!(entities[1].template, None);
        assert_eq!(
            entities[1].attributes.get("surgeon").map(String::as_str),
            Some("Dr Lee")
        );
    }

    #[test]
    fn url_continuation_does_not_flush() {
        let body = "link: see\nhttps://booking.example.com/r/42\nstatus: success\n";
        let record = build_record(body);

        assert_eq!(
            record.fields.get("link"),
            Some(&Value::Text(
                "see https://booking.example.com/r/42".into()
            ))
        );
        assert_eq!(record.status, Status::Success);
    }

    #[test]
    fn duplicate_keys_keep_first_position_latest_value() {
        let body = "a: 1\nb: 2\na: 3\n";
        let record = build_record(body);

        let keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.fields.get("a"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn prose_before_first_key_is_skipped() {
        let body = "Here is what I found.\n\ntool: Search\nhits: 3\n";
        let record = build_record(body);

        assert_eq!(record.tool, "Search");
        assert_eq!(record.fields.get("hits"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn empty_routed_values_keep_defaults() {
        let body = "tool:\nstatus:\nnote: hi\n";
        let record = build_record(body);

        assert_eq!(record.tool, "Unknown Tool");
        assert_eq!(record.status, Status::Info);
        assert_eq!(record.fields.get("note"), Some(&Value::Text("hi".into())));
    }

    #[test]
    fn unknown_status_becomes_info() {
        let record = build_record("status: pending\n");
        assert_eq!(record.status, Status::Info);
    }

    #[test]
    fn wrapped_json_object_reassembles() {
        let body = "payload: {\n\"status\": \"error\"\n}\n";
        let record = build_record(body);

        assert_eq!(record.status, Status::Info);
        let Some(Value::Object(payload)) = record.fields.get("payload") else {
            panic!("expected object for payload");
        };
        assert_eq!(payload.get("status"), Some(&Value::Text("error".into())));
    }

    #[test]
    fn multiline_plain_text_value() {
        let body = "summary:\nFirst line of prose.\nSecond line.\n";
        let record = build_record(body);

        assert_eq!(
            record.fields.get("summary"),
            Some(&Value::Text("First line of prose.\nSecond line.".into()))
        );
    }

    #[test]
    fn blank_lines_do_not_break_single_values() {
        let body = "note: part one\n\npart two\n";
        let record = build_record(body);

        assert_eq!(
            record.fields.get("note"),
            Some(&Value::Text("part one part two".into()))
        );
    }
}
