//! Raw value coercion.
//!
//! Converts the raw string accumulated for one key into a typed [`Value`].
//! Rules apply in strict priority; each later rule runs only when every
//! earlier rule failed outright, and the final fallback is plain text, so
//! coercion never errors.

use indexmap::IndexMap;
use toolcard_shared::Value;

use crate::entities::group_entities;

/// Coerce a raw value string into a typed [`Value`].
///
/// Priority: full JSON literal, then bulleted entities, then bulleted
/// list, then boolean, then number, then trimmed text. Boolean and number
/// coercion require the entire trimmed string to match, so `12abc` stays
/// text.
pub(crate) fn coerce(raw: &str) -> Value {
    let trimmed = raw.trim();

    // JSON-parseable values are taken verbatim and never reinterpreted.
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return from_json(json);
    }

    if let Some(value) = coerce_bulleted(raw) {
        return value;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    if let Ok(n) = trimmed.parse::<f64>() {
        // f64 parsing accepts "inf" and "nan" spellings; those stay text.
        if n.is_finite() {
            return Value::Number(n);
        }
    }

    Value::Text(trimmed.to_string())
}

/// Convert a parsed JSON document into a [`Value`] tree.
fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Value::Text(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(members) => Value::Object(
            members
                .into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

/// Handle multi-line values carrying a bulleted list.
///
/// A bullet only counts when it sits on a line after an embedded newline.
/// Bullets containing a separator are first offered to the entity
/// grouper; when that yields nothing the bullets become a plain list of
/// text items.
fn coerce_bulleted(raw: &str) -> Option<Value> {
    let has_bullet = raw
        .split('\n')
        .skip(1)
        .any(|line| bullet_content(line.trim()).is_some());
    if !has_bullet {
        return None;
    }

    let any_separator = raw
        .lines()
        .filter_map(|line| bullet_content(line.trim()))
        .any(|content| content.contains(':'));

    if any_separator {
        let entities = group_entities(raw);
        if !entities.is_empty() {
            return Some(Value::Entities(entities));
        }
    }

    let items: Vec<Value> = raw
        .lines()
        .filter_map(|line| bullet_content(line.trim()))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(|content| Value::Text(content.to_string()))
        .collect();

    if items.is_empty() {
        return None;
    }
    Some(Value::List(items))
}

/// Content of a bullet line (`- ` / `* ` prefix, or a bare marker), or
/// `None` when the line is not bullet-marked.
pub(crate) fn bullet_content(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("- ") {
        return Some(rest);
    }
    if let Some(rest) = line.strip_prefix("* ") {
        return Some(rest);
    }
    if line == "-" || line == "*" {
        return Some("");
    }
    None
}
