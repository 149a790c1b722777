//! Core domain types for extracted tool results.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Tool name used when a segment never declares one.
pub const UNKNOWN_TOOL: &str = "Unknown Tool";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Outcome reported by a tool-result segment.
///
/// Input is uncontrolled generative text, so unknown or absent status
/// strings map to [`Status::Info`] rather than failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    #[default]
    Info,
}

impl Status {
    /// Best-effort parse of an informal status string.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("success") {
            Self::Success
        } else if trimmed.eq_ignore_ascii_case("error") {
            Self::Error
        } else {
            Self::Info
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A typed field value.
///
/// Consumers match exhaustively instead of duck-typing on field presence.
/// Serializes untagged: `Null` as JSON null, `List` as an array, and so on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(#[serde(serialize_with = "serialize_number")] f64),
    Text(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
    /// Nested entities regrouped from a flat bulleted list.
    Entities(Vec<Entity>),
}

/// Write integral numbers without a trailing `.0`.
fn serialize_number<S>(n: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
        serializer.serialize_i64(*n as i64)
    } else {
        serializer.serialize_f64(*n)
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A nested record reconstructed from one run of bullet lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entity {
    /// Display title (institution name or similar).
    pub title: String,
    /// Template label taken from the title line's value part, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Attribute keys are lower-cased; values stay verbatim strings.
    pub attributes: IndexMap<String, String>,
}

// ---------------------------------------------------------------------------
// ToolResultRecord
// ---------------------------------------------------------------------------

/// One structured record extracted from one tool-result segment.
///
/// Immutable once built; `fields` keeps first-appearance order from the
/// source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResultRecord {
    /// Name of the tool that produced the result.
    pub tool: String,
    /// Reported outcome.
    pub status: Status,
    /// Optional display title for the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Remaining key/value pairs in source order.
    pub fields: IndexMap<String, Value>,
}

impl Default for ToolResultRecord {
    fn default() -> Self {
        Self {
            tool: UNKNOWN_TOOL.to_string(),
            status: Status::Info,
            title: None,
            fields: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(Status::parse("Success"), Status::Success);
        assert_eq!(Status::parse(" ERROR "), Status::Error);
        assert_eq!(Status::parse("info"), Status::Info);
    }

    #[test]
    fn status_parse_defaults_unknown_to_info() {
        assert_eq!(Status::parse("partial"), Status::Info);
        assert_eq!(Status::parse(""), Status::Info);
    }

    #[test]
    fn status_display_matches_wire_form() {
        assert_eq!(Status::Success.to_string(), "success");
        assert_eq!(Status::default().to_string(), "info");
    }

    #[test]
    fn record_defaults() {
        let record = ToolResultRecord::default();
        assert_eq!(record.tool, UNKNOWN_TOOL);
        assert_eq!(record.status, Status::Info);
        assert!(record.title.is_none());
        assert!(record.fields.is_empty());
    }

    #[test]
    fn record_serializes_fields_in_insertion_order() {
        let mut record = ToolResultRecord {
            tool: "BookingSearch".into(),
            status: Status::Success,
            ..Default::default()
        };
        record.fields.insert("zebra".into(), Value::Number(1.0));
        record.fields.insert("apple".into(), Value::Text("x".into()));

        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(
            json,
            r#"{"tool":"BookingSearch","status":"success","fields":{"zebra":1,"apple":"x"}}"#
        );
    }

    #[test]
    fn value_serialization_shapes() {
        assert_eq!(serde_json::to_string(&Value::Null).expect("serialize"), "null");
        assert_eq!(
            serde_json::to_string(&Value::Bool(true)).expect("serialize"),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&Value::Number(101.0)).expect("serialize"),
            "101"
        );
        assert_eq!(
            serde_json::to_string(&Value::Number(2.5)).expect("serialize"),
            "2.5"
        );

        let list = Value::List(vec![Value::Number(101.0), Value::Number(102.0)]);
        assert_eq!(serde_json::to_string(&list).expect("serialize"), "[101,102]");
    }

    #[test]
    fn entity_omits_absent_template() {
        let entity = Entity {
            title: "ST VINCENT HOSPITAL".into(),
            template: None,
            attributes: IndexMap::from([("surgeon".to_string(), "Dr Lee".to_string())]),
        };
        let json = serde_json::to_string(&entity).expect("serialize");
        assert_eq!(
            json,
            r#"{"title":"ST VINCENT HOSPITAL","attributes":{"surgeon":"Dr Lee"}}"#
        );
    }
}
