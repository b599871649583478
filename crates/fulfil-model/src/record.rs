//! Generic host records
#![allow(clippy::must_use_candidate)] // Accessors are read at call sites without #[must_use].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Internal identifier of a host record.
pub type RecordId = u64;

/// Field map of a record header or a sublist row.
pub type FieldMap = BTreeMap<String, Value>;

/// Type-qualified pointer to a host record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub record_type: String,
    pub id: RecordId,
}

impl RecordRef {
    pub fn new(record_type: impl Into<String>, id: RecordId) -> Self {
        Self {
            record_type: record_type.into(),
            id,
        }
    }
}

/// A record as the host returns it: header fields plus item rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Host record type (e.g., `salesorder`, `itemfulfillment`)
    pub record_type: String,

    /// Internal id
    pub id: RecordId,

    /// Header field values keyed by host field id
    #[serde(default)]
    pub fields: FieldMap,

    /// Item sublist rows in line order
    #[serde(default)]
    pub lines: Vec<FieldMap>,
}

impl Record {
    /// Create an empty record
    pub fn new(record_type: impl Into<String>, id: RecordId) -> Self {
        Self {
            record_type: record_type.into(),
            id,
            fields: FieldMap::new(),
            lines: Vec::new(),
        }
    }

    /// Reference to this record
    pub fn reference(&self) -> RecordRef {
        RecordRef::new(self.record_type.clone(), self.id)
    }

    /// Raw header value
    pub fn field(&self, field_id: &str) -> Option<&Value> {
        self.fields.get(field_id)
    }

    /// Header value rendered as text, `None` when absent or empty
    pub fn str_field(&self, field_id: &str) -> Option<String> {
        self.field(field_id).and_then(text)
    }

    /// Header value read as a checkbox
    pub fn bool_field(&self, field_id: &str) -> bool {
        self.field(field_id).is_some_and(flag)
    }

    /// Set a header value
    pub fn set_field(&mut self, field_id: impl Into<String>, value: Value) -> &mut Self {
        self.fields.insert(field_id.into(), value);
        self
    }

    /// Number of item rows
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Raw row value
    pub fn line_value(&self, line: usize, field_id: &str) -> Option<&Value> {
        self.lines.get(line).and_then(|row| row.get(field_id))
    }

    /// Row value rendered as text
    pub fn line_str(&self, line: usize, field_id: &str) -> Option<String> {
        self.line_value(line, field_id).and_then(text)
    }

    /// Row value read as a number, zero when absent
    pub fn line_f64(&self, line: usize, field_id: &str) -> f64 {
        self.line_value(line, field_id).and_then(number).unwrap_or(0.0)
    }

    /// Row value read as a checkbox
    pub fn line_bool(&self, line: usize, field_id: &str) -> bool {
        self.line_value(line, field_id).is_some_and(flag)
    }
}

/// Render a scalar host value as text.
///
/// Host ids arrive as either strings or numbers; both compare as text.
/// Null, empty strings, and structured values yield `None`.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a numeric host value, accepting numeric strings.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a checkbox value; the host writes `T`/`F` as well as booleans.
pub fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.as_str(), "T" | "true"),
        _ => false,
    }
}

/// Whether a value counts as "not provided" when writing header fields.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_order() -> Record {
        serde_json::from_value(json!({
            "record_type": "salesorder",
            "id": 42,
            "fields": { "isclosed": "F", "orderstatus": "B", "entity": 77 },
            "lines": [
                { "item": "100", "quantity": 5, "quantityfulfilled": 2, "isclosed": false },
                { "item": 200, "quantity": "3", "isclosed": "T" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_header_accessors() {
        let order = sample_order();

        assert_eq!(order.str_field("orderstatus"), Some("B".to_string()));
        assert_eq!(order.str_field("entity"), Some("77".to_string()));
        assert!(!order.bool_field("isclosed"));
        assert!(order.str_field("missing").is_none());
        assert_eq!(order.reference(), RecordRef::new("salesorder", 42));
    }

    #[test]
    fn test_line_accessors() {
        let order = sample_order();

        assert_eq!(order.line_count(), 2);
        assert_eq!(order.line_str(1, "item"), Some("200".to_string()));
        assert!((order.line_f64(0, "quantityfulfilled") - 2.0).abs() < f64::EPSILON);
        assert!((order.line_f64(1, "quantity") - 3.0).abs() < f64::EPSILON);
        assert!(order.line_f64(1, "quantityfulfilled").abs() < f64::EPSILON);
        assert!(order.line_bool(1, "isclosed"));
        assert!(!order.line_bool(0, "isclosed"));
        assert!(order.line_value(5, "item").is_none());
    }

    #[test]
    fn test_blank_values() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!("")));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(false)));
        assert!(text(&json!("")).is_none());
        assert!(text(&json!([1])).is_none());
    }

    #[test]
    fn test_set_field() {
        let mut record = Record::new("itemfulfillment", 9);
        record.set_field("tranid", json!("GR-001"));
        assert_eq!(record.str_field("tranid"), Some("GR-001".to_string()));
    }
}
