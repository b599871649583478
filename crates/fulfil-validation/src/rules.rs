//! Validation rules
//!
//! Each check appends one message per violated constraint; none of them
//! short-circuits, so a field can collect several errors.

use fulfil_schema::{FieldType, SchemaRule};
use regex::Regex;
use serde_json::Value;

/// Whether a present value counts as empty
///
/// `null`, `""`, `[]` and `{}` are empty. `false` and `0` are not.
#[must_use]
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Whether a value has the declared JSON type
#[must_use]
pub fn matches_type(value: &Value, field_type: FieldType) -> bool {
    match field_type {
        FieldType::String => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Array => value.is_array(),
        FieldType::Object => value.is_object(),
    }
}

/// `minLength`, `maxLength`, `pattern`, `enum`
///
/// `pattern` is the compiled form of `rule.pattern`; `None` skips the check.
/// Lengths count `char`s, so a character outside the Basic Multilingual Plane
/// counts once rather than as a UTF-16 surrogate pair.
pub fn check_string(
    path: &str,
    value: &str,
    rule: &SchemaRule,
    pattern: Option<&Regex>,
    errors: &mut Vec<String>,
) {
    let len = value.chars().count();

    if let Some(min) = rule.min_length {
        if len < min {
            errors.push(format!("{path} must be at least {min} characters"));
        }
    }
    if let Some(max) = rule.max_length {
        if len > max {
            errors.push(format!("{path} must be at most {max} characters"));
        }
    }
    if let Some(regex) = pattern {
        if !regex.is_match(value) {
            errors.push(format!("{path} does not match the required format"));
        }
    }
    if let Some(allowed) = &rule.one_of {
        if !allowed.iter().any(|a| a == value) {
            errors.push(format!("{path} must be one of: {}", allowed.join(", ")));
        }
    }
}

/// `min`, `max`
pub fn check_number(path: &str, value: f64, rule: &SchemaRule, errors: &mut Vec<String>) {
    if let Some(min) = rule.min {
        if value < min {
            errors.push(format!(
                "{path} must be greater than or equal to {}",
                format_number(min)
            ));
        }
    }
    if let Some(max) = rule.max {
        if value > max {
            errors.push(format!(
                "{path} must be less than or equal to {}",
                format_number(max)
            ));
        }
    }
}

/// `allowedValues`
pub fn check_boolean(path: &str, value: bool, rule: &SchemaRule, errors: &mut Vec<String>) {
    if let Some(allowed) = &rule.allowed_values {
        if !allowed.contains(&value) {
            let allowed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            errors.push(format!("{path} must be one of: {}", allowed.join(", ")));
        }
    }
}

/// `minItems`, `maxItems`
pub fn check_items(path: &str, len: usize, rule: &SchemaRule, errors: &mut Vec<String>) {
    if let Some(min) = rule.min_items {
        if len < min {
            errors.push(format!("{path} must have at least {min} items"));
        }
    }
    if let Some(max) = rule.max_items {
        if len > max {
            errors.push(format!("{path} must have at most {max} items"));
        }
    }
}

/// Render a bound without a trailing `.0` for whole numbers
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = n as i64;
        whole.to_string()
    } else {
        n.to_string()
    }
}
