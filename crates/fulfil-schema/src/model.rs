//! Schema model definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON type a field must have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation contract of a single field
///
/// Constraints that do not apply to the declared type are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRule {
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    // string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the whole value is tested against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,

    // number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    // boolean
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<bool>>,

    // array / object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// Name of the schema elements (arrays) or the value (objects) must satisfy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_schema: Option<String>,
}

impl SchemaRule {
    /// Rule with a declared type
    #[must_use]
    pub fn of(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    #[must_use]
    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    #[must_use]
    pub fn array() -> Self {
        Self::of(FieldType::Array)
    }

    #[must_use]
    pub fn object() -> Self {
        Self::of(FieldType::Object)
    }

    /// Set required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Restrict a string to a fixed set of values
    #[must_use]
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn allowed_values(mut self, values: Vec<bool>) -> Self {
        self.allowed_values = Some(values);
        self
    }

    #[must_use]
    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    #[must_use]
    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    #[must_use]
    pub fn item_schema(mut self, schema: impl Into<String>) -> Self {
        self.item_schema = Some(schema.into());
        self
    }
}

/// A named field with its rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(rename = "field")]
    pub name: String,
    #[serde(flatten)]
    pub rule: SchemaRule,
}

/// A named schema: field rules in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<FieldRule>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field rule; a repeated name replaces the earlier rule in place
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rule: SchemaRule) -> Self {
        let name = name.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            existing.rule = rule;
        } else {
            self.fields.push(FieldRule { name, rule });
        }
        self
    }

    /// Rule for a field
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&SchemaRule> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.rule)
    }

    /// Schemas referenced through `itemSchema`, with the referencing field
    pub fn references(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|f| f.rule.item_schema.as_deref().map(|s| (f.name.as_str(), s)))
    }
}
