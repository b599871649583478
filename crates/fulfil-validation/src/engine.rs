//! Validation engine

use crate::rules;
use fulfil_schema::{FieldType, SchemaRegistry, SchemaRule};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Default recursion ceiling for nested schemas
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Deepest schema nesting followed before reporting an error
    pub max_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,
    /// Messages in the order they were found
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a new valid result
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// State of one top-level `validate` call
struct Walk {
    visited: HashSet<(String, String)>,
    errors: Vec<String>,
}

/// Schema validation engine over a borrowed registry
pub struct ValidationEngine<'a> {
    registry: &'a SchemaRegistry,
    config: ValidationConfig,
}

impl<'a> ValidationEngine<'a> {
    /// Create a new validation engine
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            config: ValidationConfig::default(),
        }
    }

    /// Create with specific configuration
    #[must_use]
    pub fn with_config(registry: &'a SchemaRegistry, config: ValidationConfig) -> Self {
        Self { registry, config }
    }

    /// Validate `data` against the named schema
    ///
    /// The result is deterministic for the same data and registry.
    #[must_use]
    pub fn validate(&self, data: &Value, schema_name: &str) -> ValidationResult {
        let mut walk = Walk {
            visited: HashSet::new(),
            errors: Vec::new(),
        };
        self.validate_schema(data, schema_name, "", 0, &mut walk);

        debug!(
            schema = schema_name,
            errors = walk.errors.len(),
            "Validation finished"
        );
        ValidationResult::from_errors(walk.errors)
    }

    fn validate_schema(
        &self,
        data: &Value,
        schema_name: &str,
        path: &str,
        depth: usize,
        walk: &mut Walk,
    ) {
        if !walk
            .visited
            .insert((schema_name.to_string(), path.to_string()))
        {
            trace!(schema = schema_name, path, "Already visited, skipping");
            return;
        }

        let Some(schema) = self.registry.get(schema_name) else {
            walk.errors
                .push(format!("Validation schema '{schema_name}' not found"));
            return;
        };

        if depth > self.config.max_depth {
            walk.errors.push(format!(
                "{} exceeds maximum nesting depth of {}",
                display_path(path),
                self.config.max_depth
            ));
            return;
        }

        let empty = Map::new();
        let fields = match data {
            Value::Object(map) => map,
            _ => {
                walk.errors
                    .push(format!("{} must be object", display_path(path)));
                &empty
            }
        };

        for field in &schema.fields {
            let full_path = if path.is_empty() {
                field.name.clone()
            } else {
                format!("{path}.{}", field.name)
            };
            self.validate_field(fields.get(&field.name), &field.rule, &full_path, depth, walk);
        }
    }

    fn validate_field(
        &self,
        value: Option<&Value>,
        rule: &SchemaRule,
        path: &str,
        depth: usize,
        walk: &mut Walk,
    ) {
        let Some(value) = value else {
            if rule.required {
                walk.errors.push(format!("{path} is required"));
            }
            return;
        };

        if rules::is_empty(value) {
            // A required value that carries nothing is as good as absent.
            if rule.required {
                walk.errors.push(format!("{path} is required"));
            }
            return;
        }

        let Some(field_type) = rule.field_type else {
            return;
        };
        if !rules::matches_type(value, field_type) {
            walk.errors.push(format!("{path} must be {field_type}"));
            return;
        }

        match (field_type, value) {
            (FieldType::String, Value::String(s)) => {
                let pattern = rule
                    .pattern
                    .as_deref()
                    .and_then(|p| self.registry.pattern(p));
                rules::check_string(path, s, rule, pattern, &mut walk.errors);
            }
            (FieldType::Number, Value::Number(n)) => {
                if let Some(n) = n.as_f64() {
                    rules::check_number(path, n, rule, &mut walk.errors);
                }
            }
            (FieldType::Boolean, Value::Bool(b)) => {
                rules::check_boolean(path, *b, rule, &mut walk.errors);
            }
            (FieldType::Array, Value::Array(items)) => {
                rules::check_items(path, items.len(), rule, &mut walk.errors);
                if let Some(item_schema) = rule.item_schema.as_deref() {
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{path}[{index}]");
                        self.validate_schema(item, item_schema, &item_path, depth + 1, walk);
                    }
                }
            }
            (FieldType::Object, Value::Object(_)) => {
                if let Some(item_schema) = rule.item_schema.as_deref() {
                    self.validate_schema(value, item_schema, path, depth + 1, walk);
                }
            }
            _ => {}
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "payload" } else { path }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfil_schema::Schema;
    use serde_json::json;

    fn order_registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with(
                Schema::new("order")
                    .field("orderId", SchemaRule::string().required())
                    .field("code", SchemaRule::string().min_length(3).pattern("^[A-Z]+$"))
                    .field("active", SchemaRule::boolean())
                    .field(
                        "lines",
                        SchemaRule::array().required().min_items(1).item_schema("line"),
                    )
                    .field("ship", SchemaRule::object().item_schema("address")),
            )
            .with(
                Schema::new("line")
                    .field("itemId", SchemaRule::string().required())
                    .field("quantity", SchemaRule::number().required().min(1.0)),
            )
            .with(Schema::new("address").field("city", SchemaRule::string().required()))
    }

    #[test]
    fn test_valid_document() {
        let registry = order_registry();
        let engine = ValidationEngine::new(&registry);

        let result = engine.validate(
            &json!({
                "orderId": "1",
                "code": "ABC",
                "lines": [{ "itemId": "X", "quantity": 2 }],
                "ship": { "city": "Lima" }
            }),
            "order",
        );

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_schema_not_found() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry).validate(&json!({}), "ghost");

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Validation schema 'ghost' not found"]);
    }

    #[test]
    fn test_missing_required_suppresses_type_checks() {
        let registry = order_registry();
        let result =
            ValidationEngine::new(&registry).validate(&json!({ "orderId": "1" }), "order");

        assert_eq!(result.errors, vec!["lines is required"]);
    }

    #[test]
    fn test_empty_values_skip_checks() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry).validate(
            &json!({
                "orderId": "1",
                "code": "",
                "ship": {},
                "lines": [{ "itemId": "X", "quantity": 1 }]
            }),
            "order",
        );

        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_required_but_empty() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry)
            .validate(&json!({ "orderId": null, "lines": [] }), "order");

        assert_eq!(result.errors, vec!["orderId is required", "lines is required"]);
    }

    #[test]
    fn test_false_and_zero_are_present() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry).validate(
            &json!({
                "orderId": "1",
                "active": false,
                "lines": [{ "itemId": "X", "quantity": 0 }]
            }),
            "order",
        );

        assert_eq!(
            result.errors,
            vec!["lines[0].quantity must be greater than or equal to 1"]
        );
    }

    #[test]
    fn test_type_mismatch() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry).validate(
            &json!({ "orderId": 7, "code": 12, "lines": "X" }),
            "order",
        );

        assert_eq!(
            result.errors,
            vec![
                "orderId must be string",
                "code must be string",
                "lines must be array",
            ]
        );
    }

    #[test]
    fn test_string_errors_accumulate() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry).validate(
            &json!({ "orderId": "1", "code": "a", "lines": [{ "itemId": "X", "quantity": 1 }] }),
            "order",
        );

        assert_eq!(
            result.errors,
            vec![
                "code must be at least 3 characters",
                "code does not match the required format",
            ]
        );
    }

    #[test]
    fn test_array_element_paths() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry).validate(
            &json!({
                "orderId": "1",
                "lines": [
                    { "itemId": "X", "quantity": 1 },
                    { "quantity": 1 },
                    { "itemId": "Z", "quantity": -1 }
                ]
            }),
            "order",
        );

        assert_eq!(
            result.errors,
            vec![
                "lines[1].itemId is required",
                "lines[2].quantity must be greater than or equal to 1",
            ]
        );
    }

    #[test]
    fn test_non_object_element() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry)
            .validate(&json!({ "orderId": "1", "lines": ["X"] }), "order");

        assert_eq!(
            result.errors,
            vec![
                "lines[0] must be object",
                "lines[0].itemId is required",
                "lines[0].quantity is required",
            ]
        );
    }

    #[test]
    fn test_nested_object_same_path() {
        let registry = order_registry();
        let result = ValidationEngine::new(&registry).validate(
            &json!({
                "orderId": "1",
                "lines": [{ "itemId": "X", "quantity": 1 }],
                "ship": { "city": 5 }
            }),
            "order",
        );

        assert_eq!(result.errors, vec!["ship.city must be string"]);
    }

    #[test]
    fn test_missing_nested_schema() {
        let registry = SchemaRegistry::new()
            .with(Schema::new("root").field("child", SchemaRule::object().item_schema("nowhere")));
        let result =
            ValidationEngine::new(&registry).validate(&json!({ "child": { "a": 1 } }), "root");

        assert_eq!(result.errors, vec!["Validation schema 'nowhere' not found"]);
    }

    fn tree_registry() -> SchemaRegistry {
        SchemaRegistry::new().with(
            Schema::new("node")
                .field("name", SchemaRule::string().required())
                .field("child", SchemaRule::object().item_schema("node"))
                .field("children", SchemaRule::array().item_schema("node")),
        )
    }

    #[test]
    fn test_self_referential_schema_terminates() {
        let registry = tree_registry();
        let data = json!({
            "name": "root",
            "child": { "name": "a", "child": { "child": { "name": "c" } } },
            "children": [{ "name": "x" }, { "children": [{}] }]
        });

        let result = ValidationEngine::new(&registry).validate(&data, "node");

        assert_eq!(
            result.errors,
            vec![
                "child.child.name is required",
                "children[1].name is required",
                "children[1].children[0].name is required",
            ]
        );
    }

    #[test]
    fn test_depth_ceiling() {
        let registry = tree_registry();
        let mut data = json!({ "name": "leaf" });
        for _ in 0..5 {
            data = json!({ "name": "n", "child": data });
        }

        let engine =
            ValidationEngine::with_config(&registry, ValidationConfig { max_depth: 3 });
        let result = engine.validate(&data, "node");

        assert_eq!(
            result.errors,
            vec!["child.child.child.child exceeds maximum nesting depth of 3"]
        );

        let result = ValidationEngine::new(&registry).validate(&data, "node");
        assert!(result.is_valid);
    }

    #[test]
    fn test_deterministic() {
        let registry = order_registry();
        let engine = ValidationEngine::new(&registry);
        let data = json!({ "code": 1, "lines": [{}, {}], "ship": { "city": [] } });

        assert_eq!(engine.validate(&data, "order"), engine.validate(&data, "order"));
    }
}
