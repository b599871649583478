//! Schema registry with compiled pattern cache

use crate::graph::ReferenceGraph;
use crate::model::Schema;
use regex::Regex;
use std::collections::HashMap;
use tracing::{trace, warn};

/// Registry of named schemas
///
/// Patterns are compiled once when a schema is registered. A pattern that
/// does not compile is dropped with a warning and the field is then checked
/// without it.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
    patterns: HashMap<String, Regex>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its own name, replacing any previous one
    pub fn register(&mut self, schema: Schema) {
        trace!(schema = %schema.name, fields = schema.fields.len(), "Registering schema");

        for field in &schema.fields {
            let Some(source) = field.rule.pattern.as_deref() else {
                continue;
            };
            if self.patterns.contains_key(source) {
                continue;
            }
            match Regex::new(source) {
                Ok(regex) => {
                    self.patterns.insert(source.to_string(), regex);
                }
                Err(e) => warn!(
                    schema = %schema.name,
                    field = %field.name,
                    pattern = source,
                    error = %e,
                    "Skipping uncompilable pattern"
                ),
            }
        }

        self.schemas.insert(schema.name.clone(), schema);
    }

    /// Builder-style registration
    #[must_use]
    pub fn with(mut self, schema: Schema) -> Self {
        self.register(schema);
        self
    }

    /// Get a schema by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Check if a schema exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Compiled form of a pattern, if it compiled
    #[must_use]
    pub fn pattern(&self, source: &str) -> Option<&Regex> {
        self.patterns.get(source)
    }

    /// Registered schema names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all schemas
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// `itemSchema` references that name no registered schema
    ///
    /// Returned as `(schema, field, target)` sorted by schema then field.
    #[must_use]
    pub fn unresolved_references(&self) -> Vec<(&str, &str, &str)> {
        let mut missing: Vec<(&str, &str, &str)> = self
            .schemas
            .values()
            .flat_map(|schema| {
                schema
                    .references()
                    .filter(move |(_, target)| !self.contains(target))
                    .map(move |(field, target)| (schema.name.as_str(), field, target))
            })
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Schemas that can reach themselves through `itemSchema`
    #[must_use]
    pub fn find_cycles(&self) -> Vec<String> {
        ReferenceGraph::from_registry(self)
            .recursive_schemas()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
