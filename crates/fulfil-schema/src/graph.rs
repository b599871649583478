//! Schema reference graph
//!
//! Schemas point at each other through `itemSchema`. Recursive schemas are
//! legal (the validator guards against unbounded descent), but callers may
//! want to know which schemas can reach themselves.

use crate::registry::SchemaRegistry;
use std::collections::HashSet;

/// Directed graph of `itemSchema` references between schemas
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    edges: Vec<(String, String)>, // (referrer, referenced)
}

impl ReferenceGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of every reference in a registry
    #[must_use]
    pub fn from_registry(registry: &SchemaRegistry) -> Self {
        let mut graph = Self::new();
        for schema in registry.schemas() {
            for (_, target) in schema.references() {
                graph.add_edge(&schema.name, target);
            }
        }
        graph
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.push((from.into(), to.into()));
    }

    /// Whether `to` is reachable from `from`
    #[must_use]
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let mut to_visit: Vec<&str> = self
            .edges
            .iter()
            .filter(|(f, _)| f == from)
            .map(|(_, t)| t.as_str())
            .collect();
        let mut visited = HashSet::new();

        while let Some(current) = to_visit.pop() {
            if current == to {
                return true;
            }
            if visited.insert(current) {
                for (f, t) in &self.edges {
                    if f == current {
                        to_visit.push(t);
                    }
                }
            }
        }

        false
    }

    /// Whether a schema can reach itself
    #[must_use]
    pub fn is_recursive(&self, name: &str) -> bool {
        self.reaches(name, name)
    }

    /// All schemas that can reach themselves, sorted
    #[must_use]
    pub fn recursive_schemas(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .edges
            .iter()
            .map(|(f, _)| f.as_str())
            .filter(|name| self.is_recursive(name))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
