//! Schema file loader
//!
//! A schema file holds a `schemas` map of schema name to an ordered list of
//! field rules:
//!
//! ```yaml
//! schemas:
//!   item:
//!     - field: itemId
//!       required: true
//!       type: string
//!     - field: quantity
//!       type: number
//!       min: 1
//! ```

use crate::model::{FieldRule, Schema};
use crate::registry::SchemaRegistry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Serializable registry format
#[derive(Debug, Default, Serialize, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    schemas: BTreeMap<String, Vec<FieldRule>>,
}

impl From<&SchemaRegistry> for SchemaFile {
    fn from(registry: &SchemaRegistry) -> Self {
        let schemas = registry
            .schemas()
            .map(|s| (s.name.clone(), s.fields.clone()))
            .collect();
        Self { schemas }
    }
}

/// Loads schema registries from YAML or JSON files
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    schema_paths: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a loader with the given search paths
    #[must_use]
    pub fn new(schema_paths: Vec<PathBuf>) -> Self {
        Self { schema_paths }
    }

    /// Load `<name>.yaml`, `<name>.yml` or `<name>.json` from the search paths
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no search path holds the file.
    pub fn load(&self, name: &str) -> Result<SchemaRegistry> {
        for dir in &self.schema_paths {
            for ext in ["yaml", "yml", "json"] {
                let file_path = dir.join(format!("{name}.{ext}"));
                if file_path.exists() {
                    trace!(path = %file_path.display(), "Found schema file");
                    return self.load_from_file(&file_path);
                }
            }
        }

        Err(Error::NotFound(format!(
            "Schema file '{name}' not found in search paths: {:?}",
            self.schema_paths
        )))
    }

    /// Load a registry from a file, choosing the format by extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// reference cannot be resolved.
    pub fn load_from_file(&self, path: &Path) -> Result<SchemaRegistry> {
        debug!(path = %path.display(), "Loading schema file");
        let content = std::fs::read_to_string(path)?;

        let registry = if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            self.load_from_yaml(&content)?
        } else {
            self.load_from_json(&content)?
        };

        info!(path = %path.display(), schemas = registry.len(), "Loaded schema registry");
        Ok(registry)
    }

    /// Load a registry from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or an unresolved reference.
    pub fn load_from_json(&self, json: &str) -> Result<SchemaRegistry> {
        let file: SchemaFile = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))?;
        Self::convert_schema_file(file)
    }

    /// Load a registry from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or an unresolved reference.
    pub fn load_from_yaml(&self, yaml: &str) -> Result<SchemaRegistry> {
        let file: SchemaFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))?;
        Self::convert_schema_file(file)
    }

    fn convert_schema_file(file: SchemaFile) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        for (name, fields) in file.schemas {
            let schema = fields
                .into_iter()
                .fold(Schema::new(name), |schema, f| schema.field(f.name, f.rule));
            registry.register(schema);
        }

        if let Some((schema, field, target)) = registry.unresolved_references().first() {
            return Err(Error::UnknownReference {
                schema: (*schema).to_string(),
                field: (*field).to_string(),
                target: (*target).to_string(),
            });
        }

        Ok(registry)
    }

    /// Serialize a registry as YAML in the loader's file format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(registry: &SchemaRegistry) -> Result<String> {
        serde_yaml::to_string(&SchemaFile::from(registry))
            .map_err(|e| Error::InvalidFormat(format!("YAML serialize error: {e}")))
    }

    /// Serialize a registry as pretty JSON in the loader's file format
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(registry: &SchemaRegistry) -> Result<String> {
        serde_json::to_string_pretty(&SchemaFile::from(registry))
            .map_err(|e| Error::InvalidFormat(format!("JSON serialize error: {e}")))
    }
}
