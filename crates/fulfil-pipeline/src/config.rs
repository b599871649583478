//! Service configuration
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the built-in behavior.

use crate::{Error, Result};
use fulfil_model::fields::record_type;
use fulfil_reconcile::OrderPolicy;
use fulfil_schema::ROOT_SCHEMA;
use fulfil_validation::{DEFAULT_MAX_DEPTH, ValidationConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Domain configuration code of the attachment folder
pub const FOLDER_CODE: &str = "ruta_folder_fulfillment";
/// Domain configuration code of the source record type, qualified by order type
pub const RECORD_TYPE_CODE: &str = "record_type_fulfillment";
/// Attachment `content` longer than this is elided from logs
pub const DEFAULT_LOG_CONTENT_LIMIT: usize = 100;

/// Configuration of a [`crate::FulfillmentService`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Schema the request is validated against
    pub root_schema: String,
    /// Schema file replacing the built-in registry
    pub schema_file: Option<PathBuf>,
    /// Deepest schema nesting followed by the validator
    pub max_depth: usize,
    /// Order statuses a fulfillment may be created from
    pub order_policy: OrderPolicy,
    pub folder_code: String,
    pub record_type_code: String,
    /// Record type the source order is transformed into
    pub target_record_type: String,
    pub log_content_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            root_schema: ROOT_SCHEMA.to_string(),
            schema_file: None,
            max_depth: DEFAULT_MAX_DEPTH,
            order_policy: OrderPolicy::default(),
            folder_code: FOLDER_CODE.to_string(),
            record_type_code: RECORD_TYPE_CODE.to_string(),
            target_record_type: record_type::ITEM_FULFILLMENT.to_string(),
            log_content_limit: DEFAULT_LOG_CONTENT_LIMIT,
        }
    }
}

impl ServiceConfig {
    /// Load from a YAML (`.yaml`/`.yml`) or JSON file
    ///
    /// A relative `schema_file` is resolved against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_yaml(&content)?,
        };

        if let Some(schema_file) = &config.schema_file {
            if schema_file.is_relative() {
                if let Some(dir) = path.parent() {
                    config.schema_file = Some(dir.join(schema_file));
                }
            }
        }
        Ok(config)
    }

    /// Parse YAML text
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a valid configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("invalid YAML config: {e}")))
    }

    /// Parse JSON text
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("invalid JSON config: {e}")))
    }

    /// Validator settings derived from this configuration
    #[must_use]
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            max_depth: self.max_depth,
        }
    }
}
