//! Fixture format of the in-memory host

use crate::Result;
use crate::search::SearchRow;
use fulfil_model::{Record, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One row of the domain configuration table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainValue {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    pub value: String,
}

impl DomainValue {
    pub fn new(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            qualifier: None,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn qualified(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }
}

/// Seed data for a [`crate::MemoryHost`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFixture {
    /// First id handed out to saved records and uploaded files
    pub first_id: Option<RecordId>,
    /// When set, saved records get `tranid = <prefix><id>` regardless of the draft
    pub auto_number_tranid: Option<String>,
    /// File cabinet folders that accept uploads
    pub folders: Vec<String>,
    pub domain_values: Vec<DomainValue>,
    pub records: Vec<Record>,
    /// Search rows per record type
    pub search: BTreeMap<String, Vec<SearchRow>>,
}

impl HostFixture {
    /// Parse a fixture from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON does not describe a fixture.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a fixture file
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
