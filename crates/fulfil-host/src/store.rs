//! Record, file, and domain configuration contracts

use crate::Result;
use crate::search::Search;
use fulfil_model::{FulfillmentDraft, Record, RecordId};
use serde::{Deserialize, Serialize};

/// Loads, transforms, and persists host records
pub trait RecordStore {
    /// Load a record by type and id
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] when no such record exists.
    fn load(&self, record_type: &str, id: RecordId) -> Result<Record>;

    /// Create an unsaved record of `to_type` from an existing record
    ///
    /// # Errors
    ///
    /// Returns an error when the source is missing or cannot be transformed.
    fn transform(&self, from_type: &str, from_id: RecordId, to_type: &str) -> Result<FulfillmentDraft>;

    /// Persist a draft and return the new record id
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Persistence`] when the host rejects the draft.
    fn save(&self, draft: &FulfillmentDraft) -> Result<RecordId>;

    /// Persist changes to an existing record
    ///
    /// # Errors
    ///
    /// Returns an error when the record does not exist or cannot be saved.
    fn save_record(&self, record: &Record) -> Result<RecordId>;
}

/// A file to place in the host file cabinet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpload {
    pub file_name: String,
    pub file_type: String,
    pub folder_id: String,
    /// Base64 body
    pub content: String,
}

/// Host file cabinet
pub trait FileStore {
    /// Store a file and return its id
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::File`] when the folder or the content is missing.
    fn upload(&self, file: &FileUpload) -> Result<String>;
}

/// Integration configuration table
pub trait DomainConfig {
    /// Value registered for `code`, narrowed by `qualifier` when given
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] unless exactly one entry matches.
    fn value(&self, code: &str, qualifier: Option<&str>) -> Result<String>;
}

/// Everything registration needs from the host
pub trait Host: RecordStore + Search + FileStore + DomainConfig {}

impl<T: RecordStore + Search + FileStore + DomainConfig> Host for T {}
