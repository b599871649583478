//! # fulfil-host
//!
//! Contracts of the host ERP collaborators used during registration:
//! record persistence, saved searches, the file cabinet, and the
//! integration's domain configuration table.
//!
//! With the `memory` feature (on by default) the crate also provides
//! [`MemoryHost`], a fixture-backed implementation of every contract.

pub mod search;
pub mod store;

#[cfg(feature = "memory")]
pub mod fixture;
#[cfg(feature = "memory")]
pub mod memory;

pub use search::{Column, Filter, Operator, Search, SearchQuery, SearchRow};
pub use store::{DomainConfig, FileStore, FileUpload, Host, RecordStore};

#[cfg(feature = "memory")]
pub use fixture::{DomainValue, HostFixture};
#[cfg(feature = "memory")]
pub use memory::{MemoryHost, StoredFile};

use thiserror::Error;

/// Errors reported by host collaborators
#[derive(Error, Debug)]
pub enum Error {
    #[error("Record not found: {record_type} {id}")]
    NotFound { record_type: String, id: String },

    #[error("Search error on `{record_type}`: {details}")]
    Search {
        record_type: String,
        details: String,
    },

    #[error("Domain configuration error for '{code}': {details}")]
    Config { code: String, details: String },

    #[error("File error: {details}")]
    File { details: String },

    #[error("Persistence error: {details}")]
    Persistence { details: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(record_type: impl Into<String>, id: impl ToString) -> Self {
        Error::NotFound {
            record_type: record_type.into(),
            id: id.to_string(),
        }
    }

    pub fn config(code: impl Into<String>, details: impl Into<String>) -> Self {
        Error::Config {
            code: code.into(),
            details: details.into(),
        }
    }

    pub fn file(details: impl Into<String>) -> Self {
        Error::File {
            details: details.into(),
        }
    }

    pub fn persistence(details: impl Into<String>) -> Self {
        Error::Persistence {
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        assert_eq!(
            Error::not_found("salesorder", 42).to_string(),
            "Record not found: salesorder 42"
        );
        assert_eq!(
            Error::config("ruta_folder_fulfillment", "no value").to_string(),
            "Domain configuration error for 'ruta_folder_fulfillment': no value"
        );
        assert!(matches!(
            Error::persistence("disk full"),
            Error::Persistence { .. }
        ));
    }
}
