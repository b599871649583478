#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # fulfil-validation
//!
//! Recursive, declarative validation of JSON payloads against a
//! [`SchemaRegistry`](fulfil_schema::SchemaRegistry).
//!
//! Validation never stops at the first problem: every violated constraint
//! produces its own human-readable message, in field declaration order.
//!
//! ## Example Usage
//!
//! ```rust
//! use fulfil_schema::{Schema, SchemaRegistry, SchemaRule};
//! use fulfil_validation::ValidationEngine;
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::new().with(
//!     Schema::new("item")
//!         .field("itemId", SchemaRule::string().required())
//!         .field("quantity", SchemaRule::number().min(1.0)),
//! );
//!
//! let engine = ValidationEngine::new(&registry);
//! let result = engine.validate(&json!({ "quantity": 0 }), "item");
//!
//! assert!(!result.is_valid);
//! assert_eq!(
//!     result.errors,
//!     vec![
//!         "itemId is required".to_string(),
//!         "quantity must be greater than or equal to 1".to_string(),
//!     ]
//! );
//! ```

pub mod engine;
pub mod reporter;
pub mod rules;

pub use engine::{DEFAULT_MAX_DEPTH, ValidationConfig, ValidationEngine, ValidationResult};
pub use reporter::ValidationReporter;

use thiserror::Error;

/// Errors surfaced by validation entry points that must reject a payload
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", ValidationReporter::summarize("the payload", .0))]
    Invalid(Vec<String>),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Validate a payload and turn a failed result into [`Error::Invalid`]
///
/// # Errors
///
/// Returns [`Error::Invalid`] carrying every message when the payload does
/// not satisfy the schema.
pub fn ensure_valid(
    registry: &fulfil_schema::SchemaRegistry,
    data: &serde_json::Value,
    schema_name: &str,
) -> Result<()> {
    let result = ValidationEngine::new(registry).validate(data, schema_name);
    if result.is_valid {
        Ok(())
    } else {
        Err(Error::Invalid(result.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfil_schema::{Schema, SchemaRegistry, SchemaRule};
    use serde_json::json;

    #[test]
    fn test_ensure_valid() {
        let registry =
            SchemaRegistry::new().with(Schema::new("s").field("a", SchemaRule::string().required()));

        assert!(ensure_valid(&registry, &json!({ "a": "x" }), "s").is_ok());

        let err = ensure_valid(&registry, &json!({}), "s").unwrap_err();
        assert!(matches!(&err, Error::Invalid(errors) if errors == &vec!["a is required".to_string()]));
        assert_eq!(
            err.to_string(),
            "Found 1 error(s) in the payload:\n  1. a is required"
        );
    }
}
