//! # fulfil-schema
//!
//! Declarative request schema model, registry, and loader.
//!
//! A registry maps schema names to ordered field rules. Rules reference
//! other schemas by name through `itemSchema`, so a registry forms a graph
//! that may contain self-references; [`graph::ReferenceGraph`] reports them.

pub mod builtin;
pub mod graph;
pub mod loader;
pub mod model;
pub mod registry;

pub use builtin::{ROOT_SCHEMA, fulfillment_registry};
pub use graph::ReferenceGraph;
pub use loader::SchemaLoader;
pub use model::{FieldRule, FieldType, Schema, SchemaRule};
pub use registry::SchemaRegistry;

use thiserror::Error;

/// Errors that can occur when working with schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("Field '{schema}.{field}' references unknown schema '{target}'")]
    UnknownReference {
        schema: String,
        field: String,
        target: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
