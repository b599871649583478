#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # fulfil-model
//!
//! Request, draft, and host record structures for item fulfillment registration.
//!
//! This crate holds the format-neutral data that flows between the
//! validator, the line reconciler, and the host collaborators: the typed
//! registration request, generic host records, the fulfillment draft with
//! its immutable row list, and the uniform response envelope.

/// Fulfillment draft produced by transforming a source order.
pub mod draft;
/// Host field, column, and record type identifiers.
pub mod fields;
/// Reconciliation inputs: existing lines and requested items.
pub mod lines;
/// Generic host records and value accessors.
pub mod record;
/// Typed view of the registration request payload.
pub mod request;
/// Uniform success/failure response envelope.
pub mod response;

pub use draft::{DraftLine, FulfillmentDraft, InventoryPlanEntry};
pub use lines::{ExistingLine, InventoryAssignment, InventoryType, ItemKind, RequestedItem};
pub use record::{Record, RecordId, RecordRef};
pub use request::{
    AttachmentKind, AttachmentPayload, Attachments, FulfillmentRequest, Localizations, OrderType,
    RegistrationRequest,
};
pub use response::Response;

use thiserror::Error;

/// Errors that can occur when interpreting request or record data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid date '{value}': expected {format}")]
    InvalidDate { value: String, format: String },
}

impl Error {
    /// Build an invalid-value error with the reason the value was rejected.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
