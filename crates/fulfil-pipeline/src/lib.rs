#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # fulfil-pipeline
//!
//! Registration of item fulfillments against a host ERP.
//!
//! [`FulfillmentService::register`] takes a raw JSON payload and runs it
//! through schema validation, domain configuration and location lookups,
//! the source order checks, the transform into a fulfillment draft, header
//! mapping, attachment upload, line reconciliation, the final save, and
//! the `tranid` verify-and-correct write. Every failure ends up in the
//! uniform [`Response`](fulfil_model::Response) envelope.

pub mod attachments;
pub mod config;
pub mod header;
pub mod lookups;
pub mod service;

pub use config::ServiceConfig;
pub use header::HeaderParams;
pub use lookups::{HostInventoryLookup, LocationAddress};
pub use service::FulfillmentService;

use fulfil_model::{RecordId, Response};
use fulfil_validation::ValidationReporter;
use serde_json::json;
use thiserror::Error;

/// Message returned when the host refuses to persist the fulfillment
pub const PERSISTENCE_FAILURE_MESSAGE: &str = "The item fulfillment could not be saved";

/// Errors that end a registration
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", ValidationReporter::summarize("the payload", .errors))]
    SchemaValidation { errors: Vec<String> },

    #[error("Invalid request: {0}")]
    Request(#[from] fulfil_model::Error),

    #[error("Domain configuration not found for {code}: {details}")]
    DomainConfig { code: String, details: String },

    #[error("Order with ID {order_id} was not found")]
    OrderNotFound { order_id: RecordId },

    #[error("{}", order_summary(.order_id, .errors))]
    OrderState {
        order_id: RecordId,
        errors: Vec<String>,
    },

    #[error("No {record_type} found for '{value}'")]
    RecordNotFound { record_type: String, value: String },

    #[error("{0}")]
    Lookup(fulfil_reconcile::Error),

    #[error("Attachment '{file_name}' could not be uploaded: {details}")]
    Attachment { file_name: String, details: String },

    #[error("The item fulfillment could not be saved: {details}")]
    Persistence { details: String },

    #[error("Schema error: {0}")]
    Schema(#[from] fulfil_schema::Error),

    #[error("Host error: {0}")]
    Host(#[from] fulfil_host::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn order_summary(order_id: &RecordId, errors: &[String]) -> String {
    ValidationReporter::summarize(&format!("order {order_id}"), errors)
}

impl Error {
    pub fn persistence(details: impl ToString) -> Self {
        Error::Persistence {
            details: details.to_string(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Failure envelope for this error
    ///
    /// Schema errors carry the individual messages, order state errors the
    /// order id and its messages. Persistence failures hide host details
    /// behind a generic message.
    #[must_use]
    pub fn to_response(&self) -> Response {
        match self {
            Error::SchemaValidation { errors } => {
                Response::failure(self.to_string(), Some(json!(errors)))
            }
            Error::OrderState { order_id, errors } => Response::failure(
                self.to_string(),
                Some(json!({ "orderId": order_id.to_string(), "validationErrors": errors })),
            ),
            Error::Persistence { .. } => {
                Response::failure(PERSISTENCE_FAILURE_MESSAGE, Some(json!([])))
            }
            _ => Response::failure(self.to_string(), Some(json!([]))),
        }
    }
}

impl From<fulfil_reconcile::Error> for Error {
    fn from(e: fulfil_reconcile::Error) -> Self {
        match e {
            fulfil_reconcile::Error::OrderState { order_id, errors } => {
                Error::OrderState { order_id, errors }
            }
            other => Error::Lookup(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
