//! # fulfil-reconcile
//!
//! Matches the rows of a fulfillment draft against the requested items,
//! derives inventory plans for the matched rows, and checks that the
//! source order can still be fulfilled.
//!
//! Matching is greedy: rows are visited in line order and each one takes
//! the first requested item with the same item reference that no earlier
//! row has consumed. No attempt is made to find a better assignment.

pub mod inventory;
pub mod matcher;
pub mod order_state;

pub use inventory::{InventoryLookup, plan_inventory};
pub use matcher::{Match, Reconciliation, reconcile, reconcile_lines};
pub use order_state::{OrderPolicy, check_order};

use fulfil_model::RecordId;
use std::fmt;
use thiserror::Error;

/// What an inventory lookup was searching for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Bin,
    InventoryNumber,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Bin => f.write_str("bin"),
            LookupKind::InventoryNumber => f.write_str("inventory number"),
        }
    }
}

/// Errors that can occur during reconciliation
#[derive(Error, Debug)]
pub enum Error {
    #[error("{kind} '{value}' not found (line {line}, location {})", .location.as_deref().unwrap_or("any"))]
    LookupNotFound {
        kind: LookupKind,
        value: String,
        line: usize,
        location: Option<String>,
    },

    #[error("Inventory lookup failed: {0}")]
    Lookup(String),

    #[error("Order {order_id} cannot be fulfilled: {}", .errors.join("; "))]
    OrderState {
        order_id: RecordId,
        errors: Vec<String>,
    },
}

impl Error {
    /// Create a lookup collaborator error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Error::Lookup(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
