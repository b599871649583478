//! Response envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::RecordId;

/// Body returned to the caller; failures use the same envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recordid: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Response {
    /// Successful registration
    #[must_use]
    pub fn success(recordid: RecordId) -> Self {
        Self {
            success: true,
            recordid: Some(recordid),
            message: None,
            details: None,
        }
    }

    /// Failed registration
    pub fn failure(message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            recordid: None,
            message: Some(message.into()),
            details,
        }
    }
}
