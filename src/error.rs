//! Error types for the service surface.
//!
//! Errors are classified by how a transport should report them:
//! - Validation: malformed or missing input field (400-equivalent)
//! - NotFound: referenced id does not exist (404-equivalent)
//! - Db / internal: storage or unexpected failure (500-equivalent)
//!
//! No operation retries: every call is a single attempt and transient
//! storage failures propagate directly to the caller.

use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("Invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

impl CrmError {
    /// Shorthand for a field-level validation failure.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CrmError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(what: &str, id: i64) -> Self {
        CrmError::NotFound(format!("{what} {id}"))
    }

    /// HTTP-equivalent status for a consuming transport.
    pub fn status(&self) -> u16 {
        match self {
            CrmError::Validation { .. } => 400,
            CrmError::NotFound(_) => 404,
            CrmError::Db(_) => 500,
        }
    }

    /// Offending field for validation failures, for error payloads that
    /// surface the first violated field to the caller.
    pub fn field(&self) -> Option<&str> {
        match self {
            CrmError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Serializable error body for a consuming front end.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&CrmError> for ErrorBody {
    fn from(err: &CrmError) -> Self {
        ErrorBody {
            message: err.to_string(),
            field: err.field().map(str::to_string),
        }
    }
}
