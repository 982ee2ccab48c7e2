//! Unified error types for all layers of the application.

use crate::Violation;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Orderly.
///
/// Client-classified variants (`Bind`, `Validation`, `Parse`, `NotFound`)
/// carry full detail back to the caller. `Store` is server-classified.
/// `Cache` never reaches a response: the cache layer logs and swallows it.
#[derive(Error, Debug)]
pub enum OrderlyError {
    // ============ Client Errors ============
    /// Payload could not be decoded.
    #[error("Failed to bind payload: {0}")]
    Bind(String),

    /// Payload decoded but violates its schema.
    #[error("Failed to validate {resource}.")]
    Validation {
        resource: &'static str,
        violations: Vec<Violation>,
    },

    /// Resource absent or soft-deleted.
    #[error("{resource_type} not found with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Textual parameter is not a valid 32-bit integer.
    #[error("Failed to parse {parameter}: '{value}' is not a valid integer")]
    Parse { parameter: String, value: String },

    // ============ Infrastructure Errors ============
    /// Constraint violation or connectivity failure in the store.
    #[error("Database error: {0}")]
    Store(String),

    /// Redis/local cache error.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrderlyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Bind(_) | Self::Validation { .. } | Self::Parse { .. } => 400,
            Self::Store(_) | Self::Cache(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Bind(_) => "BIND_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Store(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure is attributed to the caller.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Returns the field violations of a validation error.
    #[must_use]
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation { violations, .. } => Some(violations),
            _ => None,
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a parse error for a textual parameter.
    #[must_use]
    pub fn parse(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Creates a bind error.
    #[must_use]
    pub fn bind<T: Into<String>>(message: T) -> Self {
        Self::Bind(message.into())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for OrderlyError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // 23503: foreign_key_violation, 23505: unique_violation, 23514: check_violation
                match db_err.code().as_deref() {
                    Some("23503" | "23505" | "23514") => {
                        Self::Store(format!("constraint violation: {}", db_err.message()))
                    }
                    _ => Self::Store(err.to_string()),
                }
            }
            _ => Self::Store(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for OrderlyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error body for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field violations for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Violation>>,
}

impl ErrorResponse {
    /// Creates a new error response from an `OrderlyError`.
    #[must_use]
    pub fn from_error(error: &OrderlyError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: error.violations().map(<[Violation]>::to_vec),
        }
    }
}

impl From<&OrderlyError> for ErrorResponse {
    fn from(error: &OrderlyError) -> Self {
        Self::from_error(error)
    }
}
