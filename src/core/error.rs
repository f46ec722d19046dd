//! Typed error handling for the order system
//!
//! # Error Categories
//!
//! - [`ConfigError`]: missing or invalid deployment configuration (fatal at startup)
//! - [`StartupError`]: the durable store could not be brought up (fatal at startup)
//! - [`ValidationError`]: caller-supplied order data is malformed (recoverable)
//! - [`StorageError`]: a backend operation failed after startup
//! - [`OrderError`]: what the service facade returns to transport adapters
//!
//! Transport adapters map [`OrderError`] onto their own status signalling:
//! validation failures are the caller's fault, storage failures are not.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while loading deployment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("environment variable '{0}' is not set")]
    MissingVar(String),

    /// A value is present but cannot be used
    #[error("invalid value '{value}' for {field}: {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file could not be read
    #[error("failed to read configuration file '{path}': {message}")]
    Io { path: String, message: String },

    /// Configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Errors that abort process startup while bringing up a store
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Backend unreachable
    #[error("failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    /// Table creation failed
    #[error("failed to create schema: {0}")]
    Schema(String),

    /// Seed data could not be written
    #[error("failed to prepopulate store: {0}")]
    Seed(String),
}

/// One rejected field of an order request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors caused by the caller's input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more fields failed validation
    #[error("invalid order: {}", join_violations(.0))]
    Fields(Vec<FieldViolation>),

    /// The drink id is well-formed but not in the catalog
    #[error("unknown drink id {0}")]
    UnknownDrink(u64),

    /// The request body could not be decoded
    #[error("malformed request: {0}")]
    Malformed(String),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldViolation {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::Fields(violations)
    }
}

/// Errors raised by a store after startup
#[derive(Debug, Error)]
pub enum StorageError {
    /// Query or statement failed
    #[error("{backend} query failed: {message}")]
    Query { backend: String, message: String },

    /// Transaction could not be started or committed
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// The operation did not finish within the configured timeout
    #[error("{backend} operation timed out")]
    Timeout { backend: String },

    /// A per-drink total does not fit in an unsigned 64-bit quantity
    #[error("total for drink {drink_id} exceeds the representable range")]
    Overflow { drink_id: u64 },

    /// In-process state is unusable (poisoned lock, id overflow)
    #[error("store state unavailable: {0}")]
    Unavailable(String),
}

/// Error returned by the service facade
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error body for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl OrderError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::Validation(_) => StatusCode::BAD_REQUEST,
            OrderError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller caused the failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, OrderError::Validation(_))
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        if let OrderError::Storage(e) = &self {
            tracing::error!(error = %e, "request failed in storage");
        }
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
