//! Error types for Bastion operations.
//!
//! This module provides the error type shared by the Bastion client and provider crates,
//! including HTTP status code mapping and structured error responses.

use serde::Serialize;
use thiserror::Error;

/// Main error type for Bastion operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Bastion appliance is unreachable or temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for Bastion: {0}")]
    Timeout(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Object already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected status returned by the Bastion API
    #[error("api doesn't return OK: {status} with body:\n{message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Failed to parse a Bastion response
    #[error("Failed to parse Bastion response: {0}")]
    ParseError(String),

    /// Resource type is not available with the configured API version
    #[error("resource {resource} not available with api version {version}{hint}")]
    UnsupportedApiVersion {
        /// Resource type name
        resource: String,
        /// Configured API version
        version: String,
        /// Optional suffix pointing at a replacement resource
        hint: String,
    },

    /// Import identifier has the wrong shape
    #[error("{0}")]
    InvalidImportId(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for Bastion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
    /// Optional request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::ApiError { .. } => "API_ERROR",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::UnsupportedApiVersion { .. } => "UNSUPPORTED_API_VERSION",
            Self::InvalidImportId(_) => "INVALID_IMPORT_ID",
            Self::InternalError(_) => "INTERNAL_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Builds the error returned when a resource type is gated out by the API version.
    #[must_use]
    pub fn unsupported_version(
        resource: impl Into<String>,
        version: impl ToString,
        successor: Option<&str>,
    ) -> Self {
        Self::UnsupportedApiVersion {
            resource: resource.into(),
            version: version.to_string(),
            hint: successor
                .map(|name| format!(", use {name} instead"))
                .unwrap_or_default(),
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        self.into_error_response_with_id(None)
    }

    /// Converts the error into an `ErrorResponse` with a request ID.
    #[must_use]
    pub fn into_error_response_with_id(self, request_id: Option<String>) -> ErrorResponse {
        let details = match &self {
            Self::ApiError { status, .. } => Some(serde_json::json!({ "status": status })),
            _ => None,
        };
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details,
            },
            request_id,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::InternalError(_) | Self::ConfigError(_) | Self::ApiError { .. }
        )
    }

    /// Returns true for errors worth retrying.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
