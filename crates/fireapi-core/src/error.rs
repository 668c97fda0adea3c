//! Error types for 24Fire API operations.
//!
//! Every failure a call can hit is one variant of [`Error`]: transport problems,
//! non-success HTTP statuses, undecodable bodies, and configuration mistakes
//! caught before a request is sent.

use serde::Serialize;
use thiserror::Error;

/// Hint used for 401 responses that carry no message of their own.
pub const UNAUTHORIZED_HINT: &str = "Authentication failed. Check your API key.";

/// Hint used for 403 responses that carry no message of their own.
pub const FORBIDDEN_HINT: &str =
    "Access denied or this feature requires a '24fire+' subscription.";

/// Main error type for 24Fire operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The remote host could not be reached
    #[error("Service unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Any other transport-level failure
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The API answered with a non-success status
    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Error message extracted from the response body, if any
        message: Option<String>,
    },

    /// A success response whose body is not valid JSON
    #[error("Malformed response body: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for 24Fire operations.
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
    /// HTTP status, when the error came from an API response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl Error {
    /// Build an [`Error::Api`], filling in an authentication hint for 401/403
    /// responses that did not explain themselves.
    #[must_use]
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message.or_else(|| match status {
            401 => Some(UNAUTHORIZED_HINT.to_string()),
            403 => Some(FORBIDDEN_HINT.to_string()),
            _ => None,
        });
        Self::Api { status, message }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "UNREACHABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// HTTP status code, for errors produced by a non-success response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message reported by the remote service, if one was sent.
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns true for 401 and 403 responses.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// Returns true for failures that happened before any response arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Unreachable(_) | Self::Timeout(_) | Self::HttpError(_)
        )
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        self.into_error_response_with_id(None)
    }

    /// Converts the error into an `ErrorResponse` with a request ID.
    #[must_use]
    pub fn into_error_response_with_id(self, request_id: Option<String>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                status: self.status(),
            },
            request_id,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Unreachable(_) | Self::HttpError(_) | Self::MalformedResponse(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Unreachable(err.to_string())
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            Self::InvalidEndpoint(err.to_string())
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
        Self::MalformedResponse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
