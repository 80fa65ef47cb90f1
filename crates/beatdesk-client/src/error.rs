//! # API Errors
//!
//! Error types for API operations.

use beatdesk_types::ProblemDetails;
use thiserror::Error;

/// Errors that can occur during API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or transport error; the request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    ///
    /// `problem` holds the RFC 7807 body when the backend sent one; it is
    /// `None` whenever the body was empty or not a problem object.
    #[error("request failed: {status} {status_text}")]
    Request {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
        /// Parsed problem object, if any.
        problem: Option<ProblemDetails>,
    },

    /// Failed to deserialize a 2xx response body.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// Failed to serialize a request body or query.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Caller supplied a header that is not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Configured base URL is not a valid absolute URL.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status of the failed response, if the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Problem object sent by the backend, if any.
    #[must_use]
    pub fn problem(&self) -> Option<&ProblemDetails> {
        match self {
            Self::Request { problem, .. } => problem.as_ref(),
            _ => None,
        }
    }

    /// Returns true for 401 responses.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Message suitable for showing to a backoffice operator.
    ///
    /// Prefers the problem `detail`, then its `title`, then the status line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request {
                status,
                status_text,
                problem,
            } => problem
                .as_ref()
                .and_then(ProblemDetails::message)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} {}", status, status_text).trim().to_string()),
            Self::Network(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            Self::Network(e) if e.is_connect() => "Could not reach the server".to_string(),
            Self::Network(e) => format!("Network error: {}", e),
            Self::InvalidResponse(msg) => format!("Unexpected response from server: {}", msg),
            other => other.to_string(),
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
