//! API error types for the issue backend client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the issue backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested issue does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The backend answered with a non-2xx status.
    #[error("Backend returned HTTP {status}: {}", summarize_body(.body))]
    Backend {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body.
        body: String,
    },

    /// Network or HTTP transport error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A successful response whose body could not be parsed.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from a non-success HTTP status and its body.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        ApiError::Backend {
            status,
            body: body.into(),
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound(resource) => format!("{}.", resource),
            ApiError::Backend { status, .. } => match self.backend_message() {
                Some(message) => {
                    format!("The server rejected the request ({}): {}", status, message)
                }
                None if status.is_server_error() => {
                    "The issue server failed to handle the request. Please try again later."
                        .to_string()
                }
                None => format!("The server rejected the request ({}).", status),
            },
            ApiError::Network(_) => {
                "Could not reach the issue server. Please check the URL and your connection."
                    .to_string()
            }
            ApiError::InvalidUrl(url) => format!("Invalid server URL: {}", url),
            ApiError::InvalidResponse(_) => {
                "Unexpected response from the issue server. Please try again.".to_string()
            }
        }
    }

    /// The backend's error message, if the body carries one.
    ///
    /// The backend reports failures as `{"error": "..."}`.
    pub fn backend_message(&self) -> Option<String> {
        match self {
            ApiError::Backend { body, .. } => extract_error_message(body),
            _ => None,
        }
    }
}

/// Pull the `error` field out of a JSON error body.
fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    json.get("error")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .filter(|msg| !msg.is_empty())
}

fn summarize_body(body: &str) -> String {
    if let Some(message) = extract_error_message(body) {
        return message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "(empty body)".to_string()
    } else {
        trimmed.to_string()
    }
}
