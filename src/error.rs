//! Centralized error types for LazyIssues.
//!
//! This module provides the unified error hierarchy for the application with
//! user-friendly error messages. All error types use `thiserror`.

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// Client-side validation failures.
///
/// These are raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The issue title is empty or whitespace.
    #[error("Title is required")]
    EmptyTitle,

    /// A status outside the known set.
    #[error("Invalid status '{0}': expected one of open, in_progress, closed")]
    InvalidStatus(String),

    /// A priority outside the known set.
    #[error("Invalid priority '{0}': expected one of low, medium, high")]
    InvalidPriority(String),

    /// An unknown sort field.
    #[error("Invalid sort field '{0}'")]
    InvalidSortField(String),

    /// A sort order other than asc or desc.
    #[error("Invalid sort order '{0}': expected asc or desc")]
    InvalidSortOrder(String),
}

/// The main application error type.
///
/// Aggregates the error types of every layer, providing user-friendly
/// messages while keeping the underlying error for logs.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Client-side validation errors.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file exists and is readable.".to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => e.user_message(),
            AppError::Validation(e) => e.to_string(),
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix ~/.config/lazyissues/config.toml or pass --url.")
            }
            AppError::Api(ApiError::Network(_)) | AppError::Api(ApiError::InvalidUrl(_)) => {
                Some("Check that the issue server is running, or set LAZYISSUES_URL.")
            }
            AppError::Api(ApiError::NotFound(_)) => {
                Some("Run 'lazyissues list' to see available issues.")
            }
            AppError::Api(ApiError::Backend { status, .. })
                if *status == StatusCode::NOT_FOUND =>
            {
                Some("The issue may no longer exist. Run 'lazyissues list' to refresh.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
