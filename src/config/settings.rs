//! Application settings configuration.

use serde::{Deserialize, Serialize};

use crate::api::types::{SortField, SortOrder, DEFAULT_PAGE_SIZE};
use crate::api::DEFAULT_TIMEOUT_SECS;

/// The backend URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The issue backend base URL.
    pub base_url: String,
    /// Issues per page for new listings.
    pub page_size: u32,
    /// Initial sort field.
    pub sort_by: SortField,
    /// Initial sort direction.
    pub sort_order: SortOrder,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
