//! Issue tracker API request and response types.
//!
//! These types model the JSON bodies exchanged with the issue backend.
//! Wire names are camelCase; enum values use the backend's lowercase names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default page size for issue listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The workflow status of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl Status {
    /// All statuses in workflow order.
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Closed];

    /// The value used on the wire and in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Closed => "closed",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Closed => "Closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
    }
}

/// The priority of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities from lowest to highest.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// The value used on the wire and in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidPriority(s.to_string()))
    }
}

/// A tracked issue.
///
/// Returned by `GET /issues/{id}` and as part of list results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Backend-assigned identifier.
    pub id: String,
    /// The issue title.
    pub title: String,
    /// Free-form description, empty when not provided.
    #[serde(default)]
    pub description: String,
    /// Workflow status.
    pub status: Status,
    /// Priority.
    pub priority: Priority,
    /// Assignee, typically an email address.
    #[serde(default)]
    pub assignee: Option<String>,
    /// When the issue was created.
    #[serde(default)]
    pub created_at: String,
    /// When the issue was last modified.
    #[serde(default)]
    pub updated_at: String,
}

impl Issue {
    /// The assignee, treating an empty string as unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref().filter(|a| !a.trim().is_empty())
    }

    /// Get the assignee, or "Unassigned" if not set.
    pub fn assignee_name(&self) -> &str {
        self.assignee().unwrap_or("Unassigned")
    }

    /// Get the description, or a placeholder if empty.
    pub fn description_text(&self) -> &str {
        if self.description.trim().is_empty() {
            "No description provided."
        } else {
            &self.description
        }
    }

    /// The first eight characters of the id, as shown in tables.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.short_id(), self.title)
    }
}

/// Pagination metadata for a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The 1-based page number.
    pub page: u32,
    /// Number of issues per page.
    pub page_size: u32,
    /// Total number of matching issues.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

impl Pagination {
    /// Check if there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Check if there is a page before this one.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Result of an issue listing.
///
/// Returned by `GET /issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesResponse {
    /// The issues on this page, in backend order.
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Fields the backend can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Title,
    Status,
    Priority,
    Assignee,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Id,
        SortField::Title,
        SortField::Status,
        SortField::Priority,
        SortField::Assignee,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    /// The value sent as `sortBy`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Status => "status",
            SortField::Priority => "priority",
            SortField::Assignee => "assignee",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidSortField(s.to_string()))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// The value sent as `sortOrder`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ValidationError::InvalidSortOrder(other.to_string())),
        }
    }
}

/// Parameters for `GET /issues`.
///
/// Optional fields that are `None` are left out of the request entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesQuery {
    /// 1-based page number.
    pub page: u32,
    /// Issues per page.
    pub page_size: u32,
    /// Substring matched against title and description.
    pub search: Option<String>,
    /// Exact status filter.
    pub status: Option<Status>,
    /// Exact priority filter.
    pub priority: Option<Priority>,
    /// Substring matched against the assignee.
    pub assignee: Option<String>,
    /// Field to sort by.
    pub sort_by: Option<SortField>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
}

impl Default for IssuesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            status: None,
            priority: None,
            assignee: None,
            sort_by: Some(SortField::default()),
            sort_order: Some(SortOrder::default()),
        }
    }
}

impl IssuesQuery {
    /// Build the query string pairs for this query.
    ///
    /// `page` and `pageSize` are always present. Every other parameter is
    /// emitted only when set.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];

        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(assignee) = &self.assignee {
            pairs.push(("assignee", assignee.clone()));
        }
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sortBy", sort_by.as_str().to_string()));
        }
        if let Some(sort_order) = self.sort_order {
            pairs.push(("sortOrder", sort_order.as_str().to_string()));
        }

        pairs
    }

    /// Check whether any filter is active.
    pub fn has_filters(&self) -> bool {
        self.search.is_some()
            || self.status.is_some()
            || self.priority.is_some()
            || self.assignee.is_some()
    }
}

/// Body for `POST /issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl CreateIssueRequest {
    /// A request carrying only a title; the backend fills in the rest.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            assignee: None,
        }
    }
}

/// Body for `PUT /issues/{id}`.
///
/// Only fields that are `Some` are sent and changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl IssueUpdate {
    /// Check if the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    /// Check if the backend reports itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
