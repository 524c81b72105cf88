//! Issue backend API client and types.
//!
//! This module provides the interface for communicating with the issue
//! tracker REST API.

mod client;
pub mod error;
pub mod types;

pub use client::{IssueClient, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use types::{
    CreateIssueRequest, HealthStatus, Issue, IssueUpdate, IssuesQuery, IssuesResponse,
    Pagination, Priority, SortField, SortOrder, Status,
};
