//! Issue list view.
//!
//! Holds the filter, sort and pagination state of the issue list and the
//! last page fetched for it. Every state change that needs fresh data
//! returns a [`FetchRequest`]; the response is applied with
//! [`ListView::apply_response`], which drops anything but the latest request.

use std::fmt::Write as _;

use tracing::{debug, warn};

use super::{LoadState, RequestSequence};
use crate::api::types::{
    Issue, IssuesQuery, IssuesResponse, Pagination, Priority, SortField, SortOrder, Status,
};
use crate::api::ApiError;
use crate::config::Settings;
use crate::ui::format::{short_timestamp, truncate};

/// A list fetch to perform, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub query: IssuesQuery,
}

/// The issue list view.
#[derive(Debug, Default)]
pub struct ListView {
    /// The query the next fetch will use.
    query: IssuesQuery,
    /// Issues on the currently displayed page.
    issues: Vec<Issue>,
    /// Pagination of the currently displayed page.
    pagination: Option<Pagination>,
    /// Loading state of the last fetch.
    load_state: LoadState,
    /// Sequence numbers for stale-response suppression.
    sequence: RequestSequence,
}

impl ListView {
    /// Create a new list view with the default query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list view whose initial page size and sort come from settings.
    pub fn with_settings(settings: &Settings) -> Self {
        let query = IssuesQuery {
            page_size: settings.page_size.max(1),
            sort_by: Some(settings.sort_by),
            sort_order: Some(settings.sort_order),
            ..IssuesQuery::default()
        };
        Self {
            query,
            ..Self::default()
        }
    }

    /// The query the next fetch will use.
    pub fn query(&self) -> &IssuesQuery {
        &self.query
    }

    /// Issues on the displayed page.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Pagination of the displayed page, if anything was loaded yet.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Loading state of the last fetch.
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Check if a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.load_state.is_loading()
    }

    /// The error of the last failed fetch.
    pub fn error(&self) -> Option<&str> {
        self.load_state.error()
    }

    /// The page the next fetch will request.
    pub fn current_page(&self) -> u32 {
        self.query.page
    }

    /// Total number of matching issues on the backend.
    pub fn total(&self) -> u32 {
        self.pagination.map(|p| p.total).unwrap_or(0)
    }

    /// Total number of pages on the backend.
    pub fn total_pages(&self) -> u32 {
        self.pagination.map(|p| p.total_pages).unwrap_or(0)
    }

    /// Check if a next page exists.
    pub fn has_next_page(&self) -> bool {
        self.pagination.map(|p| p.has_next()).unwrap_or(false)
    }

    /// Check if a previous page exists.
    pub fn has_previous_page(&self) -> bool {
        self.pagination.map(|p| p.has_previous()).unwrap_or(false)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Refetch the current query unchanged.
    pub fn refresh(&mut self) -> FetchRequest {
        self.begin_fetch()
    }

    /// The search text changed.
    pub fn search_changed(&mut self, search: &str) -> FetchRequest {
        self.query.search = normalize_text_filter(search);
        self.filter_changed()
    }

    /// The status filter changed.
    pub fn status_filter_changed(&mut self, status: Option<Status>) -> FetchRequest {
        self.query.status = status;
        self.filter_changed()
    }

    /// The priority filter changed.
    pub fn priority_filter_changed(&mut self, priority: Option<Priority>) -> FetchRequest {
        self.query.priority = priority;
        self.filter_changed()
    }

    /// The assignee filter changed.
    pub fn assignee_filter_changed(&mut self, assignee: &str) -> FetchRequest {
        self.query.assignee = normalize_text_filter(assignee);
        self.filter_changed()
    }

    /// The sort column or direction changed.
    pub fn sort_changed(&mut self, sort_by: SortField, sort_order: SortOrder) -> FetchRequest {
        self.query.sort_by = Some(sort_by);
        self.query.sort_order = Some(sort_order);
        self.filter_changed()
    }

    /// Remove every filter.
    pub fn clear_filters(&mut self) -> FetchRequest {
        self.query.search = None;
        self.query.status = None;
        self.query.priority = None;
        self.query.assignee = None;
        self.filter_changed()
    }

    /// Replace the whole query at once, e.g. from command-line flags.
    ///
    /// The page is taken from the new query; blank text filters become
    /// absent and page values below 1 are clamped to 1.
    pub fn query_changed(&mut self, query: IssuesQuery) -> FetchRequest {
        self.query = IssuesQuery {
            page: query.page.max(1),
            page_size: query.page_size.max(1),
            search: query.search.as_deref().and_then(normalize_text_filter),
            assignee: query.assignee.as_deref().and_then(normalize_text_filter),
            ..query
        };
        self.begin_fetch()
    }

    /// The pagination control moved to another page or page size.
    ///
    /// The page is kept as given; values below 1 are clamped to 1.
    pub fn page_changed(&mut self, page: u32, page_size: u32) -> FetchRequest {
        self.query.page = page.max(1);
        self.query.page_size = page_size.max(1);
        self.begin_fetch()
    }

    /// Move to the next page, if there is one.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if !self.has_next_page() {
            return None;
        }
        let page = self.query.page + 1;
        Some(self.page_changed(page, self.query.page_size))
    }

    /// Move to the previous page, if there is one.
    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        if self.query.page <= 1 {
            return None;
        }
        let page = self.query.page - 1;
        Some(self.page_changed(page, self.query.page_size))
    }

    /// Apply the result of a fetch.
    ///
    /// Returns `false` if the response was stale and ignored. On success the
    /// issues and pagination are replaced together; on failure the displayed
    /// data is kept and the error recorded.
    pub fn apply_response(
        &mut self,
        seq: u64,
        result: Result<IssuesResponse, ApiError>,
    ) -> bool {
        if !self.sequence.is_current(seq) {
            debug!(
                seq,
                latest = self.sequence.last_issued(),
                "Discarding stale issue list response"
            );
            return false;
        }

        match result {
            Ok(response) => {
                debug!(
                    seq,
                    count = response.issues.len(),
                    total = response.pagination.total,
                    "Applying issue list"
                );
                self.issues = response.issues;
                self.pagination = Some(response.pagination);
                self.load_state = LoadState::Idle;
            }
            Err(e) => {
                warn!(seq, "Failed to load issues: {}", e);
                self.load_state = LoadState::Failed(e.user_message());
            }
        }
        true
    }

    fn filter_changed(&mut self) -> FetchRequest {
        self.query.page = 1;
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchRequest {
        let seq = self.sequence.next();
        self.load_state = LoadState::Loading;
        FetchRequest {
            seq,
            query: self.query.clone(),
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the list as a text table with a pagination footer.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(error) = self.error() {
            let _ = writeln!(out, "Error: {}", error);
        }

        if self.issues.is_empty() {
            if self.pagination.is_some() {
                out.push_str("No issues found.\n");
            }
        } else {
            let _ = writeln!(
                out,
                "{:<9} {:<40} {:<12} {:<8} {:<28} {}",
                "ID", "TITLE", "STATUS", "PRIORITY", "ASSIGNEE", "UPDATED"
            );
            for issue in &self.issues {
                let _ = writeln!(
                    out,
                    "{:<9} {:<40} {:<12} {:<8} {:<28} {}",
                    issue.short_id(),
                    truncate(&issue.title, 40),
                    issue.status.label(),
                    issue.priority.label(),
                    truncate(issue.assignee_name(), 28),
                    short_timestamp(&issue.updated_at)
                );
            }
        }

        if let Some(p) = &self.pagination {
            let _ = writeln!(
                out,
                "Page {} of {} ({} issues)",
                p.page,
                p.total_pages.max(1),
                p.total
            );
        }

        out
    }
}

/// Treat blank text filters as absent.
fn normalize_text_filter(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
