//! Issue detail view.

use std::fmt::Write as _;

use tracing::{debug, warn};

use super::{LoadState, RequestSequence};
use crate::api::types::Issue;
use crate::api::ApiError;
use crate::ui::format::long_timestamp;

/// A detail fetch to perform, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub seq: u64,
    pub id: String,
}

/// The issue detail view.
#[derive(Debug, Default)]
pub struct DetailView {
    /// The issue being displayed.
    issue: Option<Issue>,
    /// The id most recently requested.
    requested_id: Option<String>,
    load_state: LoadState,
    sequence: RequestSequence,
}

impl DetailView {
    /// Create a new, empty detail view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading an issue.
    pub fn load(&mut self, id: &str) -> DetailRequest {
        let seq = self.sequence.next();
        self.requested_id = Some(id.to_string());
        self.load_state = LoadState::Loading;
        DetailRequest {
            seq,
            id: id.to_string(),
        }
    }

    /// Show an issue that is already known, e.g. one just saved.
    pub fn set_issue(&mut self, issue: Issue) {
        // Invalidate any fetch still in flight.
        self.sequence.next();
        self.requested_id = Some(issue.id.clone());
        self.issue = Some(issue);
        self.load_state = LoadState::Idle;
    }

    /// Apply the result of a fetch. Returns `false` if it was stale.
    pub fn apply_response(&mut self, seq: u64, result: Result<Issue, ApiError>) -> bool {
        if !self.sequence.is_current(seq) {
            debug!(seq, "Discarding stale issue detail response");
            return false;
        }

        match result {
            Ok(issue) => {
                self.issue = Some(issue);
                self.load_state = LoadState::Idle;
            }
            Err(e) => {
                warn!(seq, "Failed to load issue: {}", e);
                self.load_state = LoadState::Failed(e.user_message());
            }
        }
        true
    }

    /// The loaded issue.
    pub fn issue(&self) -> Option<&Issue> {
        self.issue.as_ref()
    }

    /// The id most recently requested.
    pub fn requested_id(&self) -> Option<&str> {
        self.requested_id.as_deref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.load_state.error()
    }

    /// The loaded issue as pretty-printed JSON.
    pub fn issue_json(&self) -> Option<String> {
        self.issue
            .as_ref()
            .and_then(|issue| serde_json::to_string_pretty(issue).ok())
    }

    /// Render the issue details as text.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(error) = self.error() {
            let _ = writeln!(out, "Error: {}", error);
        }

        let Some(issue) = &self.issue else {
            if self.is_loading() {
                out.push_str("Loading issue details...\n");
            }
            return out;
        };

        // Kept after a failed load of another issue.
        if self.requested_id().is_some_and(|id| id != issue.id) {
            let _ = writeln!(out, "Showing previously loaded issue {}:", issue.id);
            out.push('\n');
        }

        let _ = writeln!(out, "{}", issue.title);
        let _ = writeln!(out, "ID:       {}", issue.id);
        let _ = writeln!(out, "Status:   {}", issue.status.label());
        let _ = writeln!(out, "Priority: {}", issue.priority.label());
        let _ = writeln!(out, "Assignee: {}", issue.assignee_name());
        let _ = writeln!(out, "Created:  {}", long_timestamp(&issue.created_at));
        let _ = writeln!(out, "Updated:  {}", long_timestamp(&issue.updated_at));
        out.push('\n');
        out.push_str("Description\n");
        let _ = writeln!(out, "{}", issue.description_text());
        out
    }
}
