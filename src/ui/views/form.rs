//! Create/edit issue form.
//!
//! One form serves both creating and editing; [`FormMode`] selects which
//! request a submission produces. The form never talks to the backend
//! itself: [`FormView::submit`] returns the request to run and
//! [`FormView::complete`] takes its result.

use std::fmt::Write as _;

use tracing::{debug, warn};

use crate::api::types::{CreateIssueRequest, Issue, IssueUpdate, Priority, Status};
use crate::api::ApiError;
use crate::error::ValidationError;

/// What the form is doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Creating a new issue.
    Create,
    /// Editing an existing issue.
    Edit(Issue),
}

/// How the form was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// The issue was created or updated.
    Saved(Issue),
    /// The form was dismissed without saving.
    Cancelled,
}

impl FormOutcome {
    /// The saved issue, or `None` if the form was cancelled.
    pub fn into_issue(self) -> Option<Issue> {
        match self {
            FormOutcome::Saved(issue) => Some(issue),
            FormOutcome::Cancelled => None,
        }
    }
}

/// The editable fields of an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assignee: String,
}

impl Default for IssueDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: Status::Open,
            priority: Priority::Medium,
            assignee: String::new(),
        }
    }
}

impl IssueDraft {
    /// A draft holding the current values of an issue.
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            status: issue.status,
            priority: issue.priority,
            assignee: issue.assignee.clone().unwrap_or_default(),
        }
    }

    /// Validate the draft.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    fn to_create_request(&self) -> CreateIssueRequest {
        CreateIssueRequest {
            title: self.title.trim().to_string(),
            description: Some(self.description.clone()),
            status: Some(self.status),
            priority: Some(self.priority),
            assignee: Some(self.assignee.trim().to_string()),
        }
    }

    fn to_update(&self) -> IssueUpdate {
        IssueUpdate {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.clone()),
            status: Some(self.status),
            priority: Some(self.priority),
            assignee: Some(self.assignee.trim().to_string()),
        }
    }
}

/// The backend call a submission requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    /// `POST /issues`.
    Create(CreateIssueRequest),
    /// `PUT /issues/{id}`.
    Update { id: String, update: IssueUpdate },
}

/// The create/edit issue form.
#[derive(Debug)]
pub struct FormView {
    /// Create or edit.
    mode: FormMode,
    /// The values being edited.
    draft: IssueDraft,
    /// Sequence number of the submission in flight.
    in_flight: Option<u64>,
    /// The error of the last failed submission.
    error: Option<ApiError>,
    /// The issue returned by a successful submission.
    saved: Option<Issue>,
}

impl FormView {
    /// Open the form for a mode.
    ///
    /// Edit mode copies all five editable fields from the issue.
    pub fn new(mode: FormMode) -> Self {
        let draft = match &mode {
            FormMode::Create => IssueDraft::default(),
            FormMode::Edit(issue) => IssueDraft::from_issue(issue),
        };
        Self {
            mode,
            draft,
            in_flight: None,
            error: None,
            saved: None,
        }
    }

    /// Open an empty form for creating an issue.
    pub fn create() -> Self {
        Self::new(FormMode::Create)
    }

    /// Open the form for editing an issue.
    pub fn edit(issue: Issue) -> Self {
        Self::new(FormMode::Edit(issue))
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &IssueDraft {
        &self.draft
    }

    /// Mutable access to the draft.
    ///
    /// Returns `None` while a submission is in flight.
    pub fn draft_mut(&mut self) -> Option<&mut IssueDraft> {
        if self.is_submitting() {
            None
        } else {
            Some(&mut self.draft)
        }
    }

    /// Check if a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Check if `seq` is the submission this form is waiting for.
    pub fn is_awaiting(&self, seq: u64) -> bool {
        self.in_flight == Some(seq)
    }

    /// Check if the submit action is currently enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && self.draft.validate().is_ok()
    }

    /// The error of the last failed submission.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// A user-facing message for the last failed submission.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ApiError::user_message)
    }

    /// The issue saved by the last successful submission.
    pub fn saved(&self) -> Option<&Issue> {
        self.saved.as_ref()
    }

    /// Dialog title.
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create New Issue",
            FormMode::Edit(_) => "Edit Issue",
        }
    }

    /// Label of the submit action.
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create",
            FormMode::Edit(_) => "Update",
        }
    }

    /// Validate the draft and start a submission tagged with `seq`.
    ///
    /// Returns `Ok(None)` if a submission is already in flight. A validation
    /// failure leaves the form untouched and produces no request.
    pub fn submit(&mut self, seq: u64) -> Result<Option<SubmitRequest>, ValidationError> {
        if self.is_submitting() {
            debug!("Submission already in flight, ignoring submit");
            return Ok(None);
        }

        self.draft.validate()?;

        let request = match &self.mode {
            FormMode::Create => SubmitRequest::Create(self.draft.to_create_request()),
            FormMode::Edit(issue) => SubmitRequest::Update {
                id: issue.id.clone(),
                update: self.draft.to_update(),
            },
        };

        self.in_flight = Some(seq);
        self.error = None;
        Ok(Some(request))
    }

    /// Finish submission `seq` with the backend's result.
    ///
    /// Returns the saved issue on success. On failure the draft is kept as
    /// entered and submission is enabled again. A result for any other
    /// submission is ignored and leaves the form untouched.
    pub fn complete(&mut self, seq: u64, result: Result<Issue, ApiError>) -> Option<Issue> {
        if !self.is_awaiting(seq) {
            debug!(seq, in_flight = ?self.in_flight, "Ignoring result of another submission");
            return None;
        }

        self.in_flight = None;
        match result {
            Ok(issue) => {
                debug!(issue_id = %issue.id, "Form submission succeeded");
                if let FormMode::Edit(original) = &mut self.mode {
                    *original = issue.clone();
                }
                self.error = None;
                self.saved = Some(issue.clone());
                Some(issue)
            }
            Err(e) => {
                warn!("Form submission failed: {}", e);
                self.error = Some(e);
                None
            }
        }
    }

    /// Dismiss the form without saving.
    pub fn cancel(self) -> FormOutcome {
        debug!(in_flight = ?self.in_flight, "Form cancelled");
        FormOutcome::Cancelled
    }

    /// Render the form as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title());
        if let FormMode::Edit(issue) = &self.mode {
            let _ = writeln!(out, "ID:          {}", issue.id);
        }
        let _ = writeln!(out, "Title:       {}", self.draft.title);
        let _ = writeln!(out, "Description: {}", self.draft.description);
        let _ = writeln!(out, "Status:      {}", self.draft.status.label());
        let _ = writeln!(out, "Priority:    {}", self.draft.priority.label());
        let _ = writeln!(out, "Assignee:    {}", self.draft.assignee);

        if let Err(e) = self.draft.validate() {
            let _ = writeln!(out, "! {}", e);
        }
        if let Some(msg) = self.error_message() {
            let _ = writeln!(out, "Error: {}", msg);
        }
        if self.is_submitting() {
            out.push_str("Saving...\n");
        }
        out
    }
}
