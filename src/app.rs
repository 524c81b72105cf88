//! Main application state.
//!
//! This module follows The Elm Architecture (TEA): [`App`] is the model,
//! its event methods are the updates, and results of background work arrive
//! as [`ApiMessage`]s handled by [`App::handle_message`]. Views render the
//! model.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::types::{
    HealthStatus, Issue, IssuesQuery, Priority, SortField, SortOrder, Status,
};
use crate::api::{ApiError, IssueClient};
use crate::config::Settings;
use crate::error::ValidationError;
use crate::tasks::{ApiMessage, TaskSpawner};
use crate::ui::{
    DetailRequest, DetailView, FetchRequest, FormMode, FormView, ListView, NotificationManager,
    RequestSequence,
};

pub use crate::ui::FormOutcome;

/// The current screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Displaying the list of issues.
    #[default]
    IssueList,
    /// Displaying details of a single issue.
    IssueDetail,
    /// The create/edit form is open.
    IssueForm,
}

/// The main application struct that holds all state.
pub struct App {
    /// The current screen.
    state: AppState,
    /// The screen to return to when the form closes.
    form_return_state: AppState,
    /// Backend client shared with spawned tasks.
    client: IssueClient,
    /// Spawner for background requests.
    spawner: TaskSpawner,
    /// The issue list view.
    list_view: ListView,
    /// The issue detail view.
    detail_view: DetailView,
    /// The open create/edit form.
    form: Option<FormView>,
    /// How the last form was closed.
    form_outcome: Option<FormOutcome>,
    /// Sequence numbers for form submissions, shared by all forms.
    save_sequence: RequestSequence,
    /// Last known backend health.
    health: Option<HealthStatus>,
    /// Messages for the user.
    notifications: NotificationManager,
    /// Number of spawned tasks whose message has not been handled yet.
    pending_tasks: usize,
}

impl App {
    /// Create a new application with default list settings.
    pub fn new(client: IssueClient, spawner: TaskSpawner) -> Self {
        Self::with_settings(client, spawner, &Settings::default())
    }

    /// Create a new application whose list starts from the given settings.
    pub fn with_settings(client: IssueClient, spawner: TaskSpawner, settings: &Settings) -> Self {
        debug!(base_url = %client.base_url(), "Creating application state");
        Self {
            state: AppState::IssueList,
            form_return_state: AppState::IssueList,
            client,
            spawner,
            list_view: ListView::with_settings(settings),
            detail_view: DetailView::new(),
            form: None,
            form_outcome: None,
            save_sequence: RequestSequence::default(),
            health: None,
            notifications: NotificationManager::new(),
            pending_tasks: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn list_view(&self) -> &ListView {
        &self.list_view
    }

    pub fn detail_view(&self) -> &DetailView {
        &self.detail_view
    }

    pub fn form(&self) -> Option<&FormView> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormView> {
        self.form.as_mut()
    }

    /// Take how the last form was closed, if it was.
    pub fn take_form_outcome(&mut self) -> Option<FormOutcome> {
        self.form_outcome.take()
    }

    pub fn health(&self) -> Option<&HealthStatus> {
        self.health.as_ref()
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationManager {
        &mut self.notifications
    }

    /// Number of background requests still outstanding.
    pub fn pending_tasks(&self) -> usize {
        self.pending_tasks
    }

    /// Check if no background request is outstanding.
    pub fn is_idle(&self) -> bool {
        self.pending_tasks == 0
    }

    // ========================================================================
    // List events
    // ========================================================================

    /// Fetch the list with the current query.
    pub fn refresh_list(&mut self) {
        let request = self.list_view.refresh();
        self.dispatch_fetch(request);
    }

    pub fn search_changed(&mut self, search: &str) {
        let request = self.list_view.search_changed(search);
        self.dispatch_fetch(request);
    }

    pub fn status_filter_changed(&mut self, status: Option<Status>) {
        let request = self.list_view.status_filter_changed(status);
        self.dispatch_fetch(request);
    }

    pub fn priority_filter_changed(&mut self, priority: Option<Priority>) {
        let request = self.list_view.priority_filter_changed(priority);
        self.dispatch_fetch(request);
    }

    pub fn assignee_filter_changed(&mut self, assignee: &str) {
        let request = self.list_view.assignee_filter_changed(assignee);
        self.dispatch_fetch(request);
    }

    pub fn sort_changed(&mut self, sort_by: SortField, sort_order: SortOrder) {
        let request = self.list_view.sort_changed(sort_by, sort_order);
        self.dispatch_fetch(request);
    }

    pub fn clear_filters(&mut self) {
        let request = self.list_view.clear_filters();
        self.dispatch_fetch(request);
    }

    /// Replace the whole list query and fetch it.
    pub fn query_changed(&mut self, query: IssuesQuery) {
        let request = self.list_view.query_changed(query);
        self.dispatch_fetch(request);
    }

    pub fn page_changed(&mut self, page: u32, page_size: u32) {
        let request = self.list_view.page_changed(page, page_size);
        self.dispatch_fetch(request);
    }

    /// Go to the next page. Returns `false` if already on the last page.
    pub fn next_page(&mut self) -> bool {
        match self.list_view.next_page() {
            Some(request) => {
                self.dispatch_fetch(request);
                true
            }
            None => false,
        }
    }

    /// Go to the previous page. Returns `false` if already on the first page.
    pub fn previous_page(&mut self) -> bool {
        match self.list_view.previous_page() {
            Some(request) => {
                self.dispatch_fetch(request);
                true
            }
            None => false,
        }
    }

    fn dispatch_fetch(&mut self, request: FetchRequest) {
        debug!(seq = request.seq, page = request.query.page, "Dispatching issue list fetch");
        self.pending_tasks += 1;
        self.spawner
            .spawn_fetch_issues(&self.client, request.seq, request.query);
    }

    // ========================================================================
    // Detail events
    // ========================================================================

    /// Navigate to the detail view of an issue.
    pub fn open_issue(&mut self, id: &str) {
        let DetailRequest { seq, id } = self.detail_view.load(id);
        self.state = AppState::IssueDetail;
        self.pending_tasks += 1;
        self.spawner.spawn_fetch_issue(&self.client, seq, id);
    }

    /// Navigate back to the list.
    pub fn back_to_list(&mut self) {
        self.state = AppState::IssueList;
    }

    // ========================================================================
    // Form events
    // ========================================================================

    /// Open the form in create mode.
    pub fn open_create_form(&mut self) {
        self.open_form(FormMode::Create);
    }

    /// Open the form in edit mode for an issue.
    pub fn open_edit_form(&mut self, issue: Issue) {
        self.open_form(FormMode::Edit(issue));
    }

    /// Open the form in edit mode for the issue shown in the detail view.
    ///
    /// Returns `false` if no issue is loaded.
    pub fn edit_current_issue(&mut self) -> bool {
        match self.detail_view.issue().cloned() {
            Some(issue) => {
                self.open_edit_form(issue);
                true
            }
            None => false,
        }
    }

    fn open_form(&mut self, mode: FormMode) {
        if self.state != AppState::IssueForm {
            self.form_return_state = self.state;
        }
        self.form = Some(FormView::new(mode));
        self.form_outcome = None;
        self.state = AppState::IssueForm;
    }

    /// Submit the open form.
    ///
    /// Returns `Ok(true)` if a request was sent, `Ok(false)` if there is no
    /// form or a submission is already in flight. Validation failures send
    /// nothing.
    pub fn submit_form(&mut self) -> Result<bool, ValidationError> {
        let Some(form) = self.form.as_mut() else {
            return Ok(false);
        };

        let seq = self.save_sequence.next();
        match form.submit(seq)? {
            Some(request) => {
                self.pending_tasks += 1;
                self.spawner.spawn_submit(&self.client, seq, request);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Close the form without saving.
    pub fn cancel_form(&mut self) {
        if let Some(form) = self.form.take() {
            self.form_outcome = Some(form.cancel());
            self.state = self.form_return_state;
        }
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Ask the backend for its health status.
    pub fn check_health(&mut self) {
        self.pending_tasks += 1;
        self.spawner.spawn_health_check(&self.client);
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Apply the result of a background request.
    pub fn handle_message(&mut self, message: ApiMessage) {
        self.pending_tasks = self.pending_tasks.saturating_sub(1);

        match message {
            ApiMessage::IssuesFetched { seq, result } => {
                if self.list_view.apply_response(seq, result) {
                    if let Some(error) = self.list_view.error() {
                        let error = format!("Error loading issues: {}", error);
                        self.notifications.error(error);
                    }
                }
            }
            ApiMessage::IssueFetched { seq, result } => {
                if self.detail_view.apply_response(seq, result) {
                    if let Some(error) = self.detail_view.error() {
                        let error = format!("Error loading issue: {}", error);
                        self.notifications.error(error);
                    }
                }
            }
            ApiMessage::IssueSaved { seq, result } => self.handle_issue_saved(seq, result),
            ApiMessage::HealthChecked(result) => match result {
                Ok(health) => {
                    info!(status = %health.status, "Backend health checked");
                    self.health = Some(health);
                }
                Err(e) => {
                    warn!("Health check failed: {}", e);
                    self.health = None;
                    self.notifications
                        .error(format!("Health check failed: {}", e.user_message()));
                }
            },
        }
    }

    fn handle_issue_saved(&mut self, seq: u64, result: Result<Issue, ApiError>) {
        let awaited = self.form.as_ref().is_some_and(|form| form.is_awaiting(seq));
        if !awaited {
            // The submitting form was cancelled while the request was in flight.
            match result {
                Ok(issue) => {
                    debug!(seq, issue_id = %issue.id, "Save finished after its form closed");
                    self.refresh_list();
                }
                Err(e) => warn!(seq, "Save failed after its form closed: {}", e),
            }
            return;
        }
        let Some(form) = self.form.as_mut() else {
            return;
        };

        let created = matches!(form.mode(), FormMode::Create);
        match form.complete(seq, result) {
            Some(issue) => {
                let verb = if created { "created" } else { "updated" };
                self.notifications
                    .success(format!("Issue {}: {}", verb, issue.title));

                if self.form_return_state == AppState::IssueDetail
                    || self.detail_view.requested_id() == Some(issue.id.as_str())
                {
                    self.detail_view.set_issue(issue.clone());
                }

                self.form = None;
                self.form_outcome = Some(FormOutcome::Saved(issue));
                self.state = self.form_return_state;
                self.refresh_list();
            }
            None => {
                if let Some(message) = form.error_message() {
                    self.notifications
                        .error(format!("Error saving issue: {}", message));
                }
            }
        }
    }

    /// Handle messages until no background request is outstanding.
    pub async fn run_until_idle(&mut self, rx: &mut mpsc::UnboundedReceiver<ApiMessage>) {
        while !self.is_idle() {
            match rx.recv().await {
                Some(message) => self.handle_message(message),
                None => break,
            }
        }
    }

    /// Render the current screen as text.
    pub fn render(&self) -> String {
        match self.state {
            AppState::IssueList => self.list_view.render(),
            AppState::IssueDetail => self.detail_view.render(),
            AppState::IssueForm => self
                .form
                .as_ref()
                .map(FormView::render)
                .unwrap_or_default(),
        }
    }
}
