//! Async task management for non-blocking API operations.
//!
//! Backend calls run in background tasks so the owner of the application
//! state never awaits inline. Results come back through a channel.
//!
//! # Architecture
//!
//! 1. An event on [`crate::app::App`] produces a request from one of the views
//! 2. The app hands the request to [`TaskSpawner`], which spawns a tokio task
//! 3. When the task completes, it sends an [`ApiMessage`] through the channel
//! 4. The owner receives the message and passes it to `App::handle_message`
//!
//! List and detail messages carry the sequence number of the request that
//! produced them, so the views can drop responses that were superseded.

use tokio::sync::mpsc;
use tracing::trace;

use crate::api::types::{HealthStatus, Issue, IssuesQuery, IssuesResponse};
use crate::api::{ApiError, IssueClient};
use crate::ui::SubmitRequest;

/// Messages sent from background tasks to the application.
#[derive(Debug)]
pub enum ApiMessage {
    /// Issue list results.
    IssuesFetched {
        seq: u64,
        result: Result<IssuesResponse, ApiError>,
    },

    /// A single issue for the detail view.
    IssueFetched {
        seq: u64,
        result: Result<Issue, ApiError>,
    },

    /// Result of a form submission.
    IssueSaved {
        seq: u64,
        result: Result<Issue, ApiError>,
    },

    /// Result of a health check.
    HealthChecked(Result<HealthStatus, ApiError>),
}

/// Spawns background tasks for async operations.
///
/// Each method clones the client and spawns a tokio task that sends its
/// result through the channel. Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task to fetch a page of issues.
    pub fn spawn_fetch_issues(&self, client: &IssueClient, seq: u64, query: IssuesQuery) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.list_issues(&query).await;
            trace!(seq, ok = result.is_ok(), "Issue list task finished");
            let _ = tx.send(ApiMessage::IssuesFetched { seq, result });
        });
    }

    /// Spawn a task to fetch a single issue.
    pub fn spawn_fetch_issue(&self, client: &IssueClient, seq: u64, id: String) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.get_issue(&id).await;
            let _ = tx.send(ApiMessage::IssueFetched { seq, result });
        });
    }

    /// Spawn a task to run form submission `seq`.
    pub fn spawn_submit(&self, client: &IssueClient, seq: u64, request: SubmitRequest) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = match &request {
                SubmitRequest::Create(create) => client.create_issue(create).await,
                SubmitRequest::Update { id, update } => client.update_issue(id, update).await,
            };
            let _ = tx.send(ApiMessage::IssueSaved { seq, result });
        });
    }

    /// Spawn a task to check backend health.
    pub fn spawn_health_check(&self, client: &IssueClient) {
        let tx = self.tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            let result = client.check_health().await;
            let _ = tx.send(ApiMessage::HealthChecked(result));
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be drained
/// by the owner of the application state.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}
