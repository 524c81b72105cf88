//! Issue backend client implementation.
//!
//! This module provides the client for the issue tracker REST API. Every
//! endpoint is a single request: failures are returned to the caller as-is
//! and never retried.

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{
    CreateIssueRequest, HealthStatus, Issue, IssueUpdate, IssuesQuery, IssuesResponse,
};
use crate::config::Settings;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The issue backend client.
///
/// Cheap to clone: the underlying HTTP connection pool is shared.
#[derive(Debug, Clone)]
pub struct IssueClient {
    /// The HTTP client.
    client: Client,
    /// The backend base URL, without a trailing slash.
    base_url: String,
}

impl IssueClient {
    /// Create a new client from application settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    #[instrument(skip(settings), fields(base_url = %settings.base_url))]
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Self::with_timeout(
            &settings.base_url,
            Duration::from_secs(settings.timeout_secs),
        )?;
        info!("Issue client created");
        Ok(client)
    }

    /// Create a client for the given base URL with the default timeout.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client for the given base URL and request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client, base_url })
    }

    /// List issues matching a query.
    ///
    /// Calls `GET /issues`. Only the filters present in `query` are sent.
    #[instrument(skip(self, query), fields(page = query.page, page_size = query.page_size))]
    pub async fn list_issues(&self, query: &IssuesQuery) -> Result<IssuesResponse> {
        let pairs = query.to_query_pairs();
        debug!(?pairs, "Listing issues");

        let url = format!("{}/issues", self.base_url);
        let response: IssuesResponse = self.send(self.client.get(&url).query(&pairs)).await?;

        debug!(
            "Fetched {} issues (total: {}, pages: {})",
            response.issues.len(),
            response.pagination.total,
            response.pagination.total_pages
        );
        Ok(response)
    }

    /// Get a single issue by id.
    ///
    /// Calls `GET /issues/{id}`. A 404 is reported as `ApiError::NotFound`.
    #[instrument(skip(self), fields(issue_id = %id))]
    pub async fn get_issue(&self, id: &str) -> Result<Issue> {
        debug!("Fetching issue");

        let url = self.issue_url(id);
        let issue: Issue = self.send(self.client.get(&url)).await.map_err(|e| match e {
            ApiError::Backend { status, .. } if status == StatusCode::NOT_FOUND => {
                ApiError::NotFound(format!("Issue '{}' not found", id))
            }
            other => other,
        })?;

        debug!("Fetched issue: {}", issue.title);
        Ok(issue)
    }

    /// Create a new issue.
    ///
    /// Calls `POST /issues`. The backend assigns the id and timestamps.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_issue(&self, request: &CreateIssueRequest) -> Result<Issue> {
        debug!("Creating issue");

        let url = format!("{}/issues", self.base_url);
        let issue: Issue = self.send(self.client.post(&url).json(request)).await?;

        info!(issue_id = %issue.id, "Issue created");
        Ok(issue)
    }

    /// Update an existing issue.
    ///
    /// Calls `PUT /issues/{id}`. Any non-2xx status, including 404, is a
    /// backend error.
    #[instrument(skip(self, update), fields(issue_id = %id))]
    pub async fn update_issue(&self, id: &str, update: &IssueUpdate) -> Result<Issue> {
        debug!(?update, "Updating issue");

        let url = self.issue_url(id);
        let issue: Issue = self.send(self.client.put(&url).json(update)).await?;

        info!("Issue updated");
        Ok(issue)
    }

    /// Check backend health.
    ///
    /// Calls `GET /health`.
    #[instrument(skip(self))]
    pub async fn check_health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let health: HealthStatus = self.send(self.client.get(&url)).await?;
        debug!(status = %health.status, "Health check");
        Ok(health)
    }

    /// Build the URL for a single issue, percent-encoding the id.
    fn issue_url(&self, id: &str) -> String {
        format!("{}/issues/{}", self.base_url, urlencoding::encode(id))
    }

    /// Send a request once and parse the JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("Request failed: {}", e);
                ApiError::Network(e)
            })?;

        self.handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str::<T>(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let url = response.url().to_string();
            let error_body = response.text().await.unwrap_or_default();
            debug!(%url, %status, "Error response body: {}", error_body);

            Err(ApiError::from_status(status, error_body))
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Normalize the base URL by removing trailing slashes and checking it parses.
fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');

    let parsed = Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{}: scheme must be http or https",
            url
        )));
    }

    Ok(trimmed.to_string())
}
