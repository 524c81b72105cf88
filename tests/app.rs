//! End-to-end tests of the application state against a stub backend.

mod common;

use std::time::Duration;

use clap::Parser;
use common::{issue_json, issues_page_json, StubResponse, StubServer};
use lazyissues::api::{IssueClient, Status};
use lazyissues::app::{App, AppState, FormOutcome};
use lazyissues::cli::{self, Cli};
use lazyissues::error::ValidationError;
use lazyissues::tasks::{create_task_channel, ApiMessage};
use serde_json::json;
use tokio::sync::mpsc;

fn create_app(url: &str) -> (App, mpsc::UnboundedReceiver<ApiMessage>) {
    let (rx, spawner) = create_task_channel();
    let client = IssueClient::with_base_url(url).unwrap();
    (App::new(client, spawner), rx)
}

#[tokio::test]
async fn test_stale_list_response_is_discarded() {
    let server = StubServer::start(|request| {
        let search = request.query_param("search").unwrap_or_default();
        let page = issues_page_json(
            vec![issue_json("1", &format!("result for {}", search), "open")],
            1,
            10,
            1,
        );
        let response = StubResponse::json(200, page);
        if search == "a" {
            response.delayed(Duration::from_millis(300))
        } else {
            response
        }
    })
    .await;
    let (mut app, mut rx) = create_app(&server.url());

    app.search_changed("a");
    app.search_changed("b");
    app.run_until_idle(&mut rx).await;

    assert_eq!(server.requests().len(), 2);
    assert_eq!(app.list_view().issues()[0].title, "result for b");
    assert_eq!(app.list_view().query().search.as_deref(), Some("b"));
    assert!(!app.list_view().is_loading());
}

#[tokio::test]
async fn test_filter_change_resets_page() {
    let server = StubServer::start(|request| {
        let page: u32 = request.query_param("page").unwrap().parse().unwrap();
        StubResponse::json(200, issues_page_json(Vec::new(), page, 10, 30))
    })
    .await;
    let (mut app, mut rx) = create_app(&server.url());

    app.page_changed(3, 10);
    app.run_until_idle(&mut rx).await;
    app.status_filter_changed(Some(Status::Closed));
    app.run_until_idle(&mut rx).await;

    let requests = server.requests();
    assert_eq!(requests[0].query_param("page").as_deref(), Some("3"));
    assert_eq!(requests[1].query_param("page").as_deref(), Some("1"));
    assert_eq!(requests[1].query_param("status").as_deref(), Some("closed"));
}

#[tokio::test]
async fn test_failed_list_keeps_previous_page() {
    let server = StubServer::start(|request| {
        if request.query_param("search").is_some() {
            StubResponse::json(500, json!({"error": "search index offline"}))
        } else {
            StubResponse::json(
                200,
                issues_page_json(vec![issue_json("1", "Kept", "open")], 1, 10, 1),
            )
        }
    })
    .await;
    let (mut app, mut rx) = create_app(&server.url());

    app.refresh_list();
    app.run_until_idle(&mut rx).await;
    app.search_changed("boom");
    app.run_until_idle(&mut rx).await;

    assert_eq!(app.list_view().issues()[0].title, "Kept");
    assert!(app.list_view().error().is_some());
    assert!(app.notifications().has_errors());
}

#[tokio::test]
async fn test_empty_title_sends_no_request() {
    let server = StubServer::start(|_| StubResponse::json(201, issue_json("x", "x", "open"))).await;
    let (mut app, _rx) = create_app(&server.url());

    app.open_create_form();
    app.form_mut().unwrap().draft_mut().unwrap().title = "   ".to_string();

    assert_eq!(app.submit_form(), Err(ValidationError::EmptyTitle));
    assert!(app.is_idle());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_create_closes_form_and_refreshes_list() {
    let server = StubServer::start(|request| match request.method.as_str() {
        "POST" => StubResponse::json(201, issue_json("abc123", "Bug", "open")),
        _ => StubResponse::json(
            200,
            issues_page_json(vec![issue_json("abc123", "Bug", "open")], 1, 10, 1),
        ),
    })
    .await;
    let (mut app, mut rx) = create_app(&server.url());

    app.open_create_form();
    app.form_mut().unwrap().draft_mut().unwrap().title = "Bug".to_string();
    assert_eq!(app.submit_form(), Ok(true));
    app.run_until_idle(&mut rx).await;

    assert_eq!(app.state(), AppState::IssueList);
    assert!(app.form().is_none());
    match app.take_form_outcome() {
        Some(FormOutcome::Saved(issue)) => assert_eq!(issue.id, "abc123"),
        other => panic!("Expected saved outcome, got {:?}", other),
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[1].path(), "/issues");
    assert_eq!(app.list_view().issues()[0].id, "abc123");
}

#[tokio::test]
async fn test_failed_update_keeps_draft() {
    let server =
        StubServer::start(|_| StubResponse::json(404, json!({"error": "Issue not found"}))).await;
    let (mut app, mut rx) = create_app(&server.url());

    let issue: lazyissues::api::Issue =
        serde_json::from_value(issue_json("x", "Original", "open")).unwrap();
    app.open_edit_form(issue);
    app.form_mut().unwrap().draft_mut().unwrap().status = Status::Closed;
    app.submit_form().unwrap();
    app.run_until_idle(&mut rx).await;

    let form = app.form().unwrap();
    assert_eq!(app.state(), AppState::IssueForm);
    assert!(!form.is_submitting());
    assert!(form.can_submit());
    assert_eq!(form.draft().title, "Original");
    assert_eq!(form.draft().status, Status::Closed);
    assert!(form.error_message().is_some());
    assert!(app.take_form_outcome().is_none());
}

#[tokio::test]
async fn test_edit_command_updates_issue() {
    let server = StubServer::start(|request| match request.method.as_str() {
        "PUT" => {
            let mut issue = issue_json("x", "Original", "open");
            issue["status"] = request.json()["status"].clone();
            StubResponse::json(200, issue)
        }
        _ if request.path() == "/issues/x" => {
            StubResponse::json(200, issue_json("x", "Original", "open"))
        }
        _ => StubResponse::json(200, issues_page_json(Vec::new(), 1, 10, 0)),
    })
    .await;
    let (mut app, mut rx) = create_app(&server.url());

    let parsed = Cli::try_parse_from(["lazyissues", "edit", "x", "--status", "closed"]).unwrap();
    let mut out = Vec::new();
    cli::execute(&parsed.command, &mut app, &mut rx, &mut out)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Updated issue x"));
    assert!(text.contains("Status:   Closed"));

    let put = server
        .requests()
        .into_iter()
        .find(|r| r.method == "PUT")
        .unwrap();
    assert_eq!(
        put.json(),
        json!({
            "title": "Original",
            "description": "",
            "status": "closed",
            "priority": "medium",
            "assignee": ""
        })
    );
}

#[tokio::test]
async fn test_show_command_reports_missing_issue() {
    let server =
        StubServer::start(|_| StubResponse::json(404, json!({"error": "Issue not found"}))).await;
    let (mut app, mut rx) = create_app(&server.url());

    let parsed = Cli::try_parse_from(["lazyissues", "show", "missing"]).unwrap();
    let mut out = Vec::new();
    let result = cli::execute(&parsed.command, &mut app, &mut rx, &mut out).await;

    assert!(result.is_err());
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_list_command_prints_footer() {
    let server = StubServer::start(|_| {
        StubResponse::json(
            200,
            issues_page_json(vec![issue_json("abc123", "Add dark mode", "open")], 1, 10, 1),
        )
    })
    .await;
    let (mut app, mut rx) = create_app(&server.url());

    let parsed = Cli::try_parse_from(["lazyissues", "list", "--search", "dark"]).unwrap();
    let mut out = Vec::new();
    cli::execute(&parsed.command, &mut app, &mut rx, &mut out)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Add dark mode"));
    assert!(text.contains("Page 1 of 1 (1 issues)"));
    assert_eq!(
        server.requests()[0].query_param("search").as_deref(),
        Some("dark")
    );
}

#[tokio::test]
async fn test_health_command_reports_unreachable_backend() {
    // Nothing listens on port 1.
    let (mut app, mut rx) = create_app("http://127.0.0.1:1");

    let parsed = Cli::try_parse_from(["lazyissues", "health"]).unwrap();
    let mut out = Vec::new();
    let error = cli::execute(&parsed.command, &mut app, &mut rx, &mut out)
        .await
        .unwrap_err();

    assert!(error.user_message().starts_with("Health check failed"));
    assert!(out.is_empty());
    assert!(app.health().is_none());
}

#[tokio::test]
async fn test_health_command_prints_status() {
    let server = StubServer::start(|_| StubResponse::json(200, json!({"status": "ok"}))).await;
    let (mut app, mut rx) = create_app(&server.url());

    let parsed = Cli::try_parse_from(["lazyissues", "health"]).unwrap();
    let mut out = Vec::new();
    cli::execute(&parsed.command, &mut app, &mut rx, &mut out)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Backend status: ok\n");
    assert_eq!(server.requests()[0].path(), "/health");
}
