//! Command-line interface.
//!
//! Each subcommand drives [`App`] through the same events an interactive
//! front end would use, waits for the background requests to finish and
//! writes the resulting view.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::types::{Issue, IssuesQuery, Priority, SortField, SortOrder, Status};
use crate::app::{App, FormOutcome};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::tasks::ApiMessage;
use crate::ui::{DetailView, IssueDraft};

#[derive(Parser, Debug)]
#[command(name = "lazyissues", version)]
#[command(about = "Browse, create and edit issues on a REST issue tracker")]
pub struct Cli {
    /// Backend base URL, overriding the config file and LAZYISSUES_URL.
    #[arg(long, global = true)]
    pub url: Option<String>,
    /// Path to an alternative config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List issues with optional filters.
    List(ListArgs),
    /// Show a single issue.
    Show {
        id: String,
        /// Print the issue as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Create a new issue.
    Create(CreateArgs),
    /// Edit an existing issue.
    Edit(EditArgs),
    /// Check the backend health.
    Health,
    /// Write the effective configuration to the config file.
    Init {
        /// Overwrite an existing config file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Match against title and description.
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Match against the assignee.
    #[arg(long)]
    pub assignee: Option<String>,
    #[arg(long = "sort-by")]
    pub sort_by: Option<SortField>,
    #[arg(long = "order")]
    pub order: Option<SortOrder>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,
    #[arg(long = "page-size", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,
}

impl ListArgs {
    /// Build the list query, keeping `base` for anything not given.
    ///
    /// Filters are not inherited: an absent flag means no filter.
    pub fn to_query(&self, base: &IssuesQuery) -> IssuesQuery {
        IssuesQuery {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(base.page_size),
            search: self.search.clone(),
            status: self.status,
            priority: self.priority,
            assignee: self.assignee.clone(),
            sort_by: self.sort_by.or(base.sort_by),
            sort_order: self.order.or(base.sort_order),
        }
    }
}

/// Issue fields shared by `create` and `edit`.
#[derive(Args, Debug, Default)]
pub struct IssueFields {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<Status>,
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Assignee; pass an empty string to unassign.
    #[arg(long)]
    pub assignee: Option<String>,
}

impl IssueFields {
    /// Overwrite the draft fields that were given.
    pub fn apply(&self, draft: &mut IssueDraft) {
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(assignee) = &self.assignee {
            draft.assignee = assignee.clone();
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[command(flatten)]
    pub fields: IssueFields,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[command(flatten)]
    pub fields: IssueFields,
}

/// Run a command to completion, writing its result to `out`.
///
/// Failures reported by the views are returned as errors; notifications
/// stay on the app for the caller to print.
///
/// `init` needs no backend and is run through [`init_config`] instead.
pub async fn execute(
    command: &Command,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<ApiMessage>,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::List(args) => {
            let query = args.to_query(app.list_view().query());
            debug!(?query, "Listing issues");
            app.query_changed(query);
            app.run_until_idle(rx).await;

            if let Some(error) = app.list_view().error() {
                return Err(AppError::other(error));
            }
            write!(out, "{}", app.list_view().render())?;
        }
        Command::Show { id, json } => {
            load_issue(app, rx, id).await?;
            match app.detail_view().issue_json().filter(|_| *json) {
                Some(json) => writeln!(out, "{}", json)?,
                None => write!(out, "{}", app.detail_view().render())?,
            }
        }
        Command::Create(args) => {
            app.open_create_form();
            if let Some(draft) = app.form_mut().and_then(|form| form.draft_mut()) {
                draft.title = args.title.clone();
                args.fields.apply(draft);
            }
            let issue = submit_form(app, rx).await?;
            info!(issue_id = %issue.id, "Issue created");

            writeln!(out, "Created issue {}", issue.id)?;
            let mut view = DetailView::new();
            view.set_issue(issue);
            write!(out, "{}", view.render())?;
        }
        Command::Edit(args) => {
            load_issue(app, rx, &args.id).await?;
            app.edit_current_issue();
            if let Some(draft) = app.form_mut().and_then(|form| form.draft_mut()) {
                if let Some(title) = &args.title {
                    draft.title = title.clone();
                }
                args.fields.apply(draft);
            }
            let issue = submit_form(app, rx).await?;
            info!(issue_id = %issue.id, "Issue updated");

            writeln!(out, "Updated issue {}", issue.id)?;
            write!(out, "{}", app.detail_view().render())?;
        }
        Command::Health => {
            app.check_health();
            app.run_until_idle(rx).await;

            let Some(health) = app.health() else {
                return Err(last_error(app, "Health check failed"));
            };
            writeln!(out, "Backend status: {}", health.status)?;
            if !health.is_ok() {
                return Err(AppError::other(format!(
                    "Backend reported status '{}'",
                    health.status
                )));
            }
        }
        Command::Init { .. } => {
            return Err(AppError::other("'init' writes the config file and takes no backend"));
        }
    }

    Ok(())
}

async fn load_issue(
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<ApiMessage>,
    id: &str,
) -> Result<()> {
    app.open_issue(id);
    app.run_until_idle(rx).await;

    if let Some(error) = app.detail_view().error() {
        return Err(AppError::other(error));
    }
    if app.detail_view().issue().is_none() {
        return Err(AppError::other(format!("Issue '{}' not found", id)));
    }
    Ok(())
}

async fn submit_form(
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<ApiMessage>,
) -> Result<Issue> {
    app.submit_form()?;
    app.run_until_idle(rx).await;

    match app.take_form_outcome() {
        Some(FormOutcome::Saved(issue)) => Ok(issue),
        _ => {
            let message = app
                .form()
                .and_then(|form| form.error_message())
                .unwrap_or_else(|| "The issue was not saved".to_string());
            Err(AppError::other(message))
        }
    }
}

/// Write `config` to `path`.
///
/// An existing file is only replaced when `force` is set.
pub fn init_config(config: &Config, path: &Path, force: bool, out: &mut dyn Write) -> Result<()> {
    if path.exists() && !force {
        return Err(AppError::other(format!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        )));
    }

    config.save_to(path)?;
    writeln!(out, "Wrote {}", path.display())?;
    Ok(())
}

/// The newest error notification, or `fallback` if there is none.
fn last_error(app: &App, fallback: &str) -> AppError {
    let message = app
        .notifications()
        .last_error()
        .map(|n| n.message.clone())
        .unwrap_or_else(|| fallback.to_string());
    AppError::other(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_with_filters() {
        let cli = Cli::try_parse_from([
            "lazyissues",
            "list",
            "--status",
            "in_progress",
            "--priority",
            "high",
            "--sort-by",
            "createdAt",
            "--order",
            "asc",
            "--page-size",
            "25",
        ])
        .unwrap();

        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.status, Some(Status::InProgress));
        assert_eq!(args.priority, Some(Priority::High));
        assert_eq!(args.sort_by, Some(SortField::CreatedAt));
        assert_eq!(args.order, Some(SortOrder::Asc));
        assert_eq!(args.page_size, Some(25));
    }

    #[test]
    fn test_parse_rejects_invalid_status() {
        let result = Cli::try_parse_from(["lazyissues", "list", "--status", "done"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_zero_page() {
        let result = Cli::try_parse_from(["lazyissues", "list", "--page", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_url_flag() {
        let cli = Cli::try_parse_from(["lazyissues", "health", "--url", "http://tracker:8080"])
            .unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://tracker:8080"));
        assert!(matches!(cli.command, Command::Health));
    }

    #[test]
    fn test_create_requires_title() {
        assert!(Cli::try_parse_from(["lazyissues", "create"]).is_err());

        let cli = Cli::try_parse_from([
            "lazyissues",
            "create",
            "--title",
            "Bug",
            "--assignee",
            "jane@example.com",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create command");
        };
        assert_eq!(args.title, "Bug");
        assert_eq!(args.fields.assignee.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn test_show_json_flag() {
        let cli = Cli::try_parse_from(["lazyissues", "show", "abc123", "--json"]).unwrap();
        match cli.command {
            Command::Show { id, json } => {
                assert_eq!(id, "abc123");
                assert!(json);
            }
            other => panic!("expected show command, got {:?}", other),
        }
    }

    #[test]
    fn test_list_args_to_query() {
        let base = IssuesQuery {
            page: 4,
            page_size: 25,
            search: Some("old".to_string()),
            ..IssuesQuery::default()
        };
        let args = ListArgs {
            status: Some(Status::Open),
            ..ListArgs::default()
        };

        let query = args.to_query(&base);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 25);
        assert_eq!(query.search, None);
        assert_eq!(query.status, Some(Status::Open));
        assert_eq!(query.sort_by, Some(SortField::UpdatedAt));
    }

    #[test]
    fn test_parse_init() {
        let cli = Cli::try_parse_from(["lazyissues", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Command::Init { force: true }));
    }

    #[test]
    fn test_init_config_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lazyissues").join("config.toml");
        let mut config = Config::default();
        config.settings.base_url = "https://issues.example.com".to_string();

        let mut out = Vec::new();
        init_config(&config, &path, false, &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().starts_with("Wrote "));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("https://issues.example.com"));
    }

    #[test]
    fn test_init_config_keeps_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        let mut out = Vec::new();
        let err = init_config(&Config::default(), &path, false, &mut out).unwrap_err();
        assert!(err.user_message().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        init_config(&Config::default(), &path, true, &mut out).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("base_url"));
    }

    #[test]
    fn test_issue_fields_apply_only_given() {
        let mut draft = IssueDraft {
            title: "Keep".to_string(),
            description: "Keep too".to_string(),
            ..IssueDraft::default()
        };
        let fields = IssueFields {
            status: Some(Status::Closed),
            assignee: Some(String::new()),
            ..IssueFields::default()
        };

        fields.apply(&mut draft);
        assert_eq!(draft.title, "Keep");
        assert_eq!(draft.description, "Keep too");
        assert_eq!(draft.status, Status::Closed);
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.assignee, "");
    }
}
