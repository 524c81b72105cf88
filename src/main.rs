//! LazyIssues - a terminal client for a REST issue tracker.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use lazyissues::api::IssueClient;
use lazyissues::app::App;
use lazyissues::cli::{self, Cli, Command};
use lazyissues::config::Config;
use lazyissues::error::AppError;
use lazyissues::{logging, output, tasks};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();

    // Logging is best-effort; the commands work without a log file.
    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let result = run(&args).await;
    logging::shutdown();

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("Command failed: {}", e);
            output::write_error(&e, &mut io::stderr())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(args: &Cli) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = &args.url {
        config.settings.base_url = url.clone();
        config.validate()?;
    }
    info!(base_url = %config.settings.base_url, "Configuration loaded");

    if let Command::Init { force } = &args.command {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => Config::config_path()?,
        };
        return cli::init_config(&config, &path, *force, &mut io::stdout());
    }

    let client = IssueClient::new(&config.settings)?;
    let (mut rx, spawner) = tasks::create_task_channel();
    let mut app = App::with_settings(client, spawner, &config.settings);

    let result = cli::execute(&args.command, &mut app, &mut rx, &mut io::stdout()).await;
    output::write_notifications(app.notifications_mut(), false, &mut io::stderr())?;
    result
}
