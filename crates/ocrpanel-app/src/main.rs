use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod command;
pub mod controller;
pub mod events;
pub mod io;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::command::Input;
use self::controller::{AppController, Mode};
use self::state::AppState;

/// Terminal control panel for a remote OCR macro server
#[derive(Parser, Debug)]
#[command(name = "ocrpanel")]
#[command(about = "Control panel for a remote OCR macro server")]
struct Args {
    /// Server base URL, e.g. http://192.168.1.20:5000
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,

    /// JSON config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run one command over REST and exit, e.g. `ocrpanel keyword add Glitched`
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    command: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = ocrpanel_config::Config::load(args.config.as_deref())?;
    if let Some(server) = args.server {
        config.network.server_url = server;
    }
    tracing::info!("Using server {}", config.network.base_url());

    let mode = if args.command.is_empty() {
        Mode::Interactive
    } else {
        match command::parse(&args.command.join(" "))? {
            Input::Command(command) => Mode::OneShot(vec![command]),
            Input::Help | Input::Empty => {
                println!("{}", command::HELP);
                return Ok(());
            }
        }
    };

    let state = Arc::new(AppState::new(config)?);
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(mode);
    let cancel = controller.cancel_token();

    let drain = async {
        while let Some(result) = tasks.join_next().await {
            log_task_exit(result);
        }
    };

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("failed to listen for ctrl+c")?;
            tracing::info!("Shutdown requested");
        }
        _ = cancel.cancelled() => {}
        _ = drain => {}
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        log_task_exit(result);
    }

    Ok(())
}

fn log_task_exit(result: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => tracing::debug!("task exited"),
        Ok(Err(e)) => tracing::error!("task failed: {e:#}"),
        Err(e) => tracing::error!("task panicked: {e}"),
    }
}

/// Human readable logs on a terminal, JSON lines otherwise. Logs go to
/// stderr; stdout belongs to the panel.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if atty::is(atty::Stream::Stderr) {
        builder.with_target(false).init();
    } else {
        builder.json().init();
    }
}
