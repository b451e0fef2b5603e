use std::io::BufRead;
use std::time::Duration;

use kanal::{AsyncSender, Sender};
use ocrpanel_types::{AppEvent, UiCommand};
use tokio_util::sync::CancellationToken;

use crate::command::{self, HELP, Input};

/// Periodic tick so expired notifications disappear without user input
pub async fn tick_io(
    period: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if event_tx.send(AppEvent::Tick).await.is_err() {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Queue fixed commands followed by a quit
pub async fn feed_commands(
    commands: Vec<UiCommand>,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    for command in commands.into_iter().chain(std::iter::once(UiCommand::Quit)) {
        event_tx.send(AppEvent::Command(command)).await?;
    }
    Ok(())
}

/// Read commands from stdin on a plain thread.
///
/// A blocking read would hold up runtime shutdown, so this stays off the
/// runtime and simply dies with the process.
pub fn spawn_stdin_reader(event_tx: Sender<AppEvent>) {
    let spawned = std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {e}");
                        break;
                    }
                };

                let command = match command::parse(&line) {
                    Ok(Input::Command(command)) => command,
                    Ok(Input::Help) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(Input::Empty) => continue,
                    Err(e) => {
                        println!("{e:#}");
                        continue;
                    }
                };

                if event_tx.send(AppEvent::Command(command)).is_err() {
                    return;
                }
            }

            tracing::info!("stdin closed");
            let _ = event_tx.send(AppEvent::Command(UiCommand::Quit));
        });

    if let Err(e) = spawned {
        tracing::error!("Failed to spawn stdin reader: {e}");
    }
}
