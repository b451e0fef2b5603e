use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use ocrpanel_io::RealtimeChannel;
use ocrpanel_types::{AppEvent, UiCommand};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::{feed_commands, spawn_stdin_reader, tick_io};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    /// Server pushes, user commands and ticks, all consumed by the event loop
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(256), // screenshot/OCR bursts
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// How the panel is driven
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Realtime channel plus commands read from stdin
    Interactive,
    /// Run the given commands over REST, then quit
    OneShot(Vec<UiCommand>),
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self, mode: Mode) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();
        let config = &self.state.config;

        let (handle, channel) = RealtimeChannel::new(
            config.realtime.url(&config.network),
            config.realtime.reconnect_initial(),
            config.realtime.reconnect_max(),
            self.channels.events.0.clone(),
        );

        let interactive = mode == Mode::Interactive;

        // Event loop; everything else winds down once it is gone
        let event_loop = event_loop(
            self.state.clone(),
            self.channels.events.1.clone(),
            handle,
            self.cancel_token.clone(),
            interactive,
        );
        let guard = self.cancel_token.clone().drop_guard();
        tasks.spawn(async move {
            let _guard = guard;
            event_loop.await
        });

        // Notification expiry
        tasks.spawn(tick_io(
            config.ui.tick(),
            self.cancel_token.child_token(),
            self.channels.events.0.clone(),
        ));

        match mode {
            Mode::Interactive => {
                if config.realtime.enabled {
                    tasks.spawn(channel.run(self.cancel_token.child_token()));
                } else {
                    tracing::warn!("Realtime channel disabled, live updates need manual refresh");
                }
                spawn_stdin_reader(self.channels.events.0.clone_sync());
            }
            Mode::OneShot(commands) => {
                tasks.spawn(feed_commands(commands, self.channels.events.0.clone()));
            }
        }

        tasks
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
