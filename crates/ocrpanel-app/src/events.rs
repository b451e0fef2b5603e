use std::sync::Arc;
use std::time::Instant;

use kanal::AsyncReceiver;
use ocrpanel_core::notify::Level;
use ocrpanel_core::{EditError, PanelState, RequestSink, Section, SettingsBackend, ThemeStore};
use ocrpanel_io::ChannelHandle;
use ocrpanel_types::{AppEvent, UiCommand};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;
use crate::ui;

pub mod control;
pub mod ocr_settings;
pub mod presentation;
pub mod server_update;
pub mod webhook_settings;

use control::handle_control_command;
use ocr_settings::handle_ocr_command;
use presentation::handle_presentation_command;
use server_update::handle_server_event;
use webhook_settings::handle_webhook_command;

/// What to redraw once an event has been handled
#[derive(Debug, Clone, PartialEq)]
pub enum Render {
    Section(Section),
    Tab,
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue(Option<Render>),
    Quit,
}

/// Collaborators every handler may use. The panel state itself is passed
/// separately so only the event loop ever owns it.
pub struct EventContext<'a> {
    pub backend: &'a dyn SettingsBackend,
    pub sink: &'a dyn RequestSink,
    pub theme_store: &'a ThemeStore,
}

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    events_rx: AsyncReceiver<AppEvent>,
    sink: ChannelHandle,
    cancel: CancellationToken,
    preload: bool,
) -> anyhow::Result<()> {
    let theme = state.theme_store.load();
    let mut panel = PanelState::new(theme, state.config.ui.notification_ttl());

    let ctx = EventContext {
        backend: &state.client,
        sink: &sink,
        theme_store: &state.theme_store,
    };

    if preload {
        if let Err(e) = ocrpanel_core::editor::load_all(&mut panel, ctx.backend).await {
            report_error(&mut panel, &e);
        }
        print!("{}", ui::render_tab(&panel));
    }

    let mut last_notification = 0;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events_rx.recv() => event?,
        };

        match handle_events(&ctx, &mut panel, event).await {
            Flow::Quit => {
                tracing::info!("Quit requested");
                cancel.cancel();
                break;
            }
            Flow::Continue(render) => {
                match render {
                    Some(Render::Section(Section::Notifications)) | None => {}
                    Some(Render::Section(section)) => print!("{}", ui::render_section(&panel, section)),
                    Some(Render::Tab) => print!("{}", ui::render_tab(&panel)),
                    Some(Render::Text(text)) => println!("{text}"),
                }

                let fresh: Vec<_> = panel
                    .notifications
                    .active()
                    .iter()
                    .filter(|n| n.id > last_notification)
                    .cloned()
                    .collect();
                if let Some(newest) = fresh.last() {
                    last_notification = newest.id;
                    print!("{}", ui::render_notifications(&fresh));
                }
            }
        }
    }

    Ok(())
}

pub async fn handle_events(ctx: &EventContext<'_>, panel: &mut PanelState, event: AppEvent) -> Flow {
    let result = match event {
        AppEvent::Server(event) => Ok(handle_server_event(panel, event, Instant::now())),
        AppEvent::Tick => {
            let expired = panel.notifications.expire(Instant::now());
            if !expired.is_empty() {
                tracing::trace!("{} notifications expired", expired.len());
            }
            Ok(None)
        }
        AppEvent::Command(UiCommand::Quit) => return Flow::Quit,
        AppEvent::Command(command) => {
            tracing::debug!(">>> HANDLING COMMAND {command:?} <<<");
            handle_command(ctx, panel, command).await
        }
    };

    match result {
        Ok(render) => Flow::Continue(render),
        Err(e) => {
            report_error(panel, &e);
            Flow::Continue(Some(Render::Section(Section::Notifications)))
        }
    }
}

async fn handle_command(
    ctx: &EventContext<'_>,
    panel: &mut PanelState,
    command: UiCommand,
) -> Result<Option<Render>, EditError> {
    match command {
        UiCommand::SwitchTab(_) | UiCommand::Control(_) | UiCommand::Request(_) | UiCommand::Show => {
            handle_control_command(ctx, panel, command).await
        }
        UiCommand::LoadOcrSettings
        | UiCommand::SetOcrEnabled(_)
        | UiCommand::TakeScreenshot
        | UiCommand::SetDisplaySize(_)
        | UiCommand::SelectRegion { .. }
        | UiCommand::SaveRegion { .. }
        | UiCommand::CancelSelection
        | UiCommand::DeleteRegion(_)
        | UiCommand::VerifyTesseract
        | UiCommand::ShowHighlights => handle_ocr_command(ctx, panel, command).await,
        UiCommand::LoadWebhookSettings
        | UiCommand::EditWebhook(_)
        | UiCommand::SaveWebhook
        | UiCommand::AddKeyword(_)
        | UiCommand::DeleteKeyword(_)
        | UiCommand::SetKeywordFlag { .. }
        | UiCommand::TestWebhook => handle_webhook_command(ctx, panel, command).await,
        UiCommand::SetTheme { .. } | UiCommand::ToggleTheme | UiCommand::DismissNotification(_) => {
            Ok(handle_presentation_command(ctx, panel, command))
        }
        UiCommand::Quit => Ok(None),
    }
}

/// Log a failed operation and surface it as a notification
fn report_error(panel: &mut PanelState, error: &EditError) {
    if error.is_local() {
        tracing::warn!("{error}");
    } else {
        tracing::error!("{error:#}");
    }
    panel.notify(Level::Error, error.to_string(), Instant::now());
}
