use ocrpanel_core::{PanelState, Theme};
use ocrpanel_types::UiCommand;

use super::{EventContext, Render};

pub fn handle_presentation_command(
    ctx: &EventContext<'_>,
    panel: &mut PanelState,
    command: UiCommand,
) -> Option<Render> {
    match command {
        UiCommand::SetTheme { dark } => set_theme(ctx, panel, Theme::from_dark(dark)),
        UiCommand::ToggleTheme => set_theme(ctx, panel, panel.theme.toggled()),
        UiCommand::DismissNotification(id) => {
            if !panel.notifications.dismiss(id) {
                tracing::debug!("Notification {id} already gone");
            }
            None
        }
        _ => None,
    }
}

fn set_theme(ctx: &EventContext<'_>, panel: &mut PanelState, theme: Theme) -> Option<Render> {
    panel.theme = theme;
    match ctx.theme_store.save(theme) {
        Ok(()) => tracing::debug!(
            "Theme preference saved to {}",
            ctx.theme_store.path().display()
        ),
        // the theme still applies for this session
        Err(e) => tracing::warn!(
            "Failed to save theme preference to {}: {e:#}",
            ctx.theme_store.path().display()
        ),
    }
    Some(Render::Tab)
}
