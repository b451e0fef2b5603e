use std::time::Instant;

use ocrpanel_core::{PanelState, Section};
use ocrpanel_types::{ServerEvent, Tab};

use super::Render;

/// Apply a pushed event. Sections off the active tab are still updated,
/// they are just not printed.
pub fn handle_server_event(panel: &mut PanelState, event: ServerEvent, now: Instant) -> Option<Render> {
    let section = panel.apply(event, now)?;

    let visible = match section {
        Section::Connection | Section::Notifications => true,
        Section::Status | Section::Results | Section::Screenshot => panel.tab == Tab::Control,
        Section::Regions => panel.tab == Tab::OcrSettings,
        Section::Webhook => panel.tab == Tab::WebhookSettings,
    };

    visible.then_some(Render::Section(section))
}
