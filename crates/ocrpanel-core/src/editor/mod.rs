//! Request/response operations on the panel state.
//!
//! Every change goes to the server in full and the panel is redrawn from the
//! server's reply, never from the locally edited copy.

use std::time::Instant;

use ocrpanel_types::ControlAction;

use crate::backend::SettingsBackend;
use crate::error::EditError;
use crate::notify::Level;
use crate::panel::PanelState;

pub mod ocr;
pub mod webhook;

pub use ocr::{
    delete_region, load_ocr_settings, save_region, select_region, set_ocr_enabled,
    take_screenshot, verify_tesseract,
};
pub use webhook::{
    add_keyword, delete_keyword, load_webhook_settings, save_webhook_form, test_webhook,
    update_keyword_flag,
};

/// Send a start/pause/stop action and surface the server's message
pub async fn control_macro<B>(
    state: &mut PanelState,
    backend: &B,
    action: ControlAction,
) -> Result<String, EditError>
where
    B: SettingsBackend + ?Sized,
{
    let reply = backend.control(action).await?;
    tracing::info!("{}", reply.message);

    if let Some(status) = reply.status {
        state.status = status;
    }
    state.notify(Level::Info, reply.message.clone(), Instant::now());
    Ok(reply.message)
}

/// Pull status and results over REST, for when no realtime channel is up
pub async fn refresh_live_data<B>(state: &mut PanelState, backend: &B) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    state.status = backend.status().await?;
    state.results = backend.ocr_results().await?;
    Ok(())
}

/// Initial load of both settings editors
pub async fn load_all<B>(state: &mut PanelState, backend: &B) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    load_ocr_settings(state, backend).await?;
    load_webhook_settings(state, backend).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ocrpanel_types::MacroStatus;

    use super::*;
    use crate::testing::{Call, FakeBackend};
    use crate::theme::Theme;

    #[tokio::test]
    async fn control_applies_reply_status() {
        let backend = FakeBackend::default();
        let mut state = PanelState::new(Theme::Dark, Duration::from_secs(3));

        let message = control_macro(&mut state, &backend, ControlAction::Start)
            .await
            .unwrap();

        assert_eq!(message, "Macro running");
        assert_eq!(state.status, MacroStatus::Running);
        assert_eq!(backend.calls(), vec![Call::Control(ControlAction::Start)]);
        assert_eq!(state.notifications.active().len(), 1);
    }
}
