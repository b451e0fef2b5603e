use ocrpanel_types::{KeywordFlag, WebhookSettings};

use crate::backend::SettingsBackend;
use crate::error::{EditError, ValidationError};
use crate::keywords;
use crate::panel::PanelState;
use crate::view::{DiagnosticPanel, webhook_test_panel};

pub async fn load_webhook_settings<B>(state: &mut PanelState, backend: &B) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    let settings = backend.webhook_settings().await?;
    tracing::debug!("Webhook settings loaded: {} keywords", settings.keywords.len());
    state.replace_webhook(settings);
    Ok(())
}

/// Fetch, let `edit` change the fresh copy, post it whole and apply the reply.
///
/// The local copy is never rendered; only the server's answer is.
async fn read_modify_write<B, F>(
    state: &mut PanelState,
    backend: &B,
    edit: F,
) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
    F: FnOnce(&mut WebhookSettings) -> Result<(), ValidationError>,
{
    let mut settings = backend.webhook_settings().await?;
    edit(&mut settings)?;
    let saved = backend.save_webhook_settings(&settings).await?;
    state.replace_webhook(saved);
    Ok(())
}

/// Save the form fields, keeping whatever keywords the server has
pub async fn save_webhook_form<B>(state: &mut PanelState, backend: &B) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    let form = state.webhook_form.clone();
    read_modify_write(state, backend, move |settings| {
        settings.enabled = form.enabled;
        settings.url = form.url.trim().to_string();
        settings.biome_notifications = form.biome_notifications;
        settings.user_id = form.user_id.trim().to_string();
        Ok(())
    })
    .await?;

    tracing::info!("Webhook settings saved");
    Ok(())
}

pub async fn add_keyword<B>(state: &mut PanelState, backend: &B, text: &str) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    // Blank input is refused before the first request
    let text = keywords::clean_keyword(text)?;

    read_modify_write(state, backend, |settings| {
        keywords::push_keyword(&mut settings.keywords, &text)
    })
    .await?;

    tracing::info!("Keyword added: {text}");
    Ok(())
}

pub async fn delete_keyword<B>(
    state: &mut PanelState,
    backend: &B,
    index: usize,
) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    read_modify_write(state, backend, |settings| {
        keywords::remove_keyword(&mut settings.keywords, index).map(|removed| {
            tracing::info!("Keyword removed: {}", removed.text);
        })
    })
    .await
}

pub async fn update_keyword_flag<B>(
    state: &mut PanelState,
    backend: &B,
    index: usize,
    flag: KeywordFlag,
    value: bool,
) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    read_modify_write(state, backend, |settings| {
        keywords::set_keyword_flag(&mut settings.keywords, index, flag, value)
    })
    .await
}

/// Ask the server to send a test message to the URL in the form.
///
/// The outcome is shown in `state.webhook_test`; only an empty URL is an error.
pub async fn test_webhook<B>(state: &mut PanelState, backend: &B) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    let url = state.webhook_form.url.trim().to_string();
    if url.is_empty() {
        let err = ValidationError::EmptyWebhookUrl;
        state.webhook_test = Some(DiagnosticPanel::failure(err.to_string(), Vec::new()));
        return Err(err.into());
    }

    state.webhook_test = Some(DiagnosticPanel::pending("Sending test webhook..."));

    let panel = match backend.test_webhook(&url).await {
        Ok(report) => webhook_test_panel(&report, &url),
        Err(e) => {
            tracing::error!("Webhook test failed: {e:#}");
            DiagnosticPanel::failure(
                "Webhook test failed",
                vec![
                    format!("Error: {e:#}"),
                    "There was a problem with the webhook test. Please try again.".to_string(),
                ],
            )
        }
    };
    state.webhook_test = Some(panel);
    Ok(())
}
