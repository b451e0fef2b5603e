use std::time::Instant;

use ocrpanel_core::editor::{
    add_keyword, delete_keyword, load_webhook_settings, save_webhook_form, test_webhook,
    update_keyword_flag,
};
use ocrpanel_core::notify::Level;
use ocrpanel_core::{EditError, PanelState, Section};
use ocrpanel_types::UiCommand;

use super::{EventContext, Render};

pub async fn handle_webhook_command(
    ctx: &EventContext<'_>,
    panel: &mut PanelState,
    command: UiCommand,
) -> Result<Option<Render>, EditError> {
    let webhook = Some(Render::Section(Section::Webhook));

    match command {
        UiCommand::LoadWebhookSettings => {
            load_webhook_settings(panel, ctx.backend).await?;
        }
        UiCommand::EditWebhook(field) => {
            // local until saved
            panel.webhook_form.edit(field);
        }
        UiCommand::SaveWebhook => {
            save_webhook_form(panel, ctx.backend).await?;
            panel.notify(Level::Success, "Webhook settings saved", Instant::now());
        }
        UiCommand::AddKeyword(text) => {
            add_keyword(panel, ctx.backend, &text).await?;
            panel.notify(Level::Success, "Keyword added", Instant::now());
        }
        UiCommand::DeleteKeyword(index) => {
            delete_keyword(panel, ctx.backend, index).await?;
            panel.notify(Level::Success, "Keyword deleted", Instant::now());
        }
        UiCommand::SetKeywordFlag { index, flag, value } => {
            update_keyword_flag(panel, ctx.backend, index, flag, value).await?;
        }
        UiCommand::TestWebhook => {
            test_webhook(panel, ctx.backend).await?;
            return Ok(panel.webhook_test.as_ref().map(|p| Render::Text(p.to_string())));
        }
        _ => return Ok(None),
    }

    Ok(webhook)
}
