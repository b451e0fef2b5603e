use std::time::Instant;

use ocrpanel_core::editor::{
    delete_region, load_ocr_settings, save_region, select_region, set_ocr_enabled,
    take_screenshot, verify_tesseract,
};
use ocrpanel_core::notify::Level;
use ocrpanel_core::{EditError, PanelState, Section};
use ocrpanel_types::{HighlightedScreenshot, UiCommand};

use super::{EventContext, Render};
use crate::ui::screenshot_summary;

pub async fn handle_ocr_command(
    ctx: &EventContext<'_>,
    panel: &mut PanelState,
    command: UiCommand,
) -> Result<Option<Render>, EditError> {
    let regions = Some(Render::Section(Section::Regions));

    match command {
        UiCommand::LoadOcrSettings => {
            load_ocr_settings(panel, ctx.backend).await?;
            Ok(regions)
        }
        UiCommand::SetOcrEnabled(enabled) => {
            set_ocr_enabled(panel, ctx.backend, enabled).await?;
            Ok(regions)
        }
        UiCommand::TakeScreenshot => {
            take_screenshot(panel, ctx.backend).await?;
            let text = match &panel.selection_shot {
                Some(shot) => format!(
                    "{}\nSelect a region with: select <x1> <y1> <x2> <y2>",
                    screenshot_summary("Selection screenshot", &shot.base64)
                ),
                None => "No screenshot".to_string(),
            };
            Ok(Some(Render::Text(text)))
        }
        UiCommand::SetDisplaySize(size) => {
            panel.display_size = Some(size);
            Ok(Some(Render::Text(format!(
                "Display size set to {}x{}",
                size.width, size.height
            ))))
        }
        UiCommand::SelectRegion { from, to } => {
            let pending = select_region(panel, from, to)?;
            Ok(Some(Render::Text(format!(
                "{}\nSave it with: save <name>",
                pending.coords_label()
            ))))
        }
        UiCommand::SaveRegion { name } => {
            let region = save_region(panel, ctx.backend, ctx.sink, &name).await?;
            panel.notify(
                Level::Success,
                format!("Region \"{}\" saved", region.name),
                Instant::now(),
            );
            Ok(regions)
        }
        UiCommand::CancelSelection => {
            panel.drag.cancel();
            panel.pending_region = None;
            Ok(regions)
        }
        UiCommand::DeleteRegion(index) => {
            let message = delete_region(panel, ctx.backend, ctx.sink, index).await?;
            panel.notify(
                Level::Success,
                message.unwrap_or_else(|| "Region deleted".to_string()),
                Instant::now(),
            );
            Ok(regions)
        }
        UiCommand::VerifyTesseract => {
            verify_tesseract(panel, ctx.backend).await;
            Ok(panel.tesseract.as_ref().map(|p| Render::Text(p.to_string())))
        }
        UiCommand::ShowHighlights => match ctx.backend.highlighted_screenshot().await? {
            HighlightedScreenshot::Image { screenshot } => Ok(Some(Render::Text(
                screenshot_summary("Highlighted screenshot", &screenshot),
            ))),
            HighlightedScreenshot::Failed { error } => {
                tracing::error!("Highlighted screenshot failed: {error}");
                panel.notify(Level::Error, error, Instant::now());
                Ok(None)
            }
        },
        _ => Ok(None),
    }
}
