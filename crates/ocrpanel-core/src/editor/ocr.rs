use ocrpanel_types::{Point, Region};

use crate::backend::{RequestSink, SettingsBackend};
use crate::error::{EditError, SelectionError, ValidationError};
use crate::panel::PanelState;
use crate::screenshot::Screenshot;
use crate::selection::{PendingRegion, scale_to_natural};
use crate::view::{DiagnosticPanel, tesseract_panel};

pub async fn load_ocr_settings<B>(state: &mut PanelState, backend: &B) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    let settings = backend.ocr_settings().await?;
    state.replace_ocr_settings(settings);
    Ok(())
}

/// Flip the global OCR switch; the rest of the settings go back unchanged
pub async fn set_ocr_enabled<B>(
    state: &mut PanelState,
    backend: &B,
    enabled: bool,
) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    let mut settings = state.ocr.clone();
    settings.enabled = enabled;

    let saved = backend.save_ocr_settings(&settings).await?;
    tracing::info!("OCR settings updated: enabled={}", saved.enabled);
    state.replace_ocr_settings(saved);
    Ok(())
}

/// Fetch a screenshot to draw regions on
pub async fn take_screenshot<B>(state: &mut PanelState, backend: &B) -> Result<(), EditError>
where
    B: SettingsBackend + ?Sized,
{
    let base64 = backend.screenshot().await?;
    let shot = Screenshot::from_base64(base64)?;
    tracing::debug!(
        "Selection screenshot {}x{}",
        shot.natural.width,
        shot.natural.height
    );

    state.selection_shot = Some(shot);
    state.drag.cancel();
    state.pending_region = None;
    Ok(())
}

/// Drag from `from` to `to` on the displayed screenshot.
///
/// Undersized or misplaced selections fail here and nothing is kept.
pub fn select_region(
    state: &mut PanelState,
    from: Point,
    to: Point,
) -> Result<&PendingRegion, EditError> {
    let shot = state
        .selection_shot
        .as_ref()
        .ok_or(SelectionError::NoScreenshot)?;
    let displayed = state.display_size.unwrap_or(shot.natural);
    let natural = shot.natural;

    state.pending_region = None;
    state.drag.begin(from);
    state.drag.update(to);
    let rect = state.drag.finish(to, displayed)?;
    let pending = scale_to_natural(rect, displayed, natural)?;

    Ok(state.pending_region.insert(pending))
}

/// Submit the pending selection under `name`, then refresh the live screenshot
pub async fn save_region<B>(
    state: &mut PanelState,
    backend: &B,
    sink: &dyn RequestSink,
    name: &str,
) -> Result<Region, EditError>
where
    B: SettingsBackend + ?Sized,
{
    let pending = state
        .pending_region
        .clone()
        .ok_or(SelectionError::NothingToSave)?;
    let region = pending.into_region(name);

    let settings = backend.add_ocr_region(&region).await?;
    tracing::info!("Region saved: {}", region.name);
    state.replace_ocr_settings(settings);
    state.pending_region = None;

    if state.connected {
        state.request_screenshot(sink);
    }
    Ok(region)
}

/// Delete by position. Returns the server's message.
pub async fn delete_region<B>(
    state: &mut PanelState,
    backend: &B,
    sink: &dyn RequestSink,
    index: usize,
) -> Result<Option<String>, EditError>
where
    B: SettingsBackend + ?Sized,
{
    let deletion = backend.delete_ocr_region(index).await?;
    state.replace_ocr_settings(deletion.settings);

    if !deletion.removed {
        tracing::warn!("Server refused to delete region {index}");
        return Err(ValidationError::IndexOutOfRange {
            list: "region",
            index,
        }
        .into());
    }

    tracing::info!("Region deleted: {:?}", deletion.message);
    if state.connected {
        state.request_screenshot(sink);
    }
    Ok(deletion.message)
}

/// Check the server's Tesseract setup. Any outcome, including a failed
/// request, ends up in `state.tesseract`.
pub async fn verify_tesseract<B>(state: &mut PanelState, backend: &B)
where
    B: SettingsBackend + ?Sized,
{
    state.tesseract = Some(DiagnosticPanel::pending(
        "Checking Tesseract installation...",
    ));

    let panel = match backend.verify_tesseract().await {
        Ok(report) => tesseract_panel(&report),
        Err(e) => {
            tracing::error!("Error checking Tesseract: {e:#}");
            DiagnosticPanel::failure("Error checking Tesseract", vec![format!("{e:#}")])
        }
    };
    state.tesseract = Some(panel);
}
