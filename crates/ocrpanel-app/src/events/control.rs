use ocrpanel_core::editor::{control_macro, refresh_live_data};
use ocrpanel_core::{EditError, PanelState, Section};
use ocrpanel_types::{ClientRequest, UiCommand};

use super::{EventContext, Render};

pub async fn handle_control_command(
    ctx: &EventContext<'_>,
    panel: &mut PanelState,
    command: UiCommand,
) -> Result<Option<Render>, EditError> {
    match command {
        UiCommand::SwitchTab(tab) => {
            panel.switch_tab(tab, ctx.sink);
            Ok(Some(Render::Tab))
        }
        UiCommand::Control(action) => {
            control_macro(panel, ctx.backend, action).await?;
            Ok(Some(Render::Section(Section::Status)))
        }
        UiCommand::Request(request) => handle_request(ctx, panel, request).await,
        UiCommand::Show => Ok(Some(Render::Tab)),
        _ => Ok(None),
    }
}

async fn handle_request(
    ctx: &EventContext<'_>,
    panel: &mut PanelState,
    request: ClientRequest,
) -> Result<Option<Render>, EditError> {
    let sent = match request {
        ClientRequest::RequestScreenshot => panel.request_screenshot(ctx.sink),
        ClientRequest::RequestOcrResults => panel.request_ocr_results(ctx.sink),
        ClientRequest::RequestStatus => panel.request_status(ctx.sink),
    };

    if sent {
        // the answer arrives later as a server event
        return Ok(match request {
            ClientRequest::RequestScreenshot => Some(Render::Section(Section::Screenshot)),
            _ => None,
        });
    }

    // No realtime session: fetch the same data over REST instead
    tracing::debug!("Falling back to REST for {}", request.event_name());
    match request {
        ClientRequest::RequestScreenshot => {
            panel.live_screenshot = Some(ctx.backend.screenshot().await?);
            panel.screenshot_loading = false;
            Ok(Some(Render::Section(Section::Screenshot)))
        }
        ClientRequest::RequestOcrResults => {
            refresh_live_data(panel, ctx.backend).await?;
            Ok(Some(Render::Section(Section::Results)))
        }
        ClientRequest::RequestStatus => {
            refresh_live_data(panel, ctx.backend).await?;
            Ok(Some(Render::Section(Section::Status)))
        }
    }
}
