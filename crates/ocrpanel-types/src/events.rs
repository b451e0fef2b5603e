use indexmap::IndexMap;
use serde::Deserialize;

use crate::geometry::{Point, Size};
use crate::settings::{KeywordFlag, OcrSettings, WebhookSettings};
use crate::status::{ControlAction, MacroStatus};

/// Region name to recognised text, in server order. `None` means nothing was read.
pub type OcrResults = IndexMap<String, Option<String>>;

/// Events pushed by the server over the realtime channel
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Connected,
    Disconnected,
    ConnectError(String),
    StatusUpdate {
        status: MacroStatus,
    },
    OcrUpdate {
        results: OcrResults,
        timestamp: Option<String>,
    },
    ScreenshotUpdate {
        screenshot: String,
    },
    SettingsUpdate {
        settings: OcrSettings,
    },
    WebhookUpdate {
        webhook: WebhookSettings,
    },
    Error {
        message: String,
    },
}

impl ServerEvent {
    /// Build a typed event from a Socket.IO event name and its first argument.
    ///
    /// Unknown event names yield `Ok(None)`.
    pub fn from_wire(
        name: &str,
        payload: serde_json::Value,
    ) -> Result<Option<Self>, serde_json::Error> {
        #[derive(Deserialize)]
        struct Status {
            status: MacroStatus,
        }

        #[derive(Deserialize)]
        struct Ocr {
            #[serde(default)]
            results: OcrResults,
            #[serde(default)]
            timestamp: Option<String>,
        }

        #[derive(Deserialize)]
        struct Screenshot {
            screenshot: String,
        }

        #[derive(Deserialize)]
        struct Settings {
            settings: OcrSettings,
        }

        #[derive(Deserialize)]
        struct Webhook {
            webhook: WebhookSettings,
        }

        #[derive(Deserialize)]
        struct Message {
            #[serde(default)]
            message: String,
        }

        let event = match name {
            "status_update" => {
                let Status { status } = serde_json::from_value(payload)?;
                ServerEvent::StatusUpdate { status }
            }
            "ocr_update" => {
                let Ocr { results, timestamp } = serde_json::from_value(payload)?;
                ServerEvent::OcrUpdate { results, timestamp }
            }
            "screenshot_update" => {
                let Screenshot { screenshot } = serde_json::from_value(payload)?;
                ServerEvent::ScreenshotUpdate { screenshot }
            }
            "settings_update" => {
                let Settings { settings } = serde_json::from_value(payload)?;
                ServerEvent::SettingsUpdate { settings }
            }
            "webhook_update" => {
                let Webhook { webhook } = serde_json::from_value(payload)?;
                ServerEvent::WebhookUpdate { webhook }
            }
            "error" => {
                let Message { message } = serde_json::from_value(payload)?;
                ServerEvent::Error { message }
            }
            _ => return Ok(None),
        };

        Ok(Some(event))
    }
}

/// Requests the client emits over the realtime channel. None carry a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRequest {
    RequestScreenshot,
    RequestOcrResults,
    RequestStatus,
}

impl ClientRequest {
    pub fn event_name(&self) -> &'static str {
        match self {
            ClientRequest::RequestScreenshot => "request_screenshot",
            ClientRequest::RequestOcrResults => "request_ocr_results",
            ClientRequest::RequestStatus => "request_status",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Control,
    OcrSettings,
    WebhookSettings,
}

/// Field of the webhook form edited locally before a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookField {
    Enabled(bool),
    Url(String),
    BiomeNotifications(bool),
    UserId(String),
}

/// User intents, produced by the command line and consumed by the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    SwitchTab(Tab),
    Control(ControlAction),
    Request(ClientRequest),
    Show,
    // OCR settings tab
    LoadOcrSettings,
    SetOcrEnabled(bool),
    TakeScreenshot,
    SetDisplaySize(Size),
    SelectRegion { from: Point, to: Point },
    SaveRegion { name: String },
    CancelSelection,
    DeleteRegion(usize),
    VerifyTesseract,
    /// Fetch the live screenshot with every saved region outlined
    ShowHighlights,
    // Webhook tab
    LoadWebhookSettings,
    EditWebhook(WebhookField),
    SaveWebhook,
    AddKeyword(String),
    DeleteKeyword(usize),
    SetKeywordFlag {
        index: usize,
        flag: KeywordFlag,
        value: bool,
    },
    TestWebhook,
    // Presentation
    SetTheme { dark: bool },
    ToggleTheme,
    DismissNotification(u64),
    Quit,
}

/// Everything the single UI task reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Server(ServerEvent),
    Command(UiCommand),
    /// Periodic tick used to expire notifications
    Tick,
}
