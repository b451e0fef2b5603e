//! Request and response bodies of the server's REST endpoints.

use serde::{Deserialize, Serialize};

use crate::settings::{OcrSettings, WebhookSettings};
use crate::status::MacroStatus;

/// `{settings}` reply of the region endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    pub settings: OcrSettings,
}

/// `{webhook}` reply of `POST /webhook_settings`
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    pub webhook: WebhookSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotPayload {
    pub screenshot: String,
}

/// `/highlighted_screenshot` answers with either an image or an error string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HighlightedScreenshot {
    Image { screenshot: String },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteRegionRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestWebhookRequest {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TesseractReport {
    pub installed: bool,
    pub test_passed: bool,
    pub path: Option<String>,
    pub version: Option<String>,
    pub error: Option<String>,
    pub test_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookTestReport {
    pub success: bool,
    pub status_code: Option<u16>,
    pub message: Option<String>,
    pub response: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControlReply {
    pub message: String,
    pub status: Option<MacroStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusReply {
    pub status: MacroStatus,
}
