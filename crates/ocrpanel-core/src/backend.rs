use async_trait::async_trait;
use ocrpanel_types::{
    ClientRequest, ControlAction, ControlReply, HighlightedScreenshot, MacroStatus, OcrResults,
    OcrSettings, Region, TesseractReport, WebhookSettings, WebhookTestReport,
};

/// Reply of `/delete_ocr_region`. The server sends settings back even when it
/// refuses the index, so both outcomes carry them.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDeletion {
    pub settings: OcrSettings,
    pub message: Option<String>,
    pub removed: bool,
}

/// The server's REST surface as seen by the settings editors
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn ocr_settings(&self) -> anyhow::Result<OcrSettings>;

    /// Replace OCR settings wholesale; returns what the server stored
    async fn save_ocr_settings(&self, settings: &OcrSettings) -> anyhow::Result<OcrSettings>;

    /// Plain screenshot as base64 PNG
    async fn screenshot(&self) -> anyhow::Result<String>;

    async fn highlighted_screenshot(&self) -> anyhow::Result<HighlightedScreenshot>;

    async fn add_ocr_region(&self, region: &Region) -> anyhow::Result<OcrSettings>;

    async fn delete_ocr_region(&self, index: usize) -> anyhow::Result<RegionDeletion>;

    async fn verify_tesseract(&self) -> anyhow::Result<TesseractReport>;

    async fn ocr_results(&self) -> anyhow::Result<OcrResults>;

    async fn status(&self) -> anyhow::Result<MacroStatus>;

    async fn webhook_settings(&self) -> anyhow::Result<WebhookSettings>;

    /// Replace webhook settings wholesale; returns what the server stored
    async fn save_webhook_settings(
        &self,
        settings: &WebhookSettings,
    ) -> anyhow::Result<WebhookSettings>;

    async fn test_webhook(&self, url: &str) -> anyhow::Result<WebhookTestReport>;

    async fn control(&self, action: ControlAction) -> anyhow::Result<ControlReply>;
}

/// Outbound half of the realtime channel
pub trait RequestSink: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Send now or drop. Returns whether the request left the client.
    fn emit(&self, request: ClientRequest) -> bool;
}
