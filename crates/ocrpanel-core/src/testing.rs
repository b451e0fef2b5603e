//! In-memory stand-ins for the server, shared by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use ocrpanel_types::{
    ClientRequest, ControlAction, ControlReply, HighlightedScreenshot, MacroStatus, OcrResults,
    OcrSettings, Region, TesseractReport, WebhookSettings, WebhookTestReport,
};

use crate::backend::{RegionDeletion, RequestSink, SettingsBackend};

pub(crate) struct FakeSink {
    connected: AtomicBool,
    sent: Mutex<Vec<ClientRequest>>,
}

impl FakeSink {
    pub(crate) fn connected() -> Self {
        Self {
            connected: AtomicBool::new(true),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub(crate) fn sent(&self) -> Vec<ClientRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl RequestSink for FakeSink {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn emit(&self, request: ClientRequest) -> bool {
        if !self.is_connected() {
            return false;
        }
        self.sent.lock().unwrap().push(request);
        true
    }
}

/// Every request that reached the fake server
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    GetOcrSettings,
    SaveOcrSettings(OcrSettings),
    Screenshot,
    AddRegion(Region),
    DeleteRegion(usize),
    VerifyTesseract,
    GetWebhook,
    SaveWebhook(WebhookSettings),
    TestWebhook(String),
    Control(ControlAction),
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub(crate) ocr: Mutex<OcrSettings>,
    pub(crate) webhook: Mutex<WebhookSettings>,
    pub(crate) screenshot: Mutex<String>,
    pub(crate) tesseract: Mutex<TesseractReport>,
    pub(crate) webhook_test: Mutex<WebhookTestReport>,
    /// Returned by the next webhook save instead of the submitted object
    pub(crate) webhook_reply: Mutex<Option<WebhookSettings>>,
    pub(crate) fail: AtomicBool,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub(crate) fn with_webhook(webhook: WebhookSettings) -> Self {
        Self {
            webhook: Mutex::new(webhook),
            ..Default::default()
        }
    }

    pub(crate) fn with_ocr(ocr: OcrSettings) -> Self {
        Self {
            ocr: Mutex::new(ocr),
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl SettingsBackend for FakeBackend {
    async fn ocr_settings(&self) -> anyhow::Result<OcrSettings> {
        self.record(Call::GetOcrSettings)?;
        Ok(self.ocr.lock().unwrap().clone())
    }

    async fn save_ocr_settings(&self, settings: &OcrSettings) -> anyhow::Result<OcrSettings> {
        self.record(Call::SaveOcrSettings(settings.clone()))?;
        *self.ocr.lock().unwrap() = settings.clone();
        Ok(settings.clone())
    }

    async fn screenshot(&self) -> anyhow::Result<String> {
        self.record(Call::Screenshot)?;
        Ok(self.screenshot.lock().unwrap().clone())
    }

    async fn highlighted_screenshot(&self) -> anyhow::Result<HighlightedScreenshot> {
        Ok(HighlightedScreenshot::Image {
            screenshot: self.screenshot.lock().unwrap().clone(),
        })
    }

    async fn add_ocr_region(&self, region: &Region) -> anyhow::Result<OcrSettings> {
        self.record(Call::AddRegion(region.clone()))?;
        let mut ocr = self.ocr.lock().unwrap();
        ocr.regions.push(region.clone());
        Ok(ocr.clone())
    }

    async fn delete_ocr_region(&self, index: usize) -> anyhow::Result<RegionDeletion> {
        self.record(Call::DeleteRegion(index))?;
        let mut ocr = self.ocr.lock().unwrap();
        if index < ocr.regions.len() {
            let removed = ocr.regions.remove(index);
            Ok(RegionDeletion {
                settings: ocr.clone(),
                message: Some(format!("OCR region '{}' deleted", removed.name)),
                removed: true,
            })
        } else {
            Ok(RegionDeletion {
                settings: ocr.clone(),
                message: Some("Invalid region index".to_string()),
                removed: false,
            })
        }
    }

    async fn verify_tesseract(&self) -> anyhow::Result<TesseractReport> {
        self.record(Call::VerifyTesseract)?;
        Ok(self.tesseract.lock().unwrap().clone())
    }

    async fn ocr_results(&self) -> anyhow::Result<OcrResults> {
        Ok(OcrResults::new())
    }

    async fn status(&self) -> anyhow::Result<MacroStatus> {
        Ok(MacroStatus::Stopped)
    }

    async fn webhook_settings(&self) -> anyhow::Result<WebhookSettings> {
        self.record(Call::GetWebhook)?;
        Ok(self.webhook.lock().unwrap().clone())
    }

    async fn save_webhook_settings(
        &self,
        settings: &WebhookSettings,
    ) -> anyhow::Result<WebhookSettings> {
        self.record(Call::SaveWebhook(settings.clone()))?;
        let stored = self
            .webhook_reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| settings.clone());
        *self.webhook.lock().unwrap() = stored.clone();
        Ok(stored)
    }

    async fn test_webhook(&self, url: &str) -> anyhow::Result<WebhookTestReport> {
        self.record(Call::TestWebhook(url.to_string()))?;
        Ok(self.webhook_test.lock().unwrap().clone())
    }

    async fn control(&self, action: ControlAction) -> anyhow::Result<ControlReply> {
        self.record(Call::Control(action))?;
        let status = match action {
            ControlAction::Start => MacroStatus::Running,
            ControlAction::Pause => MacroStatus::Paused,
            ControlAction::Stop => MacroStatus::Stopped,
        };
        Ok(ControlReply {
            message: format!("Macro {}", status),
            status: Some(status),
        })
    }
}
