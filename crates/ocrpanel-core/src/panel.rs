//! Client-side state of the panel and how server pushes change it.

use std::time::{Duration, Instant};

use ocrpanel_types::{
    ClientRequest, MacroStatus, OcrResults, OcrSettings, ServerEvent, Size, Tab, WebhookField,
    WebhookSettings,
};

use crate::backend::RequestSink;
use crate::notify::{Level, Notifications};
use crate::screenshot::Screenshot;
use crate::selection::{DragSelection, PendingRegion};
use crate::theme::Theme;
use crate::view::{self, DiagnosticPanel};

/// Local edits of the webhook form, replaced whenever the server sends settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookForm {
    pub enabled: bool,
    pub url: String,
    pub biome_notifications: bool,
    pub user_id: String,
}

impl WebhookForm {
    pub fn from_settings(settings: &WebhookSettings) -> Self {
        Self {
            enabled: settings.enabled,
            url: settings.url.clone(),
            biome_notifications: settings.biome_notifications,
            user_id: settings.user_id.clone(),
        }
    }

    pub fn edit(&mut self, field: WebhookField) {
        match field {
            WebhookField::Enabled(v) => self.enabled = v,
            WebhookField::Url(v) => self.url = v,
            WebhookField::BiomeNotifications(v) => self.biome_notifications = v,
            WebhookField::UserId(v) => self.user_id = v,
        }
    }
}

/// Part of the panel that needs redrawing after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Connection,
    Status,
    Results,
    Screenshot,
    Regions,
    Webhook,
    Notifications,
}

/// Everything the panel holds between events.
///
/// Created once at start-up and owned by the UI task; server responses
/// replace the cached settings wholesale.
#[derive(Debug)]
pub struct PanelState {
    pub connected: bool,
    pub status: MacroStatus,
    pub tab: Tab,
    pub theme: Theme,

    pub results: OcrResults,
    pub results_timestamp: Option<String>,
    pub live_screenshot: Option<String>,
    pub screenshot_loading: bool,

    pub ocr: OcrSettings,
    pub selection_shot: Option<Screenshot>,
    /// Rendered size of the selection screenshot; natural size when unset
    pub display_size: Option<Size>,
    pub drag: DragSelection,
    pub pending_region: Option<PendingRegion>,
    pub tesseract: Option<DiagnosticPanel>,

    pub webhook: WebhookSettings,
    pub webhook_form: WebhookForm,
    pub webhook_test: Option<DiagnosticPanel>,

    pub notifications: Notifications,
}

impl PanelState {
    pub fn new(theme: Theme, notification_ttl: Duration) -> Self {
        let webhook = WebhookSettings::default();
        Self {
            connected: false,
            status: MacroStatus::default(),
            tab: Tab::default(),
            theme,
            results: OcrResults::new(),
            results_timestamp: None,
            live_screenshot: None,
            screenshot_loading: false,
            ocr: OcrSettings::default(),
            selection_shot: None,
            display_size: None,
            drag: DragSelection::default(),
            pending_region: None,
            tesseract: None,
            webhook_form: WebhookForm::from_settings(&webhook),
            webhook,
            webhook_test: None,
            notifications: Notifications::new(notification_ttl),
        }
    }

    /// Fold one realtime event into the state
    pub fn apply(&mut self, event: ServerEvent, now: Instant) -> Option<Section> {
        match event {
            ServerEvent::Connected => {
                tracing::info!("Connected to server");
                self.connected = true;
                Some(Section::Connection)
            }
            ServerEvent::Disconnected => {
                tracing::info!("Disconnected from server");
                self.connected = false;
                Some(Section::Connection)
            }
            ServerEvent::ConnectError(error) => {
                tracing::error!("Connection error: {error}");
                self.connected = false;
                Some(Section::Connection)
            }
            ServerEvent::StatusUpdate { status } => {
                self.status = status;
                Some(Section::Status)
            }
            ServerEvent::OcrUpdate { results, timestamp } => {
                self.results = results;
                if timestamp.is_some() {
                    self.results_timestamp = timestamp;
                }
                Some(Section::Results)
            }
            ServerEvent::ScreenshotUpdate { screenshot } => {
                self.live_screenshot = Some(screenshot);
                self.screenshot_loading = false;
                Some(Section::Screenshot)
            }
            ServerEvent::SettingsUpdate { settings } => {
                self.replace_ocr_settings(settings);
                Some(Section::Regions)
            }
            ServerEvent::WebhookUpdate { webhook } => {
                self.replace_webhook(webhook);
                Some(Section::Webhook)
            }
            ServerEvent::Error { message } => {
                tracing::error!("Server error: {message}");
                self.notify(Level::Error, message, now);
                Some(Section::Notifications)
            }
        }
    }

    pub fn replace_ocr_settings(&mut self, settings: OcrSettings) {
        self.ocr = settings;
    }

    /// Replace the stored settings and every form field from them
    pub fn replace_webhook(&mut self, settings: WebhookSettings) {
        self.webhook_form = WebhookForm::from_settings(&settings);
        self.webhook = settings;
    }

    pub fn notify(&mut self, level: Level, message: impl Into<String>, now: Instant) -> u64 {
        self.notifications.push(level, message, now)
    }

    /// Ask for a fresh screenshot; shows the loading state until it arrives
    pub fn request_screenshot(&mut self, sink: &dyn RequestSink) -> bool {
        if self.emit(sink, ClientRequest::RequestScreenshot) {
            self.screenshot_loading = true;
            true
        } else {
            false
        }
    }

    pub fn request_ocr_results(&mut self, sink: &dyn RequestSink) -> bool {
        self.emit(sink, ClientRequest::RequestOcrResults)
    }

    pub fn request_status(&mut self, sink: &dyn RequestSink) -> bool {
        self.emit(sink, ClientRequest::RequestStatus)
    }

    fn emit(&self, sink: &dyn RequestSink, request: ClientRequest) -> bool {
        if !self.connected || !sink.is_connected() {
            tracing::error!("Not connected to server, dropping {}", request.event_name());
            return false;
        }
        sink.emit(request)
    }

    /// Activate a tab; the control tab refreshes its live data
    pub fn switch_tab(&mut self, tab: Tab, sink: &dyn RequestSink) {
        self.tab = tab;
        if tab == Tab::Control {
            self.request_screenshot(sink);
            self.request_ocr_results(sink);
        }
    }

    pub fn connection_view(&self) -> view::ConnectionIndicator {
        view::connection_indicator(self.connected)
    }

    pub fn status_view(&self) -> view::StatusView {
        view::status_view(self.status)
    }

    pub fn results_view(&self) -> view::ResultsView {
        view::render_results(&self.results)
    }

    pub fn region_list(&self) -> view::RegionListView {
        view::render_regions(&self.ocr)
    }

    pub fn keyword_table(&self) -> view::KeywordTableView {
        view::render_keywords(&self.webhook.keywords)
    }
}
