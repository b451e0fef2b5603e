pub mod api;
pub mod events;
pub mod geometry;
pub mod settings;
pub mod status;

pub use api::{
    ControlReply, DeleteRegionRequest, HighlightedScreenshot, ScreenshotPayload, SettingsEnvelope,
    StatusReply, TesseractReport, TestWebhookRequest, WebhookEnvelope, WebhookTestReport,
};
pub use events::{AppEvent, ClientRequest, OcrResults, ServerEvent, Tab, UiCommand, WebhookField};
pub use geometry::{Point, Size};
pub use settings::{Keyword, KeywordFlag, OcrSettings, Region, WebhookSettings};
pub use status::{ControlAction, MacroStatus};
