//! Text rendering of the panel for the terminal.

use std::fmt::Write;

use ocrpanel_core::notify::{Level, Notification};
use ocrpanel_core::screenshot::Screenshot;
use ocrpanel_core::view::{self, ResultsView};
use ocrpanel_core::{PanelState, Section};
use ocrpanel_types::Tab;

pub fn render_section(panel: &PanelState, section: Section) -> String {
    let mut out = String::new();

    match section {
        Section::Connection => {
            let _ = writeln!(out, "● {}", panel.connection_view().text);
        }
        Section::Status => {
            let status = panel.status_view();
            let mark = |on: bool| if on { "enabled" } else { "disabled" };
            let _ = writeln!(out, "{}", status.label);
            let _ = writeln!(
                out,
                "  start: {}  pause: {}  stop: {}",
                mark(status.buttons.start),
                mark(status.buttons.pause),
                mark(status.buttons.stop)
            );
        }
        Section::Results => {
            let _ = writeln!(out, "OCR results:");
            let results = panel.results_view();
            if let ResultsView::Rows(_) = results
                && let Some(timestamp) = &panel.results_timestamp
            {
                let _ = writeln!(out, "  {}", view::timestamp_label(timestamp));
            }
            let _ = write!(out, "{results}");
        }
        Section::Screenshot => {
            let line = if panel.screenshot_loading {
                "Screenshot: loading...".to_string()
            } else {
                match &panel.live_screenshot {
                    Some(data) => screenshot_summary("Screenshot", data),
                    None => "Screenshot: none".to_string(),
                }
            };
            let _ = writeln!(out, "{line}");
        }
        Section::Regions => {
            let enabled = if panel.ocr.enabled { "enabled" } else { "disabled" };
            let _ = writeln!(out, "OCR {enabled}, regions:");
            let _ = write!(out, "{}", panel.region_list());
            if let Some(pending) = &panel.pending_region {
                let _ = writeln!(out, "Pending selection:\n{}", pending.coords_label());
            }
            if let Some(tesseract) = &panel.tesseract {
                let _ = write!(out, "{tesseract}");
            }
        }
        Section::Webhook => {
            let form = &panel.webhook_form;
            let _ = writeln!(out, "Webhook enabled: {}", form.enabled);
            let _ = writeln!(out, "Webhook URL: {}", form.url);
            let _ = writeln!(out, "Biome notifications: {}", form.biome_notifications);
            let _ = writeln!(out, "User ID: {}", form.user_id);
            let _ = writeln!(out, "Keywords:");
            let _ = write!(out, "{}", panel.keyword_table());
            if let Some(test) = &panel.webhook_test {
                let _ = write!(out, "{test}");
            }
        }
        Section::Notifications => {
            out.push_str(&render_notifications(panel.notifications.active()));
        }
    }

    out
}

/// Every section shown on the active tab
pub fn render_tab(panel: &PanelState) -> String {
    let sections: &[Section] = match panel.tab {
        Tab::Control => &[
            Section::Connection,
            Section::Status,
            Section::Screenshot,
            Section::Results,
        ],
        Tab::OcrSettings => &[Section::Connection, Section::Regions],
        Tab::WebhookSettings => &[Section::Connection, Section::Webhook],
    };

    let title = match panel.tab {
        Tab::Control => "control",
        Tab::OcrSettings => "ocr-settings",
        Tab::WebhookSettings => "webhook-settings",
    };

    let mut out = format!("== {title} ({} theme) ==\n", theme_name(panel));
    for section in sections {
        out.push_str(&render_section(panel, *section));
    }
    out
}

pub fn render_notifications(items: &[Notification]) -> String {
    items
        .iter()
        .map(|n| {
            let level = match n.level {
                Level::Info => "info",
                Level::Success => "ok",
                Level::Error => "error",
            };
            format!("[{level} #{}] {}\n", n.id, n.message)
        })
        .collect()
}

pub fn screenshot_summary(label: &str, data: &str) -> String {
    match Screenshot::from_base64(data.to_string()) {
        Ok(shot) => format!(
            "{label}: {}x{} PNG ({} bytes encoded)",
            shot.natural.width,
            shot.natural.height,
            data.len()
        ),
        Err(e) => format!("{label}: unreadable ({e:#})"),
    }
}

fn theme_name(panel: &PanelState) -> &'static str {
    if panel.theme.is_dark() { "dark" } else { "light" }
}
