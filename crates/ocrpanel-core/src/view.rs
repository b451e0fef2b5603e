//! View models: what the panel shows, derived from state without side effects.

use std::fmt;

use ocrpanel_types::{Keyword, MacroStatus, OcrResults, OcrSettings, TesseractReport, WebhookTestReport};

use crate::status::{ButtonStates, button_states, status_label};

pub const NO_TEXT_PLACEHOLDER: &str = "(No text detected)";
pub const NO_RESULTS_MESSAGE: &str = "No OCR results yet.";
pub const NO_REGIONS_MESSAGE: &str = "No OCR regions defined. Take a screenshot and select a region.";
pub const NO_KEYWORDS_MESSAGE: &str = "No keywords defined. All biome text will trigger notifications.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIndicator {
    pub connected: bool,
    pub text: &'static str,
}

pub fn connection_indicator(connected: bool) -> ConnectionIndicator {
    ConnectionIndicator {
        connected,
        text: if connected { "Connected" } else { "Disconnected" },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// `stopped`, `running` or `paused`; doubles as a style class
    pub class: &'static str,
    pub label: String,
    pub buttons: ButtonStates,
}

pub fn status_view(status: MacroStatus) -> StatusView {
    StatusView {
        class: status.as_str(),
        label: status_label(status),
        buttons: button_states(status),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub region: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Empty,
    Rows(Vec<ResultRow>),
}

pub fn render_results(results: &OcrResults) -> ResultsView {
    if results.is_empty() {
        return ResultsView::Empty;
    }

    let rows = results
        .iter()
        .map(|(region, text)| ResultRow {
            region: region.clone(),
            text: match text.as_deref() {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => NO_TEXT_PLACEHOLDER.to_string(),
            },
        })
        .collect();

    ResultsView::Rows(rows)
}

pub fn timestamp_label(timestamp: &str) -> String {
    format!("Last updated: {timestamp}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    /// Position in the server's list; the delete action refers to it
    pub index: usize,
    pub name: String,
    pub coords: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionListView {
    Empty,
    Rows(Vec<RegionRow>),
}

pub fn render_regions(settings: &OcrSettings) -> RegionListView {
    if settings.regions.is_empty() {
        return RegionListView::Empty;
    }

    RegionListView::Rows(
        settings
            .regions
            .iter()
            .enumerate()
            .map(|(index, r)| RegionRow {
                index,
                name: r.name.clone(),
                coords: format!("({}, {}) to ({}, {})", r.x1, r.y1, r.x2, r.y2),
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRow {
    pub index: usize,
    pub text: String,
    pub enabled: bool,
    pub ping: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordTableView {
    Empty,
    Rows(Vec<KeywordRow>),
}

pub fn render_keywords(keywords: &[Keyword]) -> KeywordTableView {
    if keywords.is_empty() {
        return KeywordTableView::Empty;
    }

    KeywordTableView::Rows(
        keywords
            .iter()
            .enumerate()
            .map(|(index, k)| KeywordRow {
                index,
                text: k.text.clone(),
                enabled: k.enabled,
                ping: k.ping,
            })
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Pending,
    Success,
    Failure,
}

/// Inline status box used for Tesseract checks and webhook tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticPanel {
    pub tone: Tone,
    pub title: String,
    pub lines: Vec<String>,
}

impl DiagnosticPanel {
    pub fn pending(title: impl Into<String>) -> Self {
        Self {
            tone: Tone::Pending,
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn failure(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            tone: Tone::Failure,
            title: title.into(),
            lines,
        }
    }
}

const TESSERACT_TROUBLESHOOTING: [&str; 4] = [
    "Ensure Tesseract OCR is installed on your system",
    "Make sure the path in the code matches your installation path",
    "Verify that you have the necessary language data files installed",
    "Try restarting the application",
];

pub fn tesseract_panel(report: &TesseractReport) -> DiagnosticPanel {
    if report.installed && report.test_passed {
        return DiagnosticPanel {
            tone: Tone::Success,
            title: "Tesseract is properly installed".to_string(),
            lines: vec![
                format!("Path: {}", report.path.as_deref().unwrap_or("unknown")),
                format!("Version: {}", report.version.as_deref().unwrap_or("unknown")),
                "OCR functionality is working correctly.".to_string(),
            ],
        };
    }

    let mut lines = Vec::new();
    if let Some(path) = &report.path {
        lines.push(format!("Configured path: {path}"));
    }
    if let Some(error) = &report.error {
        lines.push(format!("Error: {error}"));
    }
    if report.installed
        && let Some(test_error) = &report.test_error
    {
        lines.push(format!("Tesseract is installed but the test failed: {test_error}"));
    }
    lines.push("Troubleshooting steps:".to_string());
    lines.extend(
        TESSERACT_TROUBLESHOOTING
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {step}", i + 1)),
    );

    DiagnosticPanel::failure("Tesseract installation issue detected", lines)
}

pub fn webhook_test_panel(report: &WebhookTestReport, url: &str) -> DiagnosticPanel {
    if report.success {
        let status = report
            .status_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return DiagnosticPanel {
            tone: Tone::Success,
            title: "Webhook test successful!".to_string(),
            lines: vec![
                format!("Response status: {status}"),
                format!("Test message sent to: {url}"),
            ],
        };
    }

    let mut lines = vec![format!(
        "Error: {}",
        report.message.as_deref().unwrap_or("unknown error")
    )];
    if let Some(response) = report.response.as_deref().filter(|r| !r.is_empty()) {
        lines.push(format!("Response: {response}"));
    }
    lines.push(
        "Please check that your webhook URL is correct and the server is running.".to_string(),
    );

    DiagnosticPanel::failure("Webhook test failed", lines)
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsView::Empty => writeln!(f, "{NO_RESULTS_MESSAGE}"),
            ResultsView::Rows(rows) => {
                for row in rows {
                    writeln!(f, "{}: {}", row.region, row.text)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for RegionListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionListView::Empty => writeln!(f, "{NO_REGIONS_MESSAGE}"),
            RegionListView::Rows(rows) => {
                for row in rows {
                    writeln!(f, "[{}] {} {}", row.index, row.name, row.coords)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for KeywordTableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |on: bool| if on { "on" } else { "off" };
        match self {
            KeywordTableView::Empty => writeln!(f, "{NO_KEYWORDS_MESSAGE}"),
            KeywordTableView::Rows(rows) => {
                for row in rows {
                    writeln!(
                        f,
                        "[{}] {} (enabled: {}, ping: {})",
                        row.index,
                        row.text,
                        mark(row.enabled),
                        mark(row.ping)
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DiagnosticPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.tone {
            Tone::Pending => "…",
            Tone::Success => "✓",
            Tone::Failure => "✗",
        };
        writeln!(f, "{mark} {}", self.title)?;
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}
