//! Line-oriented command syntax of the terminal panel.

use anyhow::{Context, anyhow, bail};
use ocrpanel_types::{
    ClientRequest, ControlAction, KeywordFlag, Point, Size, Tab, UiCommand, WebhookField,
};

pub const HELP: &str = "\
Control:   start | pause | stop | status | results | screenshot | show
Tabs:      tab control|ocr|webhook
OCR:       ocr load | ocr on|off | shot | display <w> <h> | select <x1> <y1> <x2> <y2>
           save [name] | cancel | delete <index> | tesseract | highlight
Webhook:   webhook load | webhook enable on|off | webhook url <url> | webhook biome on|off
           webhook user <id> | webhook save | webhook test
Keywords:  keyword add <text> | keyword delete <index> | keyword enable|ping <index> on|off
Other:     theme dark|light|toggle | dismiss <id> | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(UiCommand),
    Help,
    Empty,
}

pub fn parse(line: &str) -> anyhow::Result<Input> {
    let line = line.trim();
    let Some((head, rest)) = split_word(line) else {
        return Ok(Input::Empty);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" => UiCommand::Quit,
        "show" => UiCommand::Show,
        "start" | "pause" | "stop" => UiCommand::Control(head.parse().map_err(|e: String| anyhow!(e))?),
        "control" => {
            let action: ControlAction = rest.parse().map_err(|e: String| anyhow!(e))?;
            UiCommand::Control(action)
        }
        "status" => UiCommand::Request(ClientRequest::RequestStatus),
        "results" => UiCommand::Request(ClientRequest::RequestOcrResults),
        "screenshot" => UiCommand::Request(ClientRequest::RequestScreenshot),
        "tab" => UiCommand::SwitchTab(parse_tab(rest)?),
        "ocr" => parse_ocr(rest)?,
        "shot" => UiCommand::TakeScreenshot,
        "display" => {
            let [width, height] = numbers::<2>(rest)?;
            UiCommand::SetDisplaySize(Size::new(width, height))
        }
        "select" => {
            let [x1, y1, x2, y2] = numbers::<4>(rest)?;
            UiCommand::SelectRegion {
                from: Point::new(x1, y1),
                to: Point::new(x2, y2),
            }
        }
        "save" => UiCommand::SaveRegion {
            name: rest.to_string(),
        },
        "cancel" => UiCommand::CancelSelection,
        "delete" => UiCommand::DeleteRegion(index(rest)?),
        "tesseract" => UiCommand::VerifyTesseract,
        "highlight" => UiCommand::ShowHighlights,
        "webhook" => parse_webhook(rest)?,
        "keyword" => parse_keyword(rest)?,
        "theme" => match rest.to_ascii_lowercase().as_str() {
            "dark" => UiCommand::SetTheme { dark: true },
            "light" => UiCommand::SetTheme { dark: false },
            "" | "toggle" => UiCommand::ToggleTheme,
            other => bail!("unknown theme '{other}'"),
        },
        "dismiss" => UiCommand::DismissNotification(
            rest.parse().with_context(|| format!("invalid notification id '{rest}'"))?,
        ),
        other => bail!("unknown command '{other}', try 'help'"),
    };

    Ok(Input::Command(command))
}

fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.split_once(char::is_whitespace) {
        Some((head, rest)) => Some((head, rest.trim())),
        None => Some((text, "")),
    }
}

fn parse_tab(text: &str) -> anyhow::Result<Tab> {
    match text.to_ascii_lowercase().as_str() {
        "control" => Ok(Tab::Control),
        "ocr" | "ocr-settings" => Ok(Tab::OcrSettings),
        "webhook" | "webhook-settings" => Ok(Tab::WebhookSettings),
        other => bail!("unknown tab '{other}'"),
    }
}

fn parse_ocr(text: &str) -> anyhow::Result<UiCommand> {
    match text.to_ascii_lowercase().as_str() {
        "" | "load" => Ok(UiCommand::LoadOcrSettings),
        "on" => Ok(UiCommand::SetOcrEnabled(true)),
        "off" => Ok(UiCommand::SetOcrEnabled(false)),
        other => bail!("unknown ocr command '{other}'"),
    }
}

fn parse_webhook(text: &str) -> anyhow::Result<UiCommand> {
    let (sub, rest) = split_word(text).unwrap_or(("load", ""));

    let command = match sub.to_ascii_lowercase().as_str() {
        "load" => UiCommand::LoadWebhookSettings,
        "save" => UiCommand::SaveWebhook,
        "test" => UiCommand::TestWebhook,
        "enable" => UiCommand::EditWebhook(WebhookField::Enabled(switch(rest)?)),
        "biome" => UiCommand::EditWebhook(WebhookField::BiomeNotifications(switch(rest)?)),
        "url" => UiCommand::EditWebhook(WebhookField::Url(rest.to_string())),
        "user" => UiCommand::EditWebhook(WebhookField::UserId(rest.to_string())),
        other => bail!("unknown webhook command '{other}'"),
    };
    Ok(command)
}

fn parse_keyword(text: &str) -> anyhow::Result<UiCommand> {
    let (sub, rest) = split_word(text).context("keyword needs a subcommand")?;

    let command = match sub.to_ascii_lowercase().as_str() {
        // validation of the text itself happens in the editor
        "add" => UiCommand::AddKeyword(rest.to_string()),
        "delete" => UiCommand::DeleteKeyword(index(rest)?),
        "enable" | "ping" => {
            let (idx, value) = split_word(rest).context("expected <index> on|off")?;
            let flag = if sub.eq_ignore_ascii_case("enable") {
                KeywordFlag::Enabled
            } else {
                KeywordFlag::Ping
            };
            UiCommand::SetKeywordFlag {
                index: index(idx)?,
                flag,
                value: switch(value)?,
            }
        }
        other => bail!("unknown keyword command '{other}'"),
    };
    Ok(command)
}

fn switch(text: &str) -> anyhow::Result<bool> {
    match text.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => bail!("expected on or off, got '{other}'"),
    }
}

fn index(text: &str) -> anyhow::Result<usize> {
    text.parse()
        .with_context(|| format!("invalid index '{text}'"))
}

fn numbers<const N: usize>(text: &str) -> anyhow::Result<[f64; N]> {
    let values = text
        .split_whitespace()
        .map(|v| v.parse::<f64>().with_context(|| format!("invalid number '{v}'")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    values
        .try_into()
        .map_err(|v: Vec<f64>| anyhow!("expected {N} numbers, got {}", v.len()))
}
