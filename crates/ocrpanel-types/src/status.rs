use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro state owned by the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroStatus {
    #[default]
    Stopped,
    Running,
    Paused,
}

impl MacroStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MacroStatus::Stopped => "stopped",
            MacroStatus::Running => "running",
            MacroStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for MacroStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `action` form field sent to `/control`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Start,
    Pause,
    Stop,
}

impl ControlAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlAction::Start => "start",
            ControlAction::Pause => "pause",
            ControlAction::Stop => "stop",
        }
    }
}

impl FromStr for ControlAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(ControlAction::Start),
            "pause" => Ok(ControlAction::Pause),
            "stop" => Ok(ControlAction::Stop),
            other => Err(format!("unknown action '{other}', expected start, pause or stop")),
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
