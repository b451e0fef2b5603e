use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_notification_ttl_ms() -> u64 {
    3_000
}

fn default_tick_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a notification stays before it is dismissed automatically
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
    /// Event loop housekeeping interval
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Overrides the location of the local preferences file (theme)
    pub preferences_path: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_ttl_ms: default_notification_ttl_ms(),
            tick_ms: default_tick_ms(),
            preferences_path: None,
        }
    }
}

impl UiConfig {
    pub fn new() -> Self {
        let preferences_path = env::var("OCRPANEL_PREFERENCES").ok().map(PathBuf::from);

        Self {
            preferences_path,
            ..Default::default()
        }
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }

    /// Preferences file: the override, or `<config dir>/ocrpanel/preferences.json`
    pub fn preferences_file(&self) -> PathBuf {
        if let Some(path) = &self.preferences_path {
            return path.clone();
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ocrpanel")
            .join("preferences.json")
    }
}
