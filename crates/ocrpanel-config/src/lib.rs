use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use self::network::NetworkConfig;
use self::realtime::RealtimeConfig;
use self::ui::UiConfig;

pub mod network;
pub mod realtime;
pub mod ui;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub realtime: RealtimeConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Build from environment variables, falling back to defaults
    pub fn new() -> Self {
        Config {
            network: NetworkConfig::new(),
            realtime: RealtimeConfig::default(),
            ui: UiConfig::new(),
        }
    }

    /// Load `.env`, then either a JSON config file or the environment.
    ///
    /// `OCRPANEL_SERVER_URL` still wins over the file so a profile can be
    /// pointed at another machine without editing it.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!("Failed to read .env: {e}");
        }

        let Some(path) = path else {
            return Ok(Self::new());
        };

        tracing::info!("Loading config from {}", path.display());
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Ok(url) = std::env::var(network::SERVER_URL_VAR) {
            config.network.server_url = url;
        }

        Ok(config)
    }
}
