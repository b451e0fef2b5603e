use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::network::NetworkConfig;

fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/socket.io/".to_string()
}

fn default_reconnect_initial_ms() -> u64 {
    500
}

fn default_reconnect_max_ms() -> u64 {
    5_000
}

/// Realtime channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Socket.IO mount path on the server
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_reconnect_initial_ms")]
    pub reconnect_initial_ms: u64,
    #[serde(default = "default_reconnect_max_ms")]
    pub reconnect_max_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_path(),
            reconnect_initial_ms: default_reconnect_initial_ms(),
            reconnect_max_ms: default_reconnect_max_ms(),
        }
    }
}

impl RealtimeConfig {
    /// Websocket URL of the Engine.IO endpoint on the configured server
    pub fn url(&self, network: &NetworkConfig) -> String {
        let base = network.base_url();
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };

        let path = self.path.trim_matches('/');
        format!("{base}/{path}/?EIO=4&transport=websocket")
    }

    pub fn reconnect_initial(&self) -> Duration {
        Duration::from_millis(self.reconnect_initial_ms)
    }

    pub fn reconnect_max(&self) -> Duration {
        Duration::from_millis(self.reconnect_max_ms.max(self.reconnect_initial_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_base_becomes_engine_io_websocket_url() {
        let network = NetworkConfig {
            server_url: "http://127.0.0.1:5000/".to_string(),
            ..Default::default()
        };
        let url = RealtimeConfig::default().url(&network);
        assert_eq!(url, "ws://127.0.0.1:5000/socket.io/?EIO=4&transport=websocket");
    }

    #[test]
    fn https_base_uses_wss() {
        let network = NetworkConfig {
            server_url: "https://panel.example".to_string(),
            ..Default::default()
        };
        assert!(RealtimeConfig::default().url(&network).starts_with("wss://panel.example/"));
    }
}
