use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub(crate) const SERVER_URL_VAR: &str = "OCRPANEL_SERVER_URL";

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// REST side of the server connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL the panel talks to, e.g. `http://127.0.0.1:5000`
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl NetworkConfig {
    pub fn new() -> Self {
        let server_url = env::var(SERVER_URL_VAR).unwrap_or_else(|_| default_server_url());

        let request_timeout_ms = env::var("OCRPANEL_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_request_timeout_ms);

        Self {
            server_url,
            request_timeout_ms,
        }
    }

    /// Server URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = NetworkConfig {
            server_url: "http://10.0.0.2:5000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://10.0.0.2:5000");
    }
}
