use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ocrpanel_core::{RegionDeletion, SettingsBackend};
use ocrpanel_types::{
    ControlAction, ControlReply, DeleteRegionRequest, HighlightedScreenshot, MacroStatus,
    OcrResults, OcrSettings, Region, ScreenshotPayload, SettingsEnvelope, StatusReply,
    TesseractReport, TestWebhookRequest, WebhookEnvelope, WebhookSettings, WebhookTestReport,
};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, error_message};

/// Client for the panel server's REST endpoints
#[derive(Clone)]
pub struct PanelClient {
    base_url: String,
    client: reqwest::Client,
}

impl PanelClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("GET {path}");
        let response = self.client.get(self.url(path)).send().await?;
        read_success(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {path}");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        read_success(path, response).await
    }

    /// POST whose reply body is meaningful even on error statuses
    async fn post_json_any_status<B, T>(&self, path: &str, body: &B) -> Result<(StatusCode, T), ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {path}");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str(&text) {
            Ok(value) => Ok((status, value)),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status,
                message: error_message(&text),
            }),
            Err(source) => Err(ApiError::Decode {
                endpoint: path.to_string(),
                source,
            }),
        }
    }
}

async fn read_success<T>(endpoint: &str, response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            message: error_message(&text),
        });
    }

    decode(endpoint, &text)
}

fn decode<T>(endpoint: &str, text: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(text).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

#[async_trait]
impl SettingsBackend for PanelClient {
    async fn ocr_settings(&self) -> Result<OcrSettings> {
        Ok(self.get("/ocr_settings").await?)
    }

    async fn save_ocr_settings(&self, settings: &OcrSettings) -> Result<OcrSettings> {
        let mut reply: serde_json::Value = self.post_json("/ocr_settings", settings).await?;

        // The server wraps the stored settings; accept a bare object as well
        let stored = match reply.get_mut("settings") {
            Some(inner) => inner.take(),
            None => reply,
        };
        serde_json::from_value(stored).context("Unexpected response from /ocr_settings")
    }

    async fn screenshot(&self) -> Result<String> {
        let payload: ScreenshotPayload = self.get("/screenshot").await?;
        Ok(payload.screenshot)
    }

    async fn highlighted_screenshot(&self) -> Result<HighlightedScreenshot> {
        let response = self
            .client
            .get(self.url("/highlighted_screenshot"))
            .send()
            .await
            .map_err(ApiError::from)?;
        let text = response.text().await.map_err(ApiError::from)?;
        Ok(decode("/highlighted_screenshot", &text)?)
    }

    async fn add_ocr_region(&self, region: &Region) -> Result<OcrSettings> {
        let reply: SettingsEnvelope = self.post_json("/add_ocr_region", region).await?;
        Ok(reply.settings)
    }

    async fn delete_ocr_region(&self, index: usize) -> Result<RegionDeletion> {
        let (status, reply): (_, SettingsEnvelope) = self
            .post_json_any_status("/delete_ocr_region", &DeleteRegionRequest { index })
            .await?;

        Ok(RegionDeletion {
            settings: reply.settings,
            message: reply.message,
            removed: status.is_success(),
        })
    }

    async fn verify_tesseract(&self) -> Result<TesseractReport> {
        Ok(self.get("/verify_tesseract").await?)
    }

    async fn ocr_results(&self) -> Result<OcrResults> {
        Ok(self.get("/ocr_results").await?)
    }

    async fn status(&self) -> Result<MacroStatus> {
        let reply: StatusReply = self.get("/status").await?;
        Ok(reply.status)
    }

    async fn webhook_settings(&self) -> Result<WebhookSettings> {
        Ok(self.get("/webhook_settings").await?)
    }

    async fn save_webhook_settings(&self, settings: &WebhookSettings) -> Result<WebhookSettings> {
        let reply: WebhookEnvelope = self.post_json("/webhook_settings", settings).await?;
        Ok(reply.webhook)
    }

    async fn test_webhook(&self, url: &str) -> Result<WebhookTestReport> {
        let request = TestWebhookRequest {
            url: url.to_string(),
        };
        let (_, report) = self.post_json_any_status("/test_webhook", &request).await?;
        Ok(report)
    }

    async fn control(&self, action: ControlAction) -> Result<ControlReply> {
        tracing::debug!("POST /control action={action}");
        let response = self
            .client
            .post(self.url("/control"))
            .form(&[("action", action.as_str())])
            .send()
            .await
            .map_err(ApiError::from)?;
        Ok(read_success("/control", response).await?)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Answer exactly one HTTP request with `status` and a JSON `body`,
    /// handing back the raw request text
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let reply = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..split]
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= split + 4 + length
    }

    fn client(url: &str) -> PanelClient {
        PanelClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn save_ocr_settings_unwraps_envelope() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"message":"OCR settings saved successfully","settings":{"enabled":true,"regions":[]}}"#,
        )
        .await;

        let stored = client(&url)
            .save_ocr_settings(&OcrSettings {
                enabled: true,
                regions: vec![],
            })
            .await
            .unwrap();

        assert!(stored.enabled);
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /ocr_settings "));
        assert!(request.contains(r#""enabled":true"#));
    }

    #[tokio::test]
    async fn delete_with_bad_index_still_returns_settings() {
        let (url, server) = serve_once(
            "400 Bad Request",
            r#"{"message":"Invalid region index","settings":{"enabled":false,"regions":[{"name":"A","x1":0,"y1":0,"x2":20,"y2":20}]}}"#,
        )
        .await;

        let deletion = client(&url).delete_ocr_region(7).await.unwrap();

        assert!(!deletion.removed);
        assert_eq!(deletion.settings.regions.len(), 1);
        assert!(server.await.unwrap().contains(r#"{"index":7}"#));
    }

    #[tokio::test]
    async fn failed_webhook_test_is_a_report_not_an_error() {
        let (url, _server) = serve_once(
            "500 Internal Server Error",
            r#"{"success":false,"status_code":404,"message":"Webhook test failed with status 404","response":"Unknown Webhook"}"#,
        )
        .await;

        let report = client(&url).test_webhook("https://discord.com/api/webhooks/x").await.unwrap();
        assert!(!report.success);
        assert_eq!(report.status_code, Some(404));
    }

    #[tokio::test]
    async fn control_sends_form_field() {
        let (url, server) =
            serve_once("200 OK", r#"{"status":"paused","message":"Macro paused"}"#).await;

        let reply = client(&url).control(ControlAction::Pause).await.unwrap();
        assert_eq!(reply.message, "Macro paused");
        assert_eq!(reply.status, Some(MacroStatus::Paused));

        let request = server.await.unwrap();
        assert!(request.contains("application/x-www-form-urlencoded"));
        assert!(request.ends_with("action=pause"));
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let (url, _server) = serve_once(
            "500 Internal Server Error",
            r#"{"error":"Failed to save region: permission denied"}"#,
        )
        .await;

        let region = Region {
            name: "Biome".to_string(),
            x1: 0,
            y1: 0,
            x2: 10,
            y2: 10,
        };
        let err = client(&url).add_ocr_region(&region).await.unwrap_err();
        assert!(err.to_string().contains("permission denied"));
    }
}
