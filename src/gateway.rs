//! Outbound messaging gateway
//!
//! Delivers the bot's actions to the chat platform's bot API.

mod error;

pub use error::{GatewayError, GatewayErrorKind};

use crate::runtime::MessagingGateway;
use crate::state_machine::Menu;
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// HTTP client for the platform's bot API
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct Target {
    line_id: Uuid,
    user_id: Uuid,
}

#[derive(Serialize)]
struct MessageRequest<'a> {
    line_id: Uuid,
    user_id: Uuid,
    text: &'a str,
    keyboard: Menu,
}

#[derive(Serialize)]
struct FileRequest<'a> {
    line_id: Uuid,
    user_id: Uuid,
    file_name: &'a str,
    /// Base64-encoded file body
    content: String,
    caption: &'a str,
    keyboard: Menu,
}

impl HttpGateway {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), GatewayError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                GatewayError::network(format!("Connection failed: {e}"))
            } else {
                GatewayError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::rejected(format!(
                "POST {path} returned HTTP {status}: {body}"
            )));
        }

        tracing::debug!(path, %status, "Gateway accepted request");
        Ok(())
    }
}

#[async_trait]
impl MessagingGateway for HttpGateway {
    async fn send_message(
        &self,
        line_id: Uuid,
        user_id: Uuid,
        text: &str,
        menu: Menu,
    ) -> Result<(), GatewayError> {
        self.post(
            "/bot/message",
            &MessageRequest {
                line_id,
                user_id,
                text,
                keyboard: menu,
            },
        )
        .await
    }

    async fn send_document(
        &self,
        line_id: Uuid,
        user_id: Uuid,
        file_name: &str,
        file_path: &Path,
        caption: &str,
        menu: Menu,
    ) -> Result<(), GatewayError> {
        let bytes = tokio::fs::read(file_path).await.map_err(|e| {
            GatewayError::document(format!("Cannot read {}: {e}", file_path.display()))
        })?;

        self.post(
            "/bot/file",
            &FileRequest {
                line_id,
                user_id,
                file_name,
                content: base64::engine::general_purpose::STANDARD.encode(bytes),
                caption,
                keyboard: menu,
            },
        )
        .await
    }

    async fn hide_input_controls(&self, line_id: Uuid, user_id: Uuid) -> Result<(), GatewayError> {
        self.post("/bot/keyboard/hide", &Target { line_id, user_id })
            .await
    }

    async fn close_conversation(&self, line_id: Uuid, user_id: Uuid) -> Result<(), GatewayError> {
        self.post("/bot/treatment/close", &Target { line_id, user_id })
            .await
    }

    async fn transfer_to_agent(&self, line_id: Uuid, user_id: Uuid) -> Result<(), GatewayError> {
        self.post("/bot/treatment/reroute", &Target { line_id, user_id })
            .await
    }
}
