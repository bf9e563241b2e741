//! Moonlight backend client
//!
//! The chat call is the only request the session depends on. Health and tool
//! listings are informational and only used by the REPL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{EndpointError, EndpointResult};

const CHAT_PATH: &str = "/api/chat";
const HEALTH_PATH: &str = "/api/health";
const TOOLS_PATH: &str = "/api/tools";

/// Request body for `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    pub enable_tools: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Successful reply from `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub tool_used: Option<String>,
    /// False when the backend answered with a clarification instead of
    /// running the requested tool. Still a reply as far as the transcript
    /// is concerned.
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

/// `GET /api/health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub app: Option<String>,
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// One entry of `GET /api/tools`
#[derive(Debug, Clone, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub category: String,
    pub enabled: bool,
}

/// Something that can answer a chat request
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> EndpointResult<ChatReply>;

    /// Short label for logs and the status line
    fn describe(&self) -> String;
}

/// HTTP client for the Moonlight backend
pub struct HttpChatEndpoint {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChatEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe backend health with a short timeout
    pub async fn health(&self) -> EndpointResult<HealthStatus> {
        let timeout = Duration::from_secs(3);
        let response = self
            .http
            .get(self.url(HEALTH_PATH))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| timeout_or_transport(e, timeout))?;
        decode_body(response).await
    }

    /// List tools the backend can invoke
    pub async fn list_tools(&self) -> EndpointResult<Vec<ToolInfo>> {
        let response = self.http.get(self.url(TOOLS_PATH)).send().await?;
        decode_body(response).await
    }
}

#[async_trait]
impl ChatEndpoint for HttpChatEndpoint {
    async fn chat(&self, request: &ChatRequest) -> EndpointResult<ChatReply> {
        tracing::debug!(
            "POST {} (user={}, tools={})",
            CHAT_PATH,
            request.user_id,
            request.enable_tools
        );

        let response = self
            .http
            .post(self.url(CHAT_PATH))
            .json(request)
            .send()
            .await?;

        // Status classes are not inspected: whatever decodes as a reply is one.
        decode_body(response).await
    }

    fn describe(&self) -> String {
        self.url(CHAT_PATH)
    }
}

async fn decode_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> EndpointResult<T> {
    let status = response.status();
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::debug!("Undecodable response ({}): {}", status, body);
        EndpointError::decode(format!("{} ({})", e, status))
    })
}

fn timeout_or_transport(err: reqwest::Error, timeout: Duration) -> EndpointError {
    if err.is_timeout() {
        EndpointError::Timeout(timeout)
    } else {
        EndpointError::Transport(err)
    }
}
