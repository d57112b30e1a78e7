// src/services/chatbot.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::ClientConfig,
    error::{ChatError, ConfigError},
    message::{ChatRequest, ChatResponse},
};

/// Path of the chatbot endpoint, relative to the base URL.
pub const CHATBOT_PATH: &str = "chatbot";

/// Anything that can deliver a chat message and hand back the bot's reply.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
}

/// HTTP client for the remote chatbot.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ChatApiClient {
    http: Client,
    endpoint: Url,
}

impl ChatApiClient {
    /// Builds a transport from `config` and points it at the chatbot endpoint.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build()?;

        Self::with_http_client(http, &config.base_url)
    }

    /// Uses an existing transport. `base_url` is treated as a directory even
    /// without a trailing slash.
    pub fn with_http_client(http: Client, base_url: &Url) -> Result<Self, ConfigError> {
        let base = ClientConfig::new(base_url.as_str())?.base_url;
        let endpoint = base
            .join(CHATBOT_PATH)
            .map_err(|source| ConfigError::InvalidUrl {
                value: base.to_string(),
                source,
            })?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one message. Exactly one `POST` is issued per call; nothing is
    /// sent until the returned future is polled, and dropping it cancels the
    /// request.
    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        debug!(endpoint = %self.endpoint, "sending chat message");

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = res.status();
        debug!(%status, "chatbot responded");

        if !status.is_success() {
            let body = match res.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(error = %e, "could not read error body");
                    String::new()
                }
            };
            warn!(%status, "chatbot returned an error status");
            return Err(ChatError::Protocol { status, body });
        }

        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "chatbot reply did not match the expected shape");
            ChatError::Serialization(e)
        })
    }
}

#[async_trait]
impl ChatApi for ChatApiClient {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        ChatApiClient::send_message(self, request).await
    }
}
