//! HTTP implementation of [`ChatApi`]
//!
//! Builds a single reqwest client with the configured timeout and a JSON
//! content type, and logs each request and response the way a pair of
//! request/response interceptors would.

use crate::api::types::{
    Chat, CreateChatRequest, Message, MessageExchange, SendMessageRequest, UpdateChatRequest,
};
use crate::api::ChatApi;
use crate::config::ApiConfig;
use crate::error::{ChattermError, Result};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// reqwest-backed chat API client
///
/// # Examples
///
/// ```no_run
/// use chatterm::api::{ChatApi, HttpChatApi};
/// use chatterm::config::ApiConfig;
///
/// # async fn example() -> chatterm::error::Result<()> {
/// let api = HttpChatApi::new(&ApiConfig::default())?;
/// let chats = api.list_chats().await?;
/// println!("{} chats", chats.len());
/// # Ok(())
/// # }
/// ```
pub struct HttpChatApi {
    client: Client,
    base: Url,
}

impl HttpChatApi {
    /// Create a client for the backend described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot
    /// be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .user_agent(concat!("chatterm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChattermError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let base = Url::parse(&format!("{}/api", config.base_url.trim_end_matches('/')))
            .map_err(|e| ChattermError::Config(format!("Invalid base URL: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(
                ChattermError::Config(format!("Invalid base URL: {}", config.base_url)).into(),
            );
        }
        tracing::info!(
            "Initialized chat API client: base={}, timeout={}s",
            base,
            config.timeout_seconds
        );

        Ok(Self { client, base })
    }

    /// Base URL every path is appended to (ends in `/api`)
    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    /// URL for `segments` under the base, each segment percent-encoded
    ///
    /// A chat id containing `/`, `?` or `#` stays a single path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request to `segments`, logging both directions, and map
    /// transport failures and non-2xx statuses to [`ChattermError`]
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.endpoint(segments);
        let path = url.path().to_string();
        tracing::debug!("API Request: {} {}", method, path);

        let mut builder = self.client.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("API Request Error: {} {}: {}", method, path, e);
            ChattermError::Transport(if e.is_timeout() {
                format!("Request to {} timed out", path)
            } else {
                format!("Request to {} failed: {}", path, e)
            })
        })?;

        let status = response.status();
        tracing::debug!("API Response: {} {}", status.as_u16(), path);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::error!("API Response Error: {} {}: {}", status.as_u16(), path, message);
            return Err(ChattermError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(response)
    }

    async fn json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T> {
        let response = self.execute(method, segments, body).await?;
        let path = response.url().path().to_string();
        response
            .json::<T>()
            .await
            .map_err(ChattermError::Http)
            .with_context(|| format!("Invalid response from {}", path))
    }
}

/// Pull a human-readable message out of an error body
///
/// The backend reports failures as `{"detail": "..."}`; anything else is
/// passed through when non-empty.
fn error_detail(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return Some(detail.to_string());
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

const NO_BODY: Option<&()> = None;

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn list_chats(&self) -> Result<Vec<Chat>> {
        self.json(Method::GET, &["chats"], NO_BODY).await
    }

    async fn create_chat(&self, title: &str) -> Result<Chat> {
        let body = CreateChatRequest {
            title: title.to_string(),
        };
        self.json(Method::POST, &["chats"], Some(&body)).await
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Chat> {
        self.json(Method::GET, &["chats", chat_id], NO_BODY).await
    }

    async fn update_chat(&self, chat_id: &str, title: &str) -> Result<Chat> {
        let body = UpdateChatRequest {
            title: title.to_string(),
        };
        self.json(Method::PUT, &["chats", chat_id], Some(&body))
            .await
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<()> {
        // Only the status matters; the body is `{"success": true}`.
        self.execute(Method::DELETE, &["chats", chat_id], NO_BODY)
            .await?;
        Ok(())
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        self.json(Method::GET, &["chats", chat_id, "messages"], NO_BODY)
            .await
    }

    async fn send_message(
        &self,
        chat_id: &str,
        request: &SendMessageRequest,
    ) -> Result<MessageExchange> {
        self.json(Method::POST, &["chats", chat_id, "messages"], Some(request))
            .await
    }
}
