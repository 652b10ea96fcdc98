//! Reqwest-based chat transport adapter.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tracing::debug;

use crate::config::ChatConfig;
use crate::error::TransportError;
use crate::models::ChatRequest;
use crate::traits::{ByteStream, ChatTransport};

/// Streaming chat transport using reqwest.
///
/// Posts the request as JSON to `{base_url}/conversations/{id}/chat` and
/// hands back the response body as raw chunks.
///
/// # Example
///
/// ```ignore
/// use chatstream::adapters::ReqwestTransport;
///
/// let transport = ReqwestTransport::new("http://localhost:8000/api/v1")
///     .with_token("secret");
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a transport around a preconfigured reqwest::Client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Create a transport from the base URL and token of `config`.
    pub fn from_config(config: &ChatConfig) -> Self {
        let transport = Self::new(config.base_url.clone());
        match &config.token {
            Some(token) => transport.with_token(token.clone()),
            None => transport,
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self, conversation_id: i64) -> String {
        format!("{}/conversations/{}/chat", self.base_url, conversation_id)
    }
}

#[async_trait]
impl ChatTransport for ReqwestTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, TransportError> {
        let url = self.chat_url(request.conversation_id);
        debug!(url = %url, model = %request.model_name, "Opening chat stream");

        let mut builder = self
            .client
            .post(&url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Status { status, message });
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(TransportError::from));
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let transport = ReqwestTransport::new("http://localhost:8000/api/v1/");
        assert_eq!(transport.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            transport.chat_url(9),
            "http://localhost:8000/api/v1/conversations/9/chat"
        );
    }

    #[test]
    fn test_from_config_carries_token() {
        let config = ChatConfig::new()
            .with_base_url("http://example.com")
            .with_token("t0k");
        let transport = ReqwestTransport::from_config(&config);
        assert_eq!(transport.token.as_deref(), Some("t0k"));
        assert_eq!(transport.base_url(), "http://example.com");
    }

    #[tokio::test]
    async fn test_open_stream_connection_refused() {
        let transport = ReqwestTransport::new("http://127.0.0.1:59999");
        let result = transport.open_stream(&ChatRequest::new(1, "hi")).await;
        assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    }
}
