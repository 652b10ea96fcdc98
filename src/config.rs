//! Client configuration.
//!
//! Values come from defaults, then environment variables, then command-line
//! flags, each layer overriding the one before.

use crate::conversation::DEFAULT_ERROR_MARKER;
use crate::models::DEFAULT_MODEL;
use crate::stream::DEFAULT_CHUNK_SIZE;

/// Environment variable holding the backend base URL.
pub const ENV_BASE_URL: &str = "CHATSTREAM_BASE_URL";
/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "CHATSTREAM_TOKEN";
/// Environment variable holding the model name.
pub const ENV_MODEL: &str = "CHATSTREAM_MODEL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Configuration for a chat client.
///
/// # Example
///
/// ```ignore
/// use chatstream::config::ChatConfig;
///
/// let config = ChatConfig::from_env()
///     .with_model("gpt-4o")
///     .with_token("secret");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    /// Bearer token sent with every call (optional)
    pub token: Option<String>,
    /// Model name sent in the request body
    pub model: String,
    /// Diagnostic appended to a reply whose stream failed
    pub error_marker: String,
    /// Read size for blocking sources
    pub read_chunk_size: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            model: DEFAULT_MODEL.to_string(),
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
            read_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. A trailing slash is stripped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_error_marker(mut self, marker: impl Into<String>) -> Self {
        self.error_marker = marker.into();
        self
    }

    /// Set the read size for blocking sources (at least one byte).
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }

    /// Defaults overridden by `CHATSTREAM_*` environment variables.
    ///
    /// Empty variables are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env_value(ENV_BASE_URL) {
            config = config.with_base_url(url);
        }
        if let Some(token) = env_value(ENV_TOKEN) {
            config = config.with_token(token);
        }
        if let Some(model) = env_value(ENV_MODEL) {
            config = config.with_model(model);
        }
        config
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_default() {
        let config = ChatConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.token.is_none());
        assert_eq!(config.read_chunk_size, 8192);
        assert_eq!(config.error_marker, DEFAULT_ERROR_MARKER);
    }

    #[test]
    fn test_chat_config_builder() {
        let config = ChatConfig::new()
            .with_base_url("https://chat.example.com/api/")
            .with_token("abc")
            .with_model("gpt-4o")
            .with_error_marker("!")
            .with_read_chunk_size(0);

        assert_eq!(config.base_url, "https://chat.example.com/api");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.error_marker, "!");
        assert_eq!(config.read_chunk_size, 1);
    }
}
