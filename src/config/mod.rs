//! Configuration management for the Telegram client.
//!
//! Supports configuration via:
//! - Explicit values
//! - Environment variables
//! - Builder pattern

use crate::errors::{BotResult, ConfigurationError};
use crate::observability::Redacted;
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Secure wrapper for a bot token (`<bot id>:<secret>`)
#[derive(Clone)]
pub struct BotToken {
    token: SecretString,
    bot_id: u64,
}

impl BotToken {
    /// Create a new token
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigurationError> {
        let token_str = token.into();
        let (id, secret) = token_str.split_once(':').ok_or_else(|| {
            ConfigurationError::InvalidToken("Token must look like <bot id>:<secret>".to_string())
        })?;

        let bot_id = id.parse::<u64>().map_err(|_| {
            ConfigurationError::InvalidToken("Bot id prefix must be numeric".to_string())
        })?;

        if secret.is_empty() || secret.contains('/') {
            return Err(ConfigurationError::InvalidToken(
                "Token secret must be a non-empty path-safe string".to_string(),
            ));
        }

        Ok(Self {
            token: SecretString::new(token_str),
            bot_id,
        })
    }

    /// Numeric bot id encoded in the token
    pub fn bot_id(&self) -> u64 {
        self.bot_id
    }

    /// Expose the token for use in requests
    pub(crate) fn expose(&self) -> &str {
        self.token.expose_secret()
    }

    /// Clone the token as a secret for a request envelope
    pub(crate) fn secret(&self) -> SecretString {
        self.token.clone()
    }
}

impl std::fmt::Debug for BotToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BotToken({}, [REDACTED])", self.bot_id)
    }
}

/// Configuration for the Telegram client
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token for authentication
    pub(crate) token: Option<BotToken>,
    /// Base URL for API requests
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Hand requests to the transport as non-blocking sends
    pub async_requests: bool,
    /// Default headers
    pub default_headers: HeaderMap,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &self.token)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("async_requests", &self.async_requests)
            .field(
                "default_headers",
                &self
                    .default_headers
                    .iter()
                    .map(|(name, value)| (name.as_str(), Redacted::new(value)))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: Url::parse(crate::DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(crate::DEFAULT_CONNECT_TIMEOUT_SECS),
            async_requests: false,
            default_headers: HeaderMap::new(),
        }
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::new()
    }

    /// Create configuration from environment variables
    pub fn from_env() -> BotResult<Self> {
        let mut builder = BotConfigBuilder::new();

        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            builder = builder.token(&token)?;
        }

        if let Ok(url) = std::env::var("TELEGRAM_BASE_URL") {
            builder = builder.base_url(&url)?;
        }

        if let Ok(timeout) = std::env::var("TELEGRAM_TIMEOUT") {
            let secs = timeout.parse::<u64>().map_err(|_| {
                ConfigurationError::EnvVar(format!("TELEGRAM_TIMEOUT is not a number: {}", timeout))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Ok(timeout) = std::env::var("TELEGRAM_CONNECT_TIMEOUT") {
            let secs = timeout.parse::<u64>().map_err(|_| {
                ConfigurationError::EnvVar(format!(
                    "TELEGRAM_CONNECT_TIMEOUT is not a number: {}",
                    timeout
                ))
            })?;
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        if let Ok(flag) = std::env::var("TELEGRAM_ASYNC") {
            builder = builder.async_requests(matches!(flag.as_str(), "1" | "true" | "yes"));
        }

        builder.build()
    }

    /// Get the bot token if available
    pub fn token(&self) -> Option<&BotToken> {
        self.token.as_ref()
    }

    /// Build the full method URL for an endpoint
    pub(crate) fn method_url(&self, endpoint: &str) -> BotResult<String> {
        let token = self.require_token()?;
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        Ok(format!("{}/bot{}/{}", base, token.expose(), path))
    }

    /// Build the download URL for a remote file path
    pub(crate) fn file_url(&self, file_path: &str) -> BotResult<String> {
        let token = self.require_token()?;
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = file_path.trim_start_matches('/');
        Ok(format!("{}/file/bot{}/{}", base, token.expose(), path))
    }

    pub(crate) fn require_token(&self) -> BotResult<&BotToken> {
        self.token
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingToken.into())
    }

    /// Validate the configuration
    pub fn validate(&self) -> BotResult<()> {
        self.require_token()?;

        if self.timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "Timeouts must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Builder for BotConfig
#[derive(Default)]
pub struct BotConfigBuilder {
    config: BotConfig,
}

impl BotConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: BotConfig::default(),
        }
    }

    /// Set the bot token
    pub fn token(mut self, token: &str) -> Result<Self, ConfigurationError> {
        self.config.token = Some(BotToken::new(token)?);
        Ok(self)
    }

    /// Set the base URL
    pub fn base_url(mut self, url: &str) -> Result<Self, ConfigurationError> {
        self.config.base_url =
            Url::parse(url).map_err(|e| ConfigurationError::InvalidConfiguration {
                message: format!("Invalid URL: {}", e),
            })?;
        Ok(self)
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Send requests in non-blocking mode
    pub fn async_requests(mut self, enabled: bool) -> Self {
        self.config.async_requests = enabled;
        self
    }

    /// Add a default header
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        if let Ok(header_name) = name.parse::<http::header::HeaderName>() {
            if let Ok(header_value) = value.parse::<http::header::HeaderValue>() {
                self.config.default_headers.insert(header_name, header_value);
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> BotResult<BotConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build the configuration without validation (for testing)
    pub fn build_unchecked(self) -> BotConfig {
        self.config
    }
}
