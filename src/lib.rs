//! Telegram Bot API Client
//!
//! HTTP client layer for the Telegram Bot API with:
//! - Parameter normalization into URL-encoded or multipart bodies
//! - File uploads from paths, buffers, URLs, or stored file ids
//! - Media groups with `attach://` cross references
//! - A request dispatcher that keeps the most recent response
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use telegram_client::types::{InputFile, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create client from environment
//!     let mut client = telegram_client::create_client_from_env()?;
//!
//!     // Upload a photo
//!     let params = Params::new()
//!         .with("chat_id", 1001)
//!         .with("photo", InputFile::path("/tmp/a.jpg"));
//!     let response = client.upload_file("sendPhoto", params, "photo").await?;
//!
//!     println!("Sent: {:?}", response.result());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `rustls` - Use rustls for TLS (default)
//! - `native-tls` - Use the platform TLS stack

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Core modules
pub mod client;
pub mod config;
pub mod errors;
pub mod request;
pub mod transport;
pub mod types;

// Observability
pub mod observability;

// Testing utilities
pub mod fixtures;
pub mod mocks;

// Tests
#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use client::BotClient;
pub use config::{BotConfig, BotConfigBuilder, BotToken};
pub use errors::{BotError, BotResult};
pub use request::{build_multipart, normalize, RequestBody};
pub use types::{InputFile, InputMedia, Params, ReplyMarkup};

/// Default base URL for the Bot API
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Create a Telegram client with the given configuration
pub fn create_client(config: BotConfig) -> BotResult<BotClient> {
    BotClient::new(config)
}

/// Create a Telegram client from environment variables
///
/// Reads:
/// - `TELEGRAM_BOT_TOKEN` - Bot token (`<bot id>:<secret>`)
/// - `TELEGRAM_BASE_URL` - API base URL, for self-hosted Bot API servers
/// - `TELEGRAM_TIMEOUT` - Request timeout in seconds
/// - `TELEGRAM_CONNECT_TIMEOUT` - Connect timeout in seconds
/// - `TELEGRAM_ASYNC` - Non-blocking sends (`1`, `true`, or `yes`)
pub fn create_client_from_env() -> BotResult<BotClient> {
    let config = BotConfig::from_env()?;
    create_client(config)
}
