//! Error types for the Telegram client.
//!
//! Validation failures are raised before any request leaves the process;
//! transport failures are passed through untouched. Nothing in this crate
//! retries or substitutes defaults on error.

use thiserror::Error;

/// Result type for Telegram operations
pub type BotResult<T> = Result<T, BotError>;

/// Root error type for the Telegram integration
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Request validation error
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// File source error
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response parsing error
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// The Bot API answered with `ok: false`
    #[error("API error: {error_code} - {description}")]
    Api {
        /// Error code reported by the Bot API
        error_code: i64,
        /// Human readable description
        description: String,
    },
}

impl BotError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "TELEGRAM_CONFIG",
            Self::Request(_) => "TELEGRAM_REQUEST",
            Self::File(_) => "TELEGRAM_FILE",
            Self::Transport(_) => "TELEGRAM_TRANSPORT",
            Self::Response(_) => "TELEGRAM_RESPONSE",
            Self::Api { .. } => "TELEGRAM_API",
        }
    }

    /// Whether the error was raised while validating a request, before any I/O
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    /// Create an API error from a Bot API error response
    pub fn from_api_error(error_code: Option<i64>, description: Option<&str>) -> Self {
        Self::Api {
            error_code: error_code.unwrap_or_default(),
            description: description.unwrap_or("Unknown error").to_string(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Missing token
    #[error("Bot token is missing")]
    MissingToken,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidToken(String),

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(String),
}

/// Request validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The designated upload field is absent from the parameters
    #[error("Missing upload parameter: {field}")]
    MissingUploadParam {
        /// Name of the file field
        field: String,
    },

    /// A value under the upload field is neither a file id nor a file reference
    #[error("Invalid input file entity: {field}")]
    InvalidInputFileEntity {
        /// Field label, with `#N` suffix for list members
        field: String,
    },

    /// A structured value could not be JSON encoded
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

/// File source errors
#[derive(Error, Debug)]
pub enum FileError {
    /// The byte source of an input file could not be read
    #[error("Unreadable source {source_name}: {message}")]
    UnreadableSource {
        /// Path, URL, or attach name of the source
        source_name: String,
        /// Error message
        message: String,
    },

    /// A downloaded file could not be written
    #[error("Failed to write {path}: {message}")]
    Write {
        /// Destination path
        path: String,
        /// Error message
        message: String,
    },
}

/// Transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection failed
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message
        message: String,
    },

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// Non-JSON response with an error status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::ConnectionFailed {
                message: err.to_string(),
            }
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

/// Response parsing errors
#[derive(Error, Debug)]
pub enum ResponseError {
    /// JSON deserialization error
    #[error("Deserialization error: {message}")]
    DeserializationError {
        /// Error message
        message: String,
    },

    /// Unexpected response format
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Error message
        message: String,
    },
}

impl From<serde_json::Error> for ResponseError {
    fn from(err: serde_json::Error) -> Self {
        ResponseError::DeserializationError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors() {
        let err = BotError::from(RequestError::MissingUploadParam {
            field: "photo".to_string(),
        });
        assert!(err.is_validation_error());
        assert_eq!(err.error_code(), "TELEGRAM_REQUEST");
        assert_eq!(
            err.to_string(),
            "Request error: Missing upload parameter: photo"
        );

        let err = BotError::Transport(TransportError::Timeout);
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_from_api_error() {
        assert!(matches!(
            BotError::from_api_error(Some(400), Some("Bad Request: chat not found")),
            BotError::Api { error_code: 400, description } if description == "Bad Request: chat not found"
        ));

        assert!(matches!(
            BotError::from_api_error(None, None),
            BotError::Api { error_code: 0, description } if description == "Unknown error"
        ));
    }
}
