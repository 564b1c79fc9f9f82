//! Test fixtures for Bot API responses.
//!
//! Provides realistic test data for unit tests.

use crate::config::{BotConfig, BotConfigBuilder};
use std::time::Duration;

/// Token used across fixtures
pub const TOKEN: &str = "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11";

/// A stored photo id
pub const PHOTO_FILE_ID: &str = "AgACAgIAAxkBAAIBY2Zg5W7Qm9K3pKx2";

/// A stored document id
pub const DOCUMENT_FILE_ID: &str = "BQACAgIAAxkBAAIBZGZg5XJ0Aq1Rb8sF";

/// Create a fixture configuration pointing at `base_url`
pub fn config(base_url: &str) -> BotConfig {
    BotConfigBuilder::new()
        .token(TOKEN)
        .and_then(|builder| builder.base_url(base_url))
        .map(|builder| {
            builder
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(5))
                .build_unchecked()
        })
        .unwrap_or_default()
}

/// Create fixture JSON responses
pub mod responses {
    use super::*;
    use serde_json::{json, Value};

    /// Create an OK response around `result`
    pub fn ok(result: Value) -> Value {
        json!({ "ok": true, "result": result })
    }

    /// Create a getMe response
    pub fn get_me() -> Value {
        ok(json!({
            "id": 123456,
            "is_bot": true,
            "first_name": "Fixture Bot",
            "username": "fixture_bot",
            "can_join_groups": true,
            "can_read_all_group_messages": false,
            "supports_inline_queries": false
        }))
    }

    /// Create a sendMessage response
    pub fn message(text: &str) -> Value {
        ok(json!({
            "message_id": 42,
            "from": { "id": 123456, "is_bot": true, "first_name": "Fixture Bot" },
            "chat": { "id": 1001, "type": "private", "first_name": "Jane" },
            "date": 1700000000,
            "text": text
        }))
    }

    /// Create a sendPhoto response
    pub fn photo_message() -> Value {
        ok(json!({
            "message_id": 43,
            "chat": { "id": 1001, "type": "private" },
            "date": 1700000001,
            "photo": [
                { "file_id": PHOTO_FILE_ID, "file_unique_id": "AQADY2", "width": 90, "height": 90 }
            ]
        }))
    }

    /// Create a sendMediaGroup response with `count` messages
    pub fn media_group(count: usize) -> Value {
        let messages: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "message_id": 50 + i,
                    "media_group_id": "13579",
                    "chat": { "id": 1001, "type": "private" },
                    "date": 1700000002
                })
            })
            .collect();
        ok(Value::Array(messages))
    }

    /// Create a getFile response
    pub fn get_file(file_path: &str) -> Value {
        ok(json!({
            "file_id": DOCUMENT_FILE_ID,
            "file_unique_id": "AgADZG",
            "file_size": 2048,
            "file_path": file_path
        }))
    }

    /// Create an error response
    pub fn error(code: i64, description: &str) -> Value {
        json!({
            "ok": false,
            "error_code": code,
            "description": description
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::is_file_id;

    #[test]
    fn test_config_fixture() {
        let config = config("http://localhost:8081");
        assert_eq!(config.token().map(|t| t.bot_id()), Some(123456));
        assert_eq!(config.base_url.as_str(), "http://localhost:8081/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_id_fixtures() {
        assert!(is_file_id(PHOTO_FILE_ID));
        assert!(is_file_id(DOCUMENT_FILE_ID));
    }

    #[test]
    fn test_response_fixtures() {
        assert_eq!(responses::get_me()["result"]["username"], "fixture_bot");
        assert_eq!(responses::media_group(3)["result"].as_array().map(Vec::len), Some(3));
        assert_eq!(responses::error(400, "Bad Request")["ok"], false);
    }
}
