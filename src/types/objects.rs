//! Bot API objects returned by the convenience methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user or bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Whether this user is a bot
    #[serde(default)]
    pub is_bot: bool,
    /// First name
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Username
    #[serde(default)]
    pub username: Option<String>,
}

/// A chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier
    pub id: i64,
    /// `private`, `group`, `supergroup`, or `channel`
    #[serde(rename = "type")]
    pub kind: String,
    /// Title, for groups and channels
    #[serde(default)]
    pub title: Option<String>,
    /// Username, for private chats and public channels
    #[serde(default)]
    pub username: Option<String>,
}

/// One size of a photo or thumbnail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoSize {
    /// Identifier usable to download or reuse the file
    pub file_id: String,
    /// Identifier stable across bots
    pub file_unique_id: String,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

/// A message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier inside the chat
    pub message_id: i64,
    /// Sender
    #[serde(default)]
    pub from: Option<User>,
    /// Time the message was sent
    #[serde(with = "chrono::serde::ts_seconds")]
    pub date: DateTime<Utc>,
    /// Conversation the message belongs to
    pub chat: Chat,
    /// Text of a text message
    #[serde(default)]
    pub text: Option<String>,
    /// Caption of a media message
    #[serde(default)]
    pub caption: Option<String>,
    /// Media group the message belongs to
    #[serde(default)]
    pub media_group_id: Option<String>,
    /// Sizes of an attached photo
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
}

/// A file ready to be downloaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Identifier usable to download or reuse the file
    pub file_id: String,
    /// Identifier stable across bots
    pub file_unique_id: String,
    /// Size in bytes
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Path relative to the file download endpoint
    #[serde(default)]
    pub file_path: Option<String>,
}
