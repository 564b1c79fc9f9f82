//! Reply markup (keyboards).
//!
//! Markup values travel as a JSON string field; [`ReplyMarkup`]'s `Display`
//! implementation produces that string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Button of an inline keyboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    /// Label text
    pub text: String,
    /// URL opened by the button
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Data sent in a callback query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
}

impl InlineKeyboardButton {
    /// Button sending callback data
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            callback_data: Some(data.into()),
        }
    }

    /// Button opening a URL
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            callback_data: None,
        }
    }
}

/// Button of a reply keyboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardButton {
    /// Label text, sent as a message when pressed
    pub text: String,
    /// Share the user's phone number
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub request_contact: bool,
    /// Share the user's location
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub request_location: bool,
}

impl KeyboardButton {
    /// Plain text button
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: false,
            request_location: false,
        }
    }
}

/// Reply markup attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    /// Keyboard attached to the message itself
    InlineKeyboard {
        /// Rows of buttons
        inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
    },
    /// Custom reply keyboard
    ReplyKeyboard {
        /// Rows of buttons
        keyboard: Vec<Vec<KeyboardButton>>,
        /// Shrink the keyboard to fit its buttons
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        resize_keyboard: bool,
        /// Hide the keyboard after one use
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        one_time_keyboard: bool,
    },
    /// Remove the current reply keyboard
    ReplyKeyboardRemove {
        /// Always true
        remove_keyboard: bool,
    },
    /// Force a reply from the user
    ForceReply {
        /// Always true
        force_reply: bool,
    },
}

impl ReplyMarkup {
    /// Inline keyboard from rows of buttons
    pub fn inline(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self::InlineKeyboard {
            inline_keyboard: rows,
        }
    }

    /// Reply keyboard from rows of buttons
    pub fn keyboard(rows: Vec<Vec<KeyboardButton>>) -> Self {
        Self::ReplyKeyboard {
            keyboard: rows,
            resize_keyboard: false,
            one_time_keyboard: false,
        }
    }

    /// Remove the reply keyboard
    pub fn remove() -> Self {
        Self::ReplyKeyboardRemove {
            remove_keyboard: true,
        }
    }

    /// Force a reply
    pub fn force_reply() -> Self {
        Self::ForceReply { force_reply: true }
    }

    /// Shrink a reply keyboard to fit; no effect on other markups
    pub fn resized(mut self) -> Self {
        if let Self::ReplyKeyboard {
            resize_keyboard, ..
        } = &mut self
        {
            *resize_keyboard = true;
        }
        self
    }

    /// Hide a reply keyboard after use; no effect on other markups
    pub fn one_time(mut self) -> Self {
        if let Self::ReplyKeyboard {
            one_time_keyboard, ..
        } = &mut self
        {
            *one_time_keyboard = true;
        }
        self
    }
}

impl fmt::Display for ReplyMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
