//! Media group items.

use super::input_file::InputFile;
use serde_json::{Map, Value};

/// Key holding the file of a media item
pub const MEDIA_KEY: &str = "media";

/// The file slot of a media item
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSlot {
    /// A file reference, uploaded alongside the item
    File(InputFile),
    /// A string sent verbatim (file id)
    Text(String),
}

/// One item of a media group (`InputMediaPhoto`, `InputMediaVideo`, ...).
///
/// Keys other than `media` are passed through verbatim into the JSON
/// descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMedia {
    media: MediaSlot,
    fields: Map<String, Value>,
}

impl InputMedia {
    /// Create an item of the given media type
    pub fn new(media_type: &str, media: impl Into<MediaSlot>) -> Self {
        let mut fields = Map::new();
        fields.insert("type".to_string(), Value::String(media_type.to_string()));
        Self {
            media: media.into(),
            fields,
        }
    }

    /// Photo item
    pub fn photo(media: impl Into<MediaSlot>) -> Self {
        Self::new("photo", media)
    }

    /// Video item
    pub fn video(media: impl Into<MediaSlot>) -> Self {
        Self::new("video", media)
    }

    /// Document item
    pub fn document(media: impl Into<MediaSlot>) -> Self {
        Self::new("document", media)
    }

    /// Audio item
    pub fn audio(media: impl Into<MediaSlot>) -> Self {
        Self::new("audio", media)
    }

    /// Animation item
    pub fn animation(media: impl Into<MediaSlot>) -> Self {
        Self::new("animation", media)
    }

    /// Set the caption
    pub fn caption(self, caption: impl Into<String>) -> Self {
        self.field("caption", Value::String(caption.into()))
    }

    /// Set the caption parse mode
    pub fn parse_mode(self, mode: impl Into<String>) -> Self {
        self.field("parse_mode", Value::String(mode.into()))
    }

    /// Set an arbitrary pass-through key
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != MEDIA_KEY {
            self.fields.insert(key, value);
        }
        self
    }

    /// The file slot
    pub fn media(&self) -> &MediaSlot {
        &self.media
    }

    /// Take the file slot
    pub fn into_media(self) -> MediaSlot {
        self.media
    }

    /// The pass-through keys
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// JSON descriptor with the file slot rendered as a string.
    ///
    /// File references become their `attach://` string.
    pub fn to_json(&self) -> Value {
        let media = match &self.media {
            MediaSlot::File(file) => match file.as_file_id() {
                Some(id) => id.to_string(),
                None => file.attach_string(),
            },
            MediaSlot::Text(text) => text.clone(),
        };

        let mut object = self.fields.clone();
        object.insert(MEDIA_KEY.to_string(), Value::String(media));
        Value::Object(object)
    }
}

impl From<InputFile> for MediaSlot {
    fn from(file: InputFile) -> Self {
        Self::File(file)
    }
}

impl From<String> for MediaSlot {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MediaSlot {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_descriptor_with_file_id() {
        let item = InputMedia::photo("AgADBQADqacxG3ZBvVC1iuc3ej").caption("hi");
        assert_eq!(
            item.to_json(),
            json!({"type": "photo", "caption": "hi", "media": "AgADBQADqacxG3ZBvVC1iuc3ej"})
        );
    }

    #[test]
    fn test_descriptor_with_file_reference() {
        let file = InputFile::bytes(b"x".to_vec(), "x.jpg");
        let attach = file.attach_string();
        let item = InputMedia::photo(file);

        assert_eq!(item.to_json(), json!({"type": "photo", "media": attach}));
    }

    #[test]
    fn test_media_key_is_reserved() {
        let item = InputMedia::document("AgADBQADqacxG3ZBvVC1iuc3ej")
            .field("media", json!("overridden"));
        assert_eq!(item.to_json()["media"], json!("AgADBQADqacxG3ZBvVC1iuc3ej"));
    }
}
