//! Call parameters.

use super::input_file::InputFile;
use super::input_media::InputMedia;
use super::keyboard::ReplyMarkup;
use crate::errors::RequestError;
use serde::Serialize;
use serde_json::Value;

/// A single parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Explicit absence; dropped from every body
    Null,
    /// Text
    Text(String),
    /// Integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Nested structure, JSON encoded on the wire
    Json(Value),
    /// File reference
    File(InputFile),
    /// Reply markup, sent as its string form
    Markup(ReplyMarkup),
    /// Media group item
    Media(InputMedia),
    /// List of values
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// JSON value of any serializable structure
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> Result<Self, RequestError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| RequestError::Serialization {
                message: e.to_string(),
            })
    }

    /// Whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Json(Value::Null))
    }

    /// JSON rendering, with file references as their attach strings
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(text) => Value::String(text.clone()),
            Self::Integer(n) => Value::from(*n),
            Self::Float(n) => Value::from(*n),
            Self::Bool(b) => Value::Bool(*b),
            Self::Json(value) => value.clone(),
            Self::File(file) => Value::String(
                file.as_file_id()
                    .map(String::from)
                    .unwrap_or_else(|| file.attach_string()),
            ),
            Self::Markup(markup) => {
                serde_json::to_value(markup).unwrap_or_else(|_| Value::String(markup.to_string()))
            }
            Self::Media(media) => media.to_json(),
            Self::List(items) => Value::Array(items.iter().map(ParamValue::to_json).collect()),
        }
    }

    /// Scalar string rendering used for form fields and text parts.
    ///
    /// Returns `None` for null values.
    pub fn to_field_string(&self) -> Option<String> {
        match self {
            Self::Null | Self::Json(Value::Null) => None,
            Self::Text(text) => Some(text.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Json(Value::String(text)) => Some(text.clone()),
            Self::Markup(markup) => Some(markup.to_string()),
            Self::File(file) => Some(file.form_value().unwrap_or_else(|| file.attach_string())),
            Self::Json(_) | Self::Media(_) | Self::List(_) => Some(self.to_json().to_string()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<InputFile> for ParamValue {
    fn from(value: InputFile) -> Self {
        Self::File(value)
    }
}

impl From<ReplyMarkup> for ParamValue {
    fn from(value: ReplyMarkup) -> Self {
        Self::Markup(value)
    }
}

impl From<InputMedia> for ParamValue {
    fn from(value: InputMedia) -> Self {
        Self::Media(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Ordered call parameters with unique names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Create empty parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style insert of a serializable structure
    pub fn try_with<T: Serialize + ?Sized>(
        self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, RequestError> {
        Ok(self.with(name, ParamValue::serialized(value)?))
    }

    /// Insert a value, replacing an existing one in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Look up a value for in-place changes
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParamValue> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Whether a name is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a value
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
