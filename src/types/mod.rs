//! Common types for the Telegram Bot API.
//!
//! Defines call parameters, file references, media items, keyboards, and
//! the response objects decoded by the convenience methods.

pub mod input_file;
pub mod input_media;
pub mod keyboard;
pub mod objects;
pub mod params;

pub use input_file::*;
pub use input_media::*;
pub use keyboard::*;
pub use objects::*;
pub use params::*;

/// A value that callers may supply either singly or as a list.
///
/// The shape is resolved once at the boundary with [`OneOrMany::into_vec`],
/// which also reports whether the original value was singular so it can be
/// restored on output.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    /// A single item
    One(T),
    /// A list of items
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Whether the value was supplied singly
    pub fn is_one(&self) -> bool {
        matches!(self, Self::One(_))
    }

    /// Normalize into a list, returning the original shape flag
    pub fn into_vec(self) -> (Vec<T>, bool) {
        match self {
            Self::One(item) => (vec![item], true),
            Self::Many(items) => (items, false),
        }
    }

    /// Borrowing view of the items as a list
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    /// Restore the original shape from a list
    ///
    /// A single-shaped value is collapsed only when exactly one item remains.
    pub fn from_vec(mut items: Vec<T>, was_one: bool) -> Self {
        if was_one && items.len() == 1 {
            Self::One(items.remove(0))
        } else {
            Self::Many(items)
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(item: T) -> Self {
        Self::One(item)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items)
    }
}

/// Whether a string looks like a platform-issued file identifier.
///
/// File ids are opaque base64url tokens: at least 20 characters from
/// `[A-Za-z0-9_-]`, mixed-case or containing digits. Paths, URLs and
/// plain words never qualify. The value is checked as sent, so surrounding
/// whitespace disqualifies it.
pub fn is_file_id(value: &str) -> bool {
    value.len() >= 20
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && value
            .chars()
            .any(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
