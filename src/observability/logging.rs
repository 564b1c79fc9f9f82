//! Logging utilities with sensitive data redaction.
//!
//! Bot tokens travel inside the URL path (`/bot<token>/method`), so every
//! URL that reaches a log line goes through [`redact_url`] first.

use std::fmt;

/// Wrapper for sensitive data that redacts on display
#[derive(Clone)]
pub struct Redacted<T>(T);

impl<T> Redacted<T> {
    /// Create a new redacted value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Get the inner value (use sparingly)
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T> fmt::Display for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Redact a bot token, keeping the numeric bot id for debugging
pub fn redact_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) if !bot_id.is_empty() => format!("{}:[REDACTED]", bot_id),
        _ => "[REDACTED]".to_string(),
    }
}

/// Redact a URL, hiding the token in `bot<token>` path segments
pub fn redact_url(url: &str) -> String {
    let (without_query, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };

    let path = without_query
        .split('/')
        .map(|segment| match segment.strip_prefix("bot") {
            Some(token) if token.contains(':') => format!("bot{}", redact_token(token)),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/");

    match query {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    }
}
