//! Observability infrastructure for the Telegram client.
//!
//! Provides tracing spans and log redaction helpers.

pub mod logging;
pub mod tracing_utils;

pub use logging::*;
pub use tracing_utils::*;
