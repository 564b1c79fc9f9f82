//! Tracing utilities for request spans.

use tracing::{span, Level, Span};

/// Create a request span with common attributes
pub fn create_request_span(method: &str, endpoint: &str) -> Span {
    span!(
        Level::INFO,
        "telegram_request",
        method = %method,
        endpoint = %endpoint,
        otel.kind = "client",
        otel.status_code = tracing::field::Empty,
        telegram.request_id = tracing::field::Empty,
        telegram.file_count = tracing::field::Empty,
        error.message = tracing::field::Empty,
    )
}

/// Record success on a span
pub fn record_success(span: &Span) {
    span.record("otel.status_code", "OK");
}

/// Record error on a span
pub fn record_error(span: &Span, error: &str) {
    span.record("otel.status_code", "ERROR");
    span.record("error.message", error);
}

/// Record the number of uploaded files
pub fn record_file_count(span: &Span, count: usize) {
    span.record("telegram.file_count", count as u64);
}

/// Request-scoped trace info
#[derive(Debug, Clone)]
pub struct RequestTrace {
    /// Start time
    pub start_time: std::time::Instant,
    /// Request ID
    pub request_id: String,
    /// Method name
    pub method: String,
    /// Endpoint
    pub endpoint: String,
}

impl RequestTrace {
    /// Create a new request trace
    pub fn new(method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            request_id: uuid::Uuid::new_v4().to_string(),
            method: method.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Span for this request, with the request id recorded
    pub fn span(&self) -> Span {
        let span = create_request_span(&self.method, &self.endpoint);
        span.record("telegram.request_id", self.request_id.as_str());
        span
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get elapsed milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trace() {
        let trace = RequestTrace::new("POST", "sendPhoto");
        assert!(!trace.request_id.is_empty());
        assert_eq!(trace.method, "POST");
        assert_eq!(trace.endpoint, "sendPhoto");
        let _span = trace.span();
    }

    #[test]
    fn test_span_recording() {
        let span = create_request_span("GET", "getMe");
        record_file_count(&span, 2);
        record_success(&span);
        record_error(&span, "boom");
    }
}
