//! Mock implementations for testing.
//!
//! Provides a scripted transport that records every envelope it receives.

use crate::errors::{BotError, BotResult, ResponseError, TransportError};
use crate::transport::{
    ApiResponse, FileUpload, HttpTransport, RawRequest, TransportBody, TransportRequest,
};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Failure a mock response produces instead of a body
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    /// Connection could not be established
    ConnectionFailed(String),
    /// Request timed out
    Timeout,
}

impl From<MockFailure> for BotError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::ConnectionFailed(message) => {
                TransportError::ConnectionFailed { message }.into()
            }
            MockFailure::Timeout => TransportError::Timeout.into(),
        }
    }
}

/// Mock response configuration
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Response body
    pub body: String,
    /// HTTP status code
    pub status: u16,
    /// Delay before response
    pub delay_ms: Option<u64>,
    /// Failure to return instead
    pub failure: Option<MockFailure>,
}

impl MockResponse {
    /// Create a successful JSON response
    pub fn json<T: Serialize>(data: &T) -> Self {
        Self::ok(serde_json::to_string(data).unwrap_or_default())
    }

    /// Create a successful response with raw body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: 200,
            delay_ms: None,
            failure: None,
        }
    }

    /// Create a successful Bot API envelope around `result`
    pub fn result(result: Value) -> Self {
        Self::ok(serde_json::json!({"ok": true, "result": result}).to_string())
    }

    /// Create a Bot API error response
    pub fn api_error(error_code: u16, description: &str) -> Self {
        Self {
            body: serde_json::json!({
                "ok": false,
                "error_code": error_code,
                "description": description,
            })
            .to_string(),
            status: error_code,
            delay_ms: None,
            failure: None,
        }
    }

    /// Create a transport failure
    pub fn failure(failure: MockFailure) -> Self {
        Self {
            body: String::new(),
            status: 0,
            delay_ms: None,
            failure: Some(failure),
        }
    }

    /// Set the HTTP status code
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Add delay to response
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = Some(ms);
        self
    }
}

/// Recorded request for verification
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Absolute URL for raw requests, API method name for API sends
    pub url: String,
    /// Request method
    pub method: String,
    /// Token the request was sent with
    pub token: Option<String>,
    /// URL-encoded fields
    pub form_fields: Vec<(String, String)>,
    /// Multipart text fields
    pub multipart_fields: Vec<(String, String)>,
    /// Multipart files
    pub files: Vec<FileUpload>,
    /// Whether the body was multipart
    pub is_multipart: bool,
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Non-blocking send
    pub is_async: bool,
    /// Request headers
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Look up a text field in either body kind
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form_fields
            .iter()
            .chain(self.multipart_fields.iter())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Names of all multipart parts, text parts first
    pub fn part_names(&self) -> Vec<&str> {
        self.multipart_fields
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(self.files.iter().map(|file| file.field_name.as_str()))
            .collect()
    }
}

/// Mock HTTP transport for testing
pub struct MockHttpTransport {
    /// Queue of responses to return
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Recorded requests
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Default response if queue is empty
    default_response: Option<MockResponse>,
}

impl MockHttpTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_response: None,
        }
    }

    /// Add a response to the queue
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.lock().push_back(response);
        self
    }

    /// Add multiple responses
    pub fn add_responses(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.responses.lock().extend(responses);
        self
    }

    /// Add a JSON response
    pub fn add_json_response<T: Serialize>(self, data: &T) -> Self {
        self.add_response(MockResponse::json(data))
    }

    /// Set default response when queue is empty
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Get the last recorded request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of recorded requests
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Clear recorded requests
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    /// Get remaining response count
    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().len()
    }

    fn record(&self, request: RecordedRequest) {
        self.requests.lock().push(request);
    }

    fn next_response(&self) -> BotResult<MockResponse> {
        let mut queue = self.responses.lock();
        queue
            .pop_front()
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                ResponseError::UnexpectedResponse {
                    message: "No mock response configured".to_string(),
                }
                .into()
            })
    }

    async fn settle(response: &MockResponse) -> BotResult<()> {
        if let Some(delay) = response.delay_ms {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        match &response.failure {
            Some(failure) => Err(failure.clone().into()),
            None => Ok(()),
        }
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn header_pairs(headers: &http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect()
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: TransportRequest) -> BotResult<ApiResponse> {
        let mut recorded = RecordedRequest {
            url: request.endpoint.clone(),
            method: request.method.to_string(),
            token: Some(request.token.expose_secret().clone()),
            form_fields: Vec::new(),
            multipart_fields: Vec::new(),
            files: Vec::new(),
            is_multipart: false,
            timeout: Some(request.timeout),
            connect_timeout: Some(request.connect_timeout),
            is_async: request.is_async,
            headers: header_pairs(&request.headers),
        };
        match request.body {
            TransportBody::Form(fields) => recorded.form_fields = fields,
            TransportBody::Multipart(multipart) => {
                recorded.is_multipart = true;
                recorded.multipart_fields = multipart.fields;
                recorded.files = multipart.files;
            }
        }
        self.record(recorded);

        if request.is_async {
            return Ok(ApiResponse::deferred());
        }

        let response = self.next_response()?;
        Self::settle(&response).await?;
        ApiResponse::from_body(response.status, response.body)
    }

    async fn send_raw(&self, request: RawRequest) -> BotResult<Bytes> {
        self.record(RecordedRequest {
            url: request.url.clone(),
            method: request.method.to_string(),
            token: None,
            form_fields: Vec::new(),
            multipart_fields: Vec::new(),
            files: Vec::new(),
            is_multipart: false,
            timeout: request.timeout,
            connect_timeout: request.connect_timeout,
            is_async: false,
            headers: header_pairs(&request.headers),
        });

        let response = self.next_response()?;
        Self::settle(&response).await?;

        if !(200..300).contains(&response.status) {
            return Err(TransportError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        Ok(Bytes::from(response.body))
    }
}

impl std::fmt::Debug for MockHttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpTransport")
            .field("pending_responses", &self.responses.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .finish()
    }
}
