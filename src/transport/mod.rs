//! HTTP transport layer for the Telegram client.
//!
//! Defines the request envelope handed to a transport, the response record
//! it returns, and the default reqwest-based implementation.

use crate::errors::{BotError, BotResult, ResponseError, TransportError};
use crate::observability::redact_url;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use parking_lot::Mutex;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// HTTP transport trait for making API requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an API request and receive the response record
    async fn send(&self, request: TransportRequest) -> BotResult<ApiResponse>;

    /// Send a raw request and receive raw bytes
    async fn send_raw(&self, request: RawRequest) -> BotResult<Bytes>;
}

/// Body of an outbound API request
#[derive(Debug)]
pub enum TransportBody {
    /// URL-encoded fields (query string for GET, form body otherwise)
    Form(Vec<(String, String)>),
    /// Multipart body
    Multipart(MultipartRequest),
}

/// Outbound request envelope.
///
/// Built once per send by the client and consumed by the transport.
#[derive(Debug)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// API method name, e.g. `sendPhoto`
    pub endpoint: String,
    /// Request body
    pub body: TransportBody,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Treat the send as non-blocking
    pub is_async: bool,
    /// Access token
    pub token: SecretString,
    /// Request headers
    pub headers: HeaderMap,
}

impl TransportRequest {
    /// Number of files carried by the request
    pub fn file_count(&self) -> usize {
        match &self.body {
            TransportBody::Form(_) => 0,
            TransportBody::Multipart(multipart) => multipart.files.len(),
        }
    }
}

/// Multipart body: text fields followed by files
#[derive(Debug, Default)]
pub struct MultipartRequest {
    /// Form fields
    pub fields: Vec<(String, String)>,
    /// Files to upload
    pub files: Vec<FileUpload>,
}

impl MultipartRequest {
    /// Create an empty multipart body
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a form field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add a file
    pub fn file(mut self, upload: FileUpload) -> Self {
        self.files.push(upload);
        self
    }

    fn into_form(self) -> BotResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();

        for (name, value) in self.fields {
            form = form.text(name, value);
        }

        for file in self.files {
            let length = file.content.len() as u64;
            let part = reqwest::multipart::Part::stream_with_length(
                reqwest::Body::from(file.content),
                length,
            )
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .map_err(|e| TransportError::Http(e.to_string()))?;
            form = form.part(file.field_name, part);
        }

        Ok(form)
    }
}

/// File upload data
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Form field name
    pub field_name: String,
    /// File name
    pub file_name: String,
    /// File content
    pub content: Bytes,
    /// MIME type
    pub mime_type: String,
}

impl FileUpload {
    /// Create a new file upload
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        let file_name_str = file_name.into();
        let mime_type = mime_guess::from_path(&file_name_str)
            .first_or_octet_stream()
            .to_string();

        Self {
            field_name: field_name.into(),
            file_name: file_name_str,
            content: content.into(),
            mime_type,
        }
    }

    /// Set the MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// Timeouts applied to one send, including the file fetches it triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Whole-request timeout
    pub request: Duration,
    /// Connection timeout
    pub connect: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
            connect: Duration::from_secs(crate::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Raw request for non-API downloads
#[derive(Debug)]
pub struct RawRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
}

impl RawRequest {
    /// Create a new raw GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            timeout: None,
            connect_timeout: None,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set both timeouts
    pub fn with_timeouts(self, timeouts: Timeouts) -> Self {
        self.with_timeout(timeouts.request)
            .with_connect_timeout(timeouts.connect)
    }
}

/// Response record returned by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code (0 for deferred sends)
    pub status: u16,
    /// Raw response body
    pub body: String,
    /// Parsed response fields
    pub fields: Value,
    /// The send was handed off without waiting for the response
    pub deferred: bool,
}

impl ApiResponse {
    /// Parse a response body.
    ///
    /// Non-JSON bodies are an error: a [`TransportError::Status`] when the
    /// status is not a success, a deserialization error otherwise.
    pub fn from_body(status: u16, body: impl Into<String>) -> BotResult<Self> {
        let body = body.into();
        let fields = match serde_json::from_str::<Value>(&body) {
            Ok(fields) => fields,
            Err(_) if !(200..300).contains(&status) => {
                return Err(TransportError::Status { status, body }.into())
            }
            Err(e) => return Err(ResponseError::from(e).into()),
        };

        Ok(Self {
            status,
            body,
            fields,
            deferred: false,
        })
    }

    /// Placeholder for a send that was not waited on
    pub fn deferred() -> Self {
        Self {
            status: 0,
            body: String::new(),
            fields: Value::Null,
            deferred: true,
        }
    }

    /// Whether the Bot API reported success
    pub fn is_ok(&self) -> bool {
        self.deferred || self.fields.get("ok").and_then(Value::as_bool) == Some(true)
    }

    /// The `result` field
    pub fn result(&self) -> Option<&Value> {
        self.fields.get("result")
    }

    /// The `description` field
    pub fn description(&self) -> Option<&str> {
        self.fields.get("description").and_then(Value::as_str)
    }

    /// The `error_code` field
    pub fn error_code(&self) -> Option<i64> {
        self.fields.get("error_code").and_then(Value::as_i64)
    }

    /// Convert an `ok: false` response into an API error
    pub fn error(&self) -> Option<BotError> {
        if self.is_ok() {
            None
        } else {
            Some(BotError::from_api_error(self.error_code(), self.description()))
        }
    }

    /// Deserialize the `result` field
    pub fn decode<T: DeserializeOwned>(&self) -> BotResult<T> {
        let result = self.result().cloned().ok_or_else(|| {
            ResponseError::UnexpectedResponse {
                message: "Response has no result field".to_string(),
            }
        })?;
        serde_json::from_value(result).map_err(|e| ResponseError::from(e).into())
    }
}

/// Distinct connect timeouts kept with a live client
const MAX_CACHED_CLIENTS: usize = 8;

/// Default HTTP transport implementation using reqwest
pub struct ReqwestTransport {
    base_url: Url,
    // reqwest fixes the connect timeout per client
    clients: Mutex<HashMap<Duration, Client>>,
}

impl ReqwestTransport {
    /// Create a new transport for the given API base URL
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Create a new transport with a pre-built client for a connect timeout
    pub fn with_client(base_url: Url, client: Client, connect_timeout: Duration) -> Self {
        let transport = Self::new(base_url);
        transport.clients.lock().insert(connect_timeout, client);
        transport
    }

    fn client_for(&self, connect_timeout: Duration) -> BotResult<Client> {
        let mut clients = self.clients.lock();
        if let Some(client) = clients.get(&connect_timeout) {
            return Ok(client.clone());
        }

        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        if clients.len() >= MAX_CACHED_CLIENTS {
            debug!(cached = clients.len(), "Dropping cached clients");
            clients.clear();
        }
        clients.insert(connect_timeout, client.clone());
        Ok(client)
    }

    fn method_url(&self, endpoint: &str, token: &SecretString) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            token.expose_secret(),
            endpoint.trim_start_matches('/')
        )
    }

    fn build(&self, request: TransportRequest) -> BotResult<RequestBuilder> {
        let url = self.method_url(&request.endpoint, &request.token);
        let client = self.client_for(request.connect_timeout)?;

        let builder = client
            .request(request.method.clone(), &url)
            .headers(request.headers)
            .timeout(request.timeout);

        Ok(match request.body {
            TransportBody::Form(fields) if request.method == Method::GET => builder.query(&fields),
            TransportBody::Form(fields) => builder.form(&fields),
            TransportBody::Multipart(multipart) => builder.multipart(multipart.into_form()?),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint, is_async = request.is_async))]
    async fn send(&self, request: TransportRequest) -> BotResult<ApiResponse> {
        let is_async = request.is_async;
        let builder = self.build(request)?;

        if is_async {
            tokio::spawn(async move {
                match builder.send().await {
                    Ok(response) => debug!(status = %response.status(), "Deferred request completed"),
                    Err(e) => warn!(error = %e, "Deferred request failed"),
                }
            });
            return Ok(ApiResponse::deferred());
        }

        let response = builder.send().await.map_err(TransportError::from)?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Request failed with non-success status");
        }

        let body = response.text().await.map_err(TransportError::from)?;
        debug!(response_body = %body, "Received response");

        ApiResponse::from_body(status.as_u16(), body)
    }

    #[instrument(skip(self, request), fields(method = %request.method, url = %redact_url(&request.url)))]
    async fn send_raw(&self, request: RawRequest) -> BotResult<Bytes> {
        let defaults = Timeouts::default();
        let client = self.client_for(request.connect_timeout.unwrap_or(defaults.connect))?;
        let req_builder = client
            .request(request.method, &request.url)
            .headers(request.headers)
            .timeout(request.timeout.unwrap_or(defaults.request));

        let response = req_builder.send().await.map_err(TransportError::from)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Download failed with non-success status");
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response
            .bytes()
            .await
            .map_err(|e| TransportError::from(e).into())
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field("cached_clients", &self.clients.lock().len())
            .finish()
    }
}
