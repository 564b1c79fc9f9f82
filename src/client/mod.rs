//! Telegram client implementation.
//!
//! [`BotClient`] is the request dispatcher: it normalizes call parameters,
//! assembles the request envelope, hands it to the transport, and keeps the
//! most recent response for introspection.

mod methods;

use crate::config::BotConfig;
use crate::errors::{BotResult, FileError, ResponseError};
use crate::observability::{
    record_error, record_file_count, record_success, redact_url, RequestTrace,
};
use crate::request::{build_multipart, normalize, RequestBody};
use crate::transport::{
    ApiResponse, HttpTransport, RawRequest, ReqwestTransport, Timeouts, TransportRequest,
};
use crate::types::Params;
use http::Method;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, Instrument, Span};

/// Telegram Bot API client.
///
/// Sending methods take `&mut self`: each instance performs at most one
/// send at a time and owns its last-response slot. Concurrent callers use
/// separate instances.
pub struct BotClient {
    config: Arc<BotConfig>,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    connect_timeout: Duration,
    is_async: bool,
    last_response: Option<ApiResponse>,
}

impl BotClient {
    /// Create a new client with the given configuration
    pub fn new(config: BotConfig) -> BotResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.base_url.clone()));
        Self::with_transport(config, transport)
    }

    /// Create a new client with a custom transport
    pub fn with_transport(config: BotConfig, transport: Arc<dyn HttpTransport>) -> BotResult<Self> {
        config.validate()?;

        Ok(Self {
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
            is_async: config.async_requests,
            config: Arc::new(config),
            transport,
            last_response: None,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Get a reference to the HTTP transport
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// Set the timeout applied to subsequent sends
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Set the connect timeout applied to subsequent sends
    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.connect_timeout = timeout;
    }

    /// Ask the transport to treat subsequent sends as non-blocking
    pub fn set_async_request(&mut self, is_async: bool) {
        self.is_async = is_async;
    }

    /// Current request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Current connect timeout
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Whether sends are non-blocking
    pub fn is_async_request(&self) -> bool {
        self.is_async
    }

    fn timeouts(&self) -> Timeouts {
        Timeouts {
            request: self.timeout,
            connect: self.connect_timeout,
        }
    }

    /// The response of the most recent send.
    ///
    /// Overwritten by every send that reaches the transport and returns; not
    /// a history.
    pub fn last_response(&self) -> Option<&ApiResponse> {
        self.last_response.as_ref()
    }

    /// Call a method with a GET request
    pub async fn get(&mut self, endpoint: &str, params: Params) -> BotResult<ApiResponse> {
        self.send(Method::GET, endpoint, normalize(params, false)).await
    }

    /// Call a method with a POST request.
    ///
    /// With `is_file_upload` set, the parameters are encoded as multipart
    /// without validating any particular file field.
    pub async fn post(
        &mut self,
        endpoint: &str,
        params: Params,
        is_file_upload: bool,
    ) -> BotResult<ApiResponse> {
        self.send(Method::POST, endpoint, normalize(params, is_file_upload))
            .await
    }

    /// Upload files held under `file_field`.
    ///
    /// The field is validated before any file is read or any request is
    /// sent.
    pub async fn upload_file(
        &mut self,
        endpoint: &str,
        params: Params,
        file_field: &str,
    ) -> BotResult<ApiResponse> {
        let parts = build_multipart(params, file_field)?;
        debug!(endpoint = %endpoint, file_field = %file_field, parts = parts.len(), "Built multipart body");
        self.send(Method::POST, endpoint, RequestBody::Multipart(parts))
            .await
    }

    /// Send a normalized body and record the response.
    ///
    /// An `ok: false` response is recorded as the last response and then
    /// returned as [`BotError::Api`](crate::errors::BotError::Api).
    pub async fn send(
        &mut self,
        method: Method,
        endpoint: &str,
        body: RequestBody,
    ) -> BotResult<ApiResponse> {
        let trace = RequestTrace::new(method.as_str(), endpoint);
        let span = trace.span();

        let result = self
            .dispatch(method, endpoint, body, &span)
            .instrument(span.clone())
            .await;

        match &result {
            Ok(_) => record_success(&span),
            Err(e) => record_error(&span, &e.to_string()),
        }
        debug!(parent: &span, elapsed_ms = trace.elapsed_ms(), ok = result.is_ok(), "Request finished");

        result
    }

    async fn dispatch(
        &mut self,
        method: Method,
        endpoint: &str,
        body: RequestBody,
        span: &Span,
    ) -> BotResult<ApiResponse> {
        let token = self.config.require_token()?.secret();
        let url = self.config.method_url(endpoint)?;
        let transport = Arc::clone(&self.transport);

        let body = body.into_transport_body(transport.as_ref(), self.timeouts()).await?;
        let request = TransportRequest {
            method,
            endpoint: endpoint.to_string(),
            body,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            is_async: self.is_async,
            token,
            headers: self.config.default_headers.clone(),
        };
        record_file_count(span, request.file_count());
        debug!(url = %redact_url(&url), files = request.file_count(), is_async = request.is_async, "Sending request");

        let response = transport.send(request).await?;
        self.last_response = Some(response.clone());

        match response.error() {
            Some(error) => Err(error),
            None => Ok(response),
        }
    }

    /// Look up the download path of a stored file with `getFile`
    pub async fn resolve_file_path(&mut self, file_id: &str) -> BotResult<String> {
        let response = self
            .get("getFile", Params::new().with("file_id", file_id))
            .await?;

        response
            .result()
            .and_then(|result| result.get("file_path"))
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| {
                ResponseError::UnexpectedResponse {
                    message: "getFile result has no file_path".to_string(),
                }
                .into()
            })
    }

    /// Download a stored file to `destination`.
    ///
    /// When `destination` is an existing directory the file is written
    /// inside it under the remote base name. Returns the written path.
    #[instrument(skip(self, destination))]
    pub async fn download_file(
        &mut self,
        file_id: &str,
        destination: impl AsRef<Path>,
    ) -> BotResult<PathBuf> {
        let file_path = self.resolve_file_path(file_id).await?;
        let url = self.config.file_url(&file_path)?;

        let content = self
            .transport
            .send_raw(RawRequest::get(url).with_timeouts(self.timeouts()))
            .await?;

        let target = download_target(destination.as_ref(), &file_path).await;
        tokio::fs::write(&target, &content)
            .await
            .map_err(|e| FileError::Write {
                path: target.display().to_string(),
                message: e.to_string(),
            })?;

        info!(path = %target.display(), bytes = content.len(), "Downloaded file");
        Ok(target)
    }
}

async fn download_target(destination: &Path, remote_path: &str) -> PathBuf {
    let is_dir = tokio::fs::metadata(destination)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);

    match remote_path.rsplit('/').next().filter(|_| is_dir) {
        Some(name) if !name.is_empty() => destination.join(name),
        _ => destination.to_path_buf(),
    }
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("config", &self.config)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("is_async", &self.is_async)
            .field("has_last_response", &self.last_response.is_some())
            .finish()
    }
}
