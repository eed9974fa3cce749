use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::request::RequestOptions;
use crate::response::{Response, ResponseBuilder};

/// Transport trait for HTTP operations
///
/// This trait abstracts the component that actually performs the network
/// call. Connection handling, TLS, redirects, retries and timeouts all live
/// behind it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call described by `url` and `options`
    async fn call(&self, url: &str, options: &RequestOptions) -> Result<Response>;

    /// Get the transport name/type
    fn name(&self) -> &str;
}

/// Default transport implementation using reqwest
///
/// Reads `method`, `headers` and `body` from the options. `mode` and
/// `credentials` only mean something to browsers and are ignored. The URL
/// must be absolute, so relative paths need a configured base URL.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(client: Arc<ReqwestClient>) -> Self {
        Self { client }
    }

    /// Get the underlying reqwest client
    pub fn client(&self) -> &ReqwestClient {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, url: &str, options: &RequestOptions) -> Result<Response> {
        let url = Url::parse(url)?;

        let method = options.method().unwrap_or("get");
        let method = reqwest::Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::invalid_request(format!("Invalid HTTP method: {}", method)))?;

        let mut request = self.client.request(method, url);

        if let Some(headers) = options.headers() {
            for (name, value) in headers {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| Error::invalid_request(format!("Invalid header name: {}", e)))?;
                let value = HeaderValue::from_str(&as_text(value))
                    .map_err(|e| Error::invalid_request(format!("Invalid header value: {}", e)))?;
                request = request.header(name, value);
            }
        }

        if let Some(body) = options.body() {
            request = request.body(as_text(body));
        }

        if options.mode().is_some() || options.credentials().is_some() {
            tracing::trace!(
                mode = ?options.mode(),
                credentials = ?options.credentials(),
                "ignoring browser-only request options"
            );
        }

        let response = request.send().await.map_err(Error::Network)?;
        Ok(Response::from_reqwest_response(response))
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A call captured by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// URL the pipeline produced
    pub url: String,
    /// Options the pipeline produced
    pub options: RequestOptions,
}

/// Recording transport for tests.
///
/// Answers every call with the same canned reply (`200` with `{}` unless
/// configured otherwise) and keeps every `(url, options)` pair it saw.
/// Clones share the recorded calls.
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug)]
struct MockState {
    reply: std::result::Result<ResponseBuilder, String>,
    calls: Vec<RecordedCall>,
}

impl MockTransport {
    /// Create a mock answering `200` with an empty JSON object
    pub fn new() -> Self {
        Self::respond_with(StatusCode::OK, &Value::Object(Default::default()))
    }

    /// Create a mock answering with `status` and JSON `body`
    pub fn respond_with(status: StatusCode, body: &Value) -> Self {
        Self::with_reply(Ok(ResponseBuilder::new(status).json(body)))
    }

    /// Create a mock answering with `status` and a raw text body
    pub fn respond_with_text(status: StatusCode, body: &str) -> Self {
        Self::with_reply(Ok(ResponseBuilder::new(status).text(body)))
    }

    /// Create a mock whose every call fails at the transport level
    pub fn fail_with(message: impl Into<String>) -> Self {
        Self::with_reply(Err(message.into()))
    }

    fn with_reply(reply: std::result::Result<ResponseBuilder, String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                reply,
                calls: Vec::new(),
            })),
        }
    }

    /// Every call seen so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// The most recent call
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.lock().calls.last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, url: &str, options: &RequestOptions) -> Result<Response> {
        let reply = {
            let mut state = self.lock();
            state.calls.push(RecordedCall {
                url: url.to_string(),
                options: options.clone(),
            });
            state.reply.clone()
        };
        match reply {
            Ok(reply) => Ok(reply.build()),
            Err(message) => Err(Error::transport(message)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
