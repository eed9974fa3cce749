use http::{HeaderMap, HeaderValue, StatusCode};
use reqwest::Response as ReqwestResponse;
use serde_json::{Map, Value};

use crate::config::{Config, ErrorKey};
use crate::error::{Error, HttpError, Result};
use crate::transform::is_truthy;

/// Message used when a failure body carries nothing usable
pub const FALLBACK_ERROR_MESSAGE: &str = "internal server error";

/// HTTP response returned by a [`Transport`](crate::Transport).
///
/// The body is read lazily: either straight from a live reqwest response
/// or from bytes buffered by a custom transport.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

#[derive(Debug)]
enum Body {
    Buffered(Vec<u8>),
    Live(ReqwestResponse),
}

impl Response {
    /// Create a response from a reqwest response
    pub fn from_reqwest_response(reqwest_response: ReqwestResponse) -> Self {
        Self {
            status: reqwest_response.status(),
            headers: reqwest_response.headers().clone(),
            body: Body::Live(reqwest_response),
        }
    }

    /// Create a response builder
    pub fn builder(status: StatusCode) -> ResponseBuilder {
        ResponseBuilder::new(status)
    }

    /// Get the HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the response is successful (2xx status code)
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Get the response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the content type
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Get the response body as bytes
    pub async fn bytes(self) -> Result<Vec<u8>> {
        match self.body {
            Body::Buffered(bytes) => Ok(bytes),
            Body::Live(inner) => inner
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(Error::Network),
        }
    }

    /// Get the response body as text
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Parse the response body as JSON
    pub async fn json(self) -> Result<Value> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Builder for buffered responses, used by custom and mock transports
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Create a new response builder
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Set the status code
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set a header
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = name
            .parse::<http::header::HeaderName>()
            .map_err(|e| Error::invalid_request(format!("Invalid header name: {}", e)))?;
        let value = value
            .parse::<HeaderValue>()
            .map_err(|e| Error::invalid_request(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Set the body
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Set text body
    pub fn text(mut self, text: &str) -> Self {
        self.body = text.as_bytes().to_vec();
        self
    }

    /// Set JSON body
    pub fn json(mut self, json: &Value) -> Self {
        self.body = json.to_string().into_bytes();
        self.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self
    }

    /// Build the response
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: Body::Buffered(self.body),
        }
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

/// Turn a transport response into the call's result.
///
/// A body that cannot be read or parsed counts as an empty object. Success
/// yields the parsed body; any other status becomes an [`HttpError`] whose
/// message is picked by [`error_message`].
pub async fn resolve(response: Response, config: &Config) -> Result<Value> {
    let status = response.status();
    let ok = response.ok();

    let body = match response.json().await {
        Ok(body) => body,
        Err(err) => {
            tracing::debug!(%status, error = %err, "unparsable response body, using empty object");
            Value::Object(Map::new())
        }
    };

    tracing::debug!(%status, ok, "response resolved");

    if ok {
        return Ok(body);
    }

    let message = error_message(body, &config.error_key);
    Err(HttpError::new(message, status.as_u16()).into())
}

/// Extract the error message from a failure body
pub fn error_message(body: Value, error_key: &ErrorKey) -> Value {
    match error_key {
        ErrorKey::WholeBody => body,
        ErrorKey::Key(key) => body
            .get(key.as_str())
            .filter(|message| is_truthy(message))
            .cloned()
            .unwrap_or_else(|| Value::String(FALLBACK_ERROR_MESSAGE.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOptions;
    use serde_json::json;

    fn config(options: ConfigOptions) -> Config {
        Config::from(options)
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let response = Response::builder(StatusCode::OK)
            .json(&json!({"name": "nujabes"}))
            .build();
        assert!(response.ok());
        assert_eq!(response.content_type(), Some("application/json"));

        let value = resolve(response, &Config::default()).await.unwrap();
        assert_eq!(value, json!({"name": "nujabes"}));
    }

    #[tokio::test]
    async fn test_success_with_empty_body() {
        let response = ResponseBuilder::new(StatusCode::NO_CONTENT).build();
        let value = resolve(response, &Config::default()).await.unwrap();
        assert_eq!(value, json!({}));
    }

    #[tokio::test]
    async fn test_failure_uses_message_key() {
        let response = Response::builder(StatusCode::NOT_FOUND)
            .json(&json!({"message": "test"}))
            .build();
        let err = resolve(response, &Config::default()).await.unwrap_err();

        let http = err.as_http().unwrap();
        assert_eq!(http.message_str(), Some("test"));
        assert_eq!(http.name(), "HttpError");
        assert_eq!(http.status(), 404);
    }

    #[tokio::test]
    async fn test_failure_with_unparsable_body() {
        let response = Response::builder(StatusCode::BAD_GATEWAY)
            .text("<html>bad gateway</html>")
            .build();
        let err = resolve(response, &Config::default()).await.unwrap_err();

        assert_eq!(err.as_http().unwrap().message_str(), Some("internal server error"));
        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn test_failure_with_custom_key() {
        let response = Response::builder(StatusCode::BAD_REQUEST)
            .json(&json!({"error": "test", "message": "ignored"}))
            .build();
        let err = resolve(response, &config(ConfigOptions::new().error_key("error")))
            .await
            .unwrap_err();

        assert_eq!(err.as_http().unwrap().message_str(), Some("test"));
    }

    #[tokio::test]
    async fn test_failure_with_whole_body() {
        let response = Response::builder(StatusCode::NOT_FOUND)
            .json(&json!({"message": "test"}))
            .build();
        let err = resolve(response, &config(ConfigOptions::new().error_key_whole_body()))
            .await
            .unwrap_err();

        assert_eq!(err.as_http().unwrap().message, json!({"message": "test"}));
    }

    #[test]
    fn test_error_message_falsy_value_falls_back() {
        let key = ErrorKey::default();
        assert_eq!(
            error_message(json!({"message": ""}), &key),
            json!("internal server error")
        );
        assert_eq!(
            error_message(json!(["message"]), &key),
            json!("internal server error")
        );
        assert_eq!(
            error_message(json!({"message": {"code": 7}}), &key),
            json!({"code": 7})
        );
    }

    #[test]
    fn test_buffered_text() {
        let response = ResponseBuilder::default().text("plain").build();
        assert_eq!(tokio_test::block_on(response.text()).unwrap(), "plain");
    }

    #[tokio::test]
    async fn test_builder_status_and_raw_body() {
        let response = ResponseBuilder::default()
            .status(StatusCode::IM_A_TEAPOT)
            .header("content-type", "application/json")
            .unwrap()
            .body(br#"{"brew":"tea"}"#.to_vec())
            .build();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert!(!response.ok());
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.json().await.unwrap(), json!({"brew": "tea"}));
    }

    #[test]
    fn test_builder_rejects_bad_header() {
        assert!(ResponseBuilder::default().header("bad header", "x").is_err());
    }
}
