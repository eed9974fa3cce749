use serde_json::Value;
use thiserror::Error;

/// Result type for jsonfetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Name carried by every [`HttpError`], used by callers to tell structured
/// HTTP failures apart from everything else.
pub const HTTP_ERROR_NAME: &str = "HttpError";

/// Main error type for jsonfetch
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx response, normalized into a structured error
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Network-related errors raised by the reqwest transport
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid request configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failure raised by a user-supplied transport, passed through untouched
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Create a new invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest(message.into())
    }

    /// Wrap an arbitrary transport failure
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }

    /// Check if this is a structured HTTP error
    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Get the structured HTTP error, if any
    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            Error::Http(e) => Some(e),
            _ => None,
        }
    }

    /// Get the HTTP status code if this is a structured HTTP error
    pub fn status(&self) -> Option<u16> {
        self.as_http().map(HttpError::status)
    }
}

/// Structured failure produced for every non-2xx response.
///
/// `message` is ordinarily a JSON string. When the client is configured to
/// report the whole body (see [`ErrorKey::WholeBody`](crate::ErrorKey)) it
/// holds the entire parsed response body instead.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("HttpError {status}: {}", display_message(.message))]
pub struct HttpError {
    /// Message extracted from the response body
    pub message: Value,
    /// HTTP status code of the response
    pub status: u16,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<Value>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Always [`HTTP_ERROR_NAME`]
    pub fn name(&self) -> &'static str {
        HTTP_ERROR_NAME
    }

    /// Get the status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the message
    pub fn message(&self) -> &Value {
        &self.message
    }

    /// Get the message as text when it is a JSON string
    pub fn message_str(&self) -> Option<&str> {
        self.message.as_str()
    }

    /// Check if this is a client error (4xx status code)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if this is a server error (5xx status code)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

fn display_message(message: &Value) -> String {
    match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_display() {
        let err = HttpError::new("not found", 404);
        assert_eq!(err.to_string(), "HttpError 404: not found");
        assert_eq!(err.name(), "HttpError");
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_http_error_with_body_message() {
        let err = HttpError::new(json!({"message": "test"}), 500);
        assert_eq!(err.to_string(), r#"HttpError 500: {"message":"test"}"#);
        assert_eq!(err.message_str(), None);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_accessors() {
        let err = Error::from(HttpError::new("boom", 418));
        assert!(err.is_http());
        assert!(!err.is_network());
        assert_eq!(err.status(), Some(418));
        assert_eq!(err.to_string(), "HttpError 418: boom");

        let err = Error::invalid_request("bad header");
        assert!(!err.is_http());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_transport_error_passthrough() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = Error::transport(io);
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: reset");
    }
}
