use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::method::Method;
use crate::transform::merge;

/// Default `mode` and `credentials` option value
pub const SAME_ORIGIN: &str = "same-origin";

/// MIME type sent in both `Accept` and `Content-Type`
pub const APPLICATION_JSON: &str = "application/json";

/// Options handed to a [`Transport`](crate::Transport) along with the URL.
///
/// This is an ordered JSON object so transport overrides can replace any
/// key, including ones this crate does not know about. The base keys are
/// `method`, `body`, `mode`, `credentials` and `headers`.
#[derive(Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestOptions {
    inner: Map<String, Value>,
}

impl RequestOptions {
    /// Wrap an existing option map
    pub fn from_map(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// Get an option by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Get the method name
    pub fn method(&self) -> Option<&str> {
        self.get("method").and_then(Value::as_str)
    }

    /// Get the body; `None` when absent or null
    pub fn body(&self) -> Option<&Value> {
        self.get("body").filter(|body| !body.is_null())
    }

    /// Get the `mode` option
    pub fn mode(&self) -> Option<&str> {
        self.get("mode").and_then(Value::as_str)
    }

    /// Get the `credentials` option
    pub fn credentials(&self) -> Option<&str> {
        self.get("credentials").and_then(Value::as_str)
    }

    /// Get the headers object
    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.get("headers").and_then(Value::as_object)
    }

    /// Get a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_str())
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.inner
    }

    /// Take the underlying map
    pub fn into_inner(self) -> Map<String, Value> {
        self.inner
    }
}

/// Assemble transport options for `method` and `payload`.
///
/// Query methods send a null body; every other method sends the payload as
/// a JSON string. `overrides` replace base keys wholesale, so overriding
/// `headers` drops the default headers.
pub fn build(
    method: Method,
    payload: &Map<String, Value>,
    overrides: &Map<String, Value>,
) -> Result<RequestOptions> {
    let body = if method.is_query() {
        Value::Null
    } else {
        Value::String(serde_json::to_string(payload)?)
    };

    let mut headers = Map::new();
    headers.insert("Accept".to_string(), APPLICATION_JSON.into());
    headers.insert("Content-Type".to_string(), APPLICATION_JSON.into());

    let mut base = Map::new();
    base.insert("method".to_string(), method.as_str().into());
    base.insert("body".to_string(), body);
    base.insert("mode".to_string(), SAME_ORIGIN.into());
    base.insert("credentials".to_string(), SAME_ORIGIN.into());
    base.insert("headers".to_string(), Value::Object(headers));

    Ok(RequestOptions::from_map(merge(&base, overrides)))
}

impl std::fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}
