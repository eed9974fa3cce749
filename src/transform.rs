use serde_json::{Map, Value};

use crate::config::Config;
use crate::method::Method;
use crate::query;

/// One call travelling through the request pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub payload: Map<String, Value>,
}

impl RequestDescriptor {
    /// Create a new request descriptor
    pub fn new(method: Method, url: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            method,
            url: url.into(),
            payload,
        }
    }
}

/// Shallow merge where `overrides` wins.
///
/// Keys keep the position they first had in `base`; keys only present in
/// `overrides` follow in their own order.
pub fn merge(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Join `url` onto `base_url` with exactly one slash between them.
///
/// A single trailing slash on `base_url` and a single leading slash on `url`
/// are dropped before joining; repeated slashes beyond those are kept.
pub fn join_base_url(base_url: &str, url: &str) -> String {
    format!(
        "{}/{}",
        base_url.strip_suffix('/').unwrap_or(base_url),
        url.strip_prefix('/').unwrap_or(url)
    )
}

/// Whether `url` names its own scheme and host, ignoring any query string
pub fn is_absolute(url: &str) -> bool {
    url.split('?').next().unwrap_or(url).contains("://")
}

/// Apply default payload, query routing and base URL to a request.
///
/// URLs that are absolute as passed by the caller never get the base URL.
pub fn transform(mut request: RequestDescriptor, config: &Config) -> RequestDescriptor {
    let absolute = is_absolute(&request.url);

    if !config.default_payload.is_empty() {
        request.payload = merge(&config.default_payload, &request.payload);
    }

    if request.method.is_query() {
        request.url = query::encode(&request.url, &request.payload);
    }

    if let Some(base_url) = config.base_url().filter(|_| !absolute) {
        request.url = join_base_url(base_url, &request.url);
    }

    request
}

/// JavaScript-style truthiness of a JSON value
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
