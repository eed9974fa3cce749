//! Client configuration.
//!
//! A [`Config`] is an immutable snapshot. [`ConfigStore`] holds the active
//! snapshot for a client and replaces it wholesale on every
//! [`configure`](ConfigStore::configure) call: fields the caller leaves out
//! fall back to their defaults instead of keeping their previous value.
//!
//! Requests read the store twice, once when the request is built and once
//! when the response is resolved. Reconfiguring while requests are in flight
//! is not synchronized with them; settle configuration before issuing
//! requests that depend on it.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::transform::is_truthy;

/// Body key read for the error message when none is configured
pub const DEFAULT_ERROR_KEY: &str = "message";

/// Where the message of an [`HttpError`](crate::HttpError) comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKey {
    /// Read this key from the failure body
    Key(String),
    /// Use the entire failure body as the message
    WholeBody,
}

impl ErrorKey {
    /// Resolve a raw option value.
    ///
    /// Absent and falsy values read `"message"`; only an explicit JSON
    /// `null` selects [`ErrorKey::WholeBody`].
    pub fn from_option(raw: Option<&Value>) -> Self {
        match raw {
            Some(Value::Null) => ErrorKey::WholeBody,
            Some(Value::String(key)) if !key.is_empty() => ErrorKey::Key(key.clone()),
            Some(other) if is_truthy(other) => ErrorKey::Key(other.to_string()),
            _ => ErrorKey::default(),
        }
    }

    /// Get the configured key, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            ErrorKey::Key(key) => Some(key),
            ErrorKey::WholeBody => None,
        }
    }
}

impl Default for ErrorKey {
    fn default() -> Self {
        ErrorKey::Key(DEFAULT_ERROR_KEY.to_string())
    }
}

/// Active configuration snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Prefix joined onto every relative URL
    pub base_url: Option<String>,
    /// Shallow-merged over the computed transport options
    pub transport_overrides: Map<String, Value>,
    /// Shallow-merged under every call payload
    pub default_payload: Map<String, Value>,
    /// Failure body key holding the error message
    pub error_key: ErrorKey,
}

impl Config {
    /// Get the base URL if set
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

impl From<ConfigOptions> for Config {
    fn from(options: ConfigOptions) -> Self {
        Self {
            base_url: options.base_url.filter(|url| !url.is_empty()),
            transport_overrides: options.transport_overrides.unwrap_or_default(),
            default_payload: options.default_payload.unwrap_or_default(),
            error_key: ErrorKey::from_option(options.error_key.as_ref()),
        }
    }
}

/// Options accepted by `configure`.
///
/// Deserializes from the JSON object form
/// `{"baseURL", "fetch" | "transportOverrides", "defaultPayload", "errorKey"}`.
/// `"errorKey": null` is kept apart from a missing `errorKey`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigOptions {
    #[serde(default, rename = "baseURL")]
    base_url: Option<String>,
    #[serde(default, rename = "fetch", alias = "transportOverrides")]
    transport_overrides: Option<Map<String, Value>>,
    #[serde(default, rename = "defaultPayload")]
    default_payload: Option<Map<String, Value>>,
    #[serde(default, rename = "errorKey", deserialize_with = "present")]
    error_key: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ConfigOptions {
    /// Create empty options; every field takes its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Replace all transport overrides
    pub fn transport_overrides(mut self, overrides: Map<String, Value>) -> Self {
        self.transport_overrides = Some(overrides);
        self
    }

    /// Add a single transport override
    pub fn transport_override(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.transport_overrides
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the default payload
    pub fn default_payload(mut self, payload: Map<String, Value>) -> Self {
        self.default_payload = Some(payload);
        self
    }

    /// Add a single default payload field
    pub fn default_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_payload
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Read the error message from this body key
    pub fn error_key(mut self, key: impl Into<String>) -> Self {
        self.error_key = Some(Value::String(key.into()));
        self
    }

    /// Use the whole failure body as the error message
    pub fn error_key_whole_body(mut self) -> Self {
        self.error_key = Some(Value::Null);
        self
    }
}

/// Holder of the active [`Config`] snapshot
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: RwLock<Arc<Config>>,
}

impl ConfigStore {
    /// Create a store holding `config`
    pub fn new(config: Config) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Replace the whole configuration
    pub fn configure(&self, options: ConfigOptions) {
        let config = Arc::new(Config::from(options));
        tracing::debug!(
            base_url = ?config.base_url,
            error_key = ?config.error_key,
            "configuration replaced"
        );
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> Arc<Config> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
