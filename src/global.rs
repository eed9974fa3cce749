//! Ambient default client.
//!
//! A process-wide [`Client`] backed by [`HttpTransport`](crate::HttpTransport),
//! created on first use. The free functions here forward to it, for callers
//! that prefer "configure once, call anywhere" over passing a client around.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::client::Client;
use crate::config::{Config, ConfigOptions};
use crate::error::Result;

static DEFAULT_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// Get the ambient client
pub fn default_client() -> &'static Client {
    &DEFAULT_CLIENT
}

/// Replace the ambient client's configuration
pub fn configure(options: ConfigOptions) {
    DEFAULT_CLIENT.configure(options);
}

/// Get the ambient client's configuration snapshot
pub fn config() -> Arc<Config> {
    DEFAULT_CLIENT.config()
}

/// GET through the ambient client
pub async fn get<P: Serialize>(url: &str, payload: P) -> Result<Value> {
    DEFAULT_CLIENT.get(url, payload).await
}

/// HEAD through the ambient client
pub async fn head<P: Serialize>(url: &str, payload: P) -> Result<Value> {
    DEFAULT_CLIENT.head(url, payload).await
}

/// POST through the ambient client
pub async fn post<P: Serialize>(url: &str, payload: P) -> Result<Value> {
    DEFAULT_CLIENT.post(url, payload).await
}

/// PUT through the ambient client
pub async fn put<P: Serialize>(url: &str, payload: P) -> Result<Value> {
    DEFAULT_CLIENT.put(url, payload).await
}

/// PATCH through the ambient client
pub async fn patch<P: Serialize>(url: &str, payload: P) -> Result<Value> {
    DEFAULT_CLIENT.patch(url, payload).await
}

/// DELETE through the ambient client
pub async fn delete<P: Serialize>(url: &str, payload: P) -> Result<Value> {
    DEFAULT_CLIENT.delete(url, payload).await
}

/// OPTIONS through the ambient client
pub async fn options<P: Serialize>(url: &str, payload: P) -> Result<Value> {
    DEFAULT_CLIENT.options(url, payload).await
}
