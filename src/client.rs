use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{Config, ConfigOptions, ConfigStore};
use crate::error::{Error, Result};
use crate::method::Method;
use crate::request;
use crate::response;
use crate::transform::{transform, RequestDescriptor};
use crate::transport::{HttpTransport, Transport};

/// JSON client over a pluggable [`Transport`]
///
/// Every verb method runs the same pipeline: merge the default payload,
/// route the payload into the query string (`get`, `head`) or the JSON body
/// (everything else), join the base URL, call the transport, then resolve
/// the response into a JSON value or an [`HttpError`](crate::HttpError).
///
/// Clones share the transport and the configuration.
///
/// # Examples
///
/// ```no_run
/// use jsonfetch::{Client, ConfigOptions};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), jsonfetch::Error> {
///     let client = Client::new();
///     client.configure(ConfigOptions::new().base_url("https://api.example.com"));
///
///     let artist = client.get("/artist", json!({ "name": "nujabes" })).await?;
///     println!("{}", artist);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: Arc<ConfigStore>,
}

impl Client {
    /// Create a new client with the reqwest transport and default settings
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings over `transport`
    pub fn with_transport<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self::builder().transport(transport).build()
    }

    /// Replace the whole configuration
    pub fn configure(&self, options: ConfigOptions) {
        self.config.configure(options);
    }

    /// Get the current configuration snapshot
    pub fn config(&self) -> Arc<Config> {
        self.config.snapshot()
    }

    /// Get the transport
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Send a GET request, payload encoded into the query string
    pub async fn get<P: Serialize>(&self, url: &str, payload: P) -> Result<Value> {
        self.request(Method::Get, url, payload).await
    }

    /// Send a HEAD request, payload encoded into the query string
    pub async fn head<P: Serialize>(&self, url: &str, payload: P) -> Result<Value> {
        self.request(Method::Head, url, payload).await
    }

    /// Send a POST request with a JSON body
    pub async fn post<P: Serialize>(&self, url: &str, payload: P) -> Result<Value> {
        self.request(Method::Post, url, payload).await
    }

    /// Send a PUT request with a JSON body
    pub async fn put<P: Serialize>(&self, url: &str, payload: P) -> Result<Value> {
        self.request(Method::Put, url, payload).await
    }

    /// Send a PATCH request with a JSON body
    pub async fn patch<P: Serialize>(&self, url: &str, payload: P) -> Result<Value> {
        self.request(Method::Patch, url, payload).await
    }

    /// Send a DELETE request with a JSON body
    pub async fn delete<P: Serialize>(&self, url: &str, payload: P) -> Result<Value> {
        self.request(Method::Delete, url, payload).await
    }

    /// Send an OPTIONS request with a JSON body
    pub async fn options<P: Serialize>(&self, url: &str, payload: P) -> Result<Value> {
        self.request(Method::Options, url, payload).await
    }

    /// Run the pipeline for `method`.
    ///
    /// `payload` must serialize to a JSON object; `()` and `None` count as
    /// an empty payload.
    pub async fn request<P: Serialize>(&self, method: Method, url: &str, payload: P) -> Result<Value> {
        let payload = into_payload(payload)?;

        let config = self.config.snapshot();
        let descriptor = transform(RequestDescriptor::new(method, url, payload), &config);
        let options = request::build(
            descriptor.method,
            &descriptor.payload,
            &config.transport_overrides,
        )?;

        tracing::debug!(
            method = %descriptor.method,
            url = %descriptor.url,
            transport = self.transport.name(),
            "sending request"
        );
        tracing::trace!(?options, "transport options");

        let response = self.transport.call(&descriptor.url, &options).await?;

        let config = self.config.snapshot();
        response::resolve(response, &config).await
    }

    /// Run the pipeline and deserialize the result into `T`
    pub async fn request_as<T, P>(&self, method: Method, url: &str, payload: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let value = self.request(method, url, payload).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a GET request and deserialize the result
    pub async fn get_as<T, P>(&self, url: &str, payload: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        self.request_as(Method::Get, url, payload).await
    }

    /// Send a POST request and deserialize the result
    pub async fn post_as<T, P>(&self, url: &str, payload: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        self.request_as(Method::Post, url, payload).await
    }
}

fn into_payload<P: Serialize>(payload: P) -> Result<Map<String, Value>> {
    match serde_json::to_value(payload)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(Error::invalid_request(format!(
            "payload must be a JSON object, got {}",
            other
        ))),
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport.name())
            .field("config", &self.config.snapshot())
            .finish()
    }
}

/// Builder for creating clients with custom configuration
///
/// # Examples
///
/// ```rust
/// use jsonfetch::{ClientBuilder, MockTransport};
///
/// let client = ClientBuilder::new()
///     .transport(MockTransport::new())
///     .base_url("http://localhost/api")
///     .default_param("token", "123456")
///     .error_key("error")
///     .build();
///
/// assert_eq!(client.config().base_url(), Some("http://localhost/api"));
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    options: ConfigOptions,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set an already shared transport
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set every configuration field at once
    pub fn options(mut self, options: ConfigOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the base URL for all requests
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.options = self.options.base_url(url);
        self
    }

    /// Add a transport option override
    pub fn transport_override(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options = self.options.transport_override(key, value);
        self
    }

    /// Add a default payload field
    pub fn default_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options = self.options.default_param(key, value);
        self
    }

    /// Read error messages from this body key
    pub fn error_key(mut self, key: impl Into<String>) -> Self {
        self.options = self.options.error_key(key);
        self
    }

    /// Use whole failure bodies as error messages
    pub fn error_key_whole_body(mut self) -> Self {
        self.options = self.options.error_key_whole_body();
        self
    }

    /// Build the client
    pub fn build(self) -> Client {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HttpTransport::default()));

        Client {
            transport,
            config: Arc::new(ConfigStore::new(Config::from(self.options))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = Client::new();
        assert_eq!(client.transport().name(), "reqwest");
        assert_eq!(*client.config(), Config::default());
    }

    #[test]
    fn test_client_builder() {
        let client = ClientBuilder::new()
            .transport(MockTransport::new())
            .base_url("http://h/api")
            .transport_override("credentials", "include")
            .default_param("token", "T")
            .error_key_whole_body()
            .build();

        let config = client.config();
        assert_eq!(client.transport().name(), "mock");
        assert_eq!(config.base_url(), Some("http://h/api"));
        assert_eq!(config.transport_overrides["credentials"], "include");
        assert_eq!(config.default_payload["token"], "T");
        assert_eq!(config.error_key, crate::ErrorKey::WholeBody);
    }

    #[test]
    fn test_into_payload() {
        assert_eq!(into_payload(()).unwrap(), Map::new());
        assert_eq!(into_payload(None::<Value>).unwrap(), Map::new());
        assert_eq!(into_payload(json!({"a": 1})).unwrap()["a"], 1);
        assert!(matches!(into_payload(json!([1, 2])), Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_clones_share_configuration() {
        let client = Client::with_transport(MockTransport::new());
        let clone = client.clone();
        clone.configure(ConfigOptions::new().base_url("http://shared"));

        assert_eq!(client.config().base_url(), Some("http://shared"));
    }

    #[tokio::test]
    async fn test_rejects_non_object_payload_before_sending() {
        let mock = MockTransport::new();
        let client = Client::with_transport(mock.clone());

        let err = client.post("/x", "text").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_request_as_deserializes() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Artist {
            name: String,
        }

        let mock = MockTransport::respond_with(http::StatusCode::OK, &json!({"name": "nujabes"}));
        let client = Client::with_transport(mock);

        let artist: Artist = client.get_as("/artist", ()).await.unwrap();
        assert_eq!(artist, Artist { name: "nujabes".to_string() });

        let err = client.post_as::<Vec<String>, _>("/artist", ()).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
