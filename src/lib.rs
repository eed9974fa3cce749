//! jsonfetch - JSON verb helpers over a pluggable HTTP transport
//!
//! A thin layer that turns `(method, url, payload)` into a fully formed
//! request and turns the response into either parsed JSON or a structured
//! [`HttpError`].
//!
//! ## Features
//!
//! - **One async function per verb**: `get`, `head`, `post`, `put`, `patch`,
//!   `delete`, `options`
//! - **Query routing**: `get` and `head` payloads go into the query string,
//!   every other verb sends them as a JSON body
//! - **Default payload** merged under every call
//! - **Base URL** joined with exactly one slash
//! - **Transport overrides** merged over the computed request options
//! - **Normalized errors** for non-2xx responses, with a configurable body key
//! - **Pluggable transport**: reqwest by default, anything implementing
//!   [`Transport`] otherwise
//!
//! ## Quick Start
//!
//! ```no_run
//! use jsonfetch::{Client, ConfigOptions, Error};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = Client::new();
//!     client.configure(
//!         ConfigOptions::new()
//!             .base_url("https://api.example.com")
//!             .default_param("token", "123456"),
//!     );
//!
//!     // GET https://api.example.com/search?token=123456&artist=nujabes
//!     let found = client.get("/search", json!({ "artist": "nujabes" })).await?;
//!     println!("{}", found);
//!
//!     match client.post("/artist", json!({ "name": "nujabes" })).await {
//!         Ok(created) => println!("created {}", created),
//!         Err(Error::Http(e)) => println!("{} ({})", e.message, e.status),
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod global;
pub mod method;
pub mod query;
pub mod request;
pub mod response;
pub mod transform;
pub mod transport;

// Re-export main types for convenience
pub use client::{Client, ClientBuilder};
pub use config::{Config, ConfigOptions, ConfigStore, ErrorKey};
pub use error::{Error, HttpError, Result, HTTP_ERROR_NAME};
pub use global::{configure, default_client, delete, get, head, options, patch, post, put};
pub use method::Method;
pub use request::RequestOptions;
pub use response::{Response, ResponseBuilder};
pub use transform::RequestDescriptor;
pub use transport::{HttpTransport, MockTransport, RecordedCall, Transport};

// Re-export JSON types
pub use serde_json::{json, Map as JsonMap, Value as JsonValue};

// Re-export common traits
pub use async_trait::async_trait;
