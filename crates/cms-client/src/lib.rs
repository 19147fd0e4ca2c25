//! # cms-api-client
//!
//! Session-aware REST client for a content management service.
//!
//! This crate provides:
//! - Token based login/logout with a configurable token header
//! - Automatic re-login and a single replay when the session expires
//! - JSON bodies for POST/PUT, query strings for GET/HEAD/DELETE
//! - Tolerant body handling: empty bodies become `null`, non-JSON bodies become
//!   an error object instead of a parse failure
//! - Raw authorized requests for streaming transfers
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (cms-api-media, callers of the generic API)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CmsClient                              │
//! │  - Session state (token, credentials, last login)           │
//! │  - Generic API calls with re-login on expiry                │
//! │  - Authorized raw requests                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HttpClient                              │
//! │  - One HTTP request per call, plain or TLS                  │
//! │  - Buffered or streamed bodies with Content-Length          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use cms_api_client::{CmsClient, Credentials};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cms_api_client::Error> {
//!     let creds = Credentials::from_env()?;
//!     let client = CmsClient::connect(&creds).await?;
//!
//!     let displays = client.get("displays", Some(json!({"limit": 10}))).await?;
//!     println!("{displays}");
//!
//!     client.logout().await;
//!     Ok(())
//! }
//! ```

mod client;
mod cms_client;
mod config;
mod credentials;
mod error;
mod request;
mod response;
mod session;

pub use client::HttpClient;
pub use cms_client::CmsClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use credentials::Credentials;
pub use error::{Error, ErrorKind, Result};
pub use request::{encode_query, ApiRequest, RequestBody, RequestBuilder, RequestMethod};
pub use response::{ApiResponse, MalformedBody, ParsedBody, Response};
pub use session::ServiceUrls;

/// Default name of the session token header and login response field
pub const DEFAULT_TOKEN_HEADER: &str = "apiToken";

/// Default REST API path below the service root
pub const DEFAULT_API_PATH: &str = "api/rest/";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("cms-api/", env!("CARGO_PKG_VERSION"));
