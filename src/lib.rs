//! # cms-api
//!
//! Client library for a content management service's REST API.
//!
//! Sessions are handled for you: the client logs in, attaches the token to
//! every call, and when the service reports an expired session it logs in again
//! and replays the call once.
//!
//! ## Security
//!
//! - Tokens and passwords are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Logging in over plain HTTP to a non-loopback host emits a warning
//!
//! ## Crates
//!
//! - **cms-api-client** - HTTP transport, session state, generic API calls, login/logout
//! - **cms-api-media** - Chunked uploads with cleanup, streaming downloads
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cms_api::{Credentials, MediaClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_env()?;
//!     let media = MediaClient::connect(&creds).await?;
//!
//!     // Generic calls go through the shared session
//!     let layouts = media.inner().get("layouts", Some(json!({"limit": 5}))).await?;
//!     println!("{layouts}");
//!
//!     media.upload("./lobby.mp4", Some("screens/lobby.mp4"), None).await?;
//!     media.download("content/screens/lobby.mp4", "./lobby-copy.mp4").await?;
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "client")]
pub use cms_api_client as client;
#[cfg(feature = "media")]
pub use cms_api_media as media;

// Re-export commonly used types at the top level
#[cfg(feature = "client")]
pub use cms_api_client::{ClientConfig, CmsClient, Credentials, RequestMethod};
#[cfg(feature = "media")]
pub use cms_api_media::{MediaClient, UploadInit, UploadSource, UploadType};
