//! # cms-api-media
//!
//! Media transfer for the CMS REST API.
//!
//! ## Features
//!
//! - **Chunked uploads** - One streamed part when the length is known, one part
//!   per chunk otherwise
//! - **Cleanup on failure** - A failed part deletes the half-created media
//! - **Upload classification** - Executables, scripts and archives are sent as
//!   maintenance uploads unless told otherwise
//! - **Streaming downloads** - Relay a remote file as a byte stream or write it
//!   to disk, removing partial files on error
//!
//! ## Example - Upload
//!
//! ```rust,ignore
//! use cms_api_media::{MediaClient, UploadSource, UploadType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cms_api_media::Error> {
//!     let creds = cms_api_client::Credentials::from_env()?;
//!     let media = MediaClient::connect(&creds).await?;
//!
//!     let source = UploadSource::from_file("./lobby.mp4").await?;
//!     let init = media
//!         .upload_stream(source, "screens/lobby.mp4", Some(UploadType::Media))
//!         .await?;
//!
//!     println!("upload session {}", init.uuid);
//!     Ok(())
//! }
//! ```
//!
//! ## Example - Download
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//!
//! let mut stream = media.download_stream("content/screens/lobby.mp4");
//! while let Some(chunk) = stream.try_next().await? {
//!     sink.write_all(&chunk).await?;
//! }
//! ```

mod client;
mod error;
mod source;
mod types;
mod upload_type;

pub use client::MediaClient;
pub use error::{Error, ErrorKind, Result};
pub use source::UploadSource;
pub use types::{UploadInit, UploadInitRequest};
pub use upload_type::UploadType;

pub use cms_api_client::{ClientConfig, ClientConfigBuilder, CmsClient, Credentials};
