//! Media transfer client.
//!
//! Wraps a [`CmsClient`] and shares its session: uploads and downloads carry
//! the same token as the generic API calls.

use cms_api_client::{ClientConfig, CmsClient, Credentials};

use crate::error::Result;

mod download;
mod upload;

/// Client for media uploads and downloads.
///
/// # Example
///
/// ```rust,ignore
/// use cms_api_media::{MediaClient, UploadType};
///
/// let media = MediaClient::connect(&creds).await?;
///
/// // Upload into a subfolder, classified by extension
/// let init = media.upload("./clip.mp4", Some("promo/clip.mp4"), None).await?;
/// println!("uploaded as {}", init.uuid);
///
/// media.download("content/promo/clip.mp4", "./copy.mp4").await?;
/// ```
#[derive(Debug, Clone)]
pub struct MediaClient {
    client: CmsClient,
}

impl MediaClient {
    /// Create a media client for the service rooted at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            client: CmsClient::new(base_url)?,
        })
    }

    /// Create a media client with custom HTTP configuration.
    pub fn with_config(base_url: impl AsRef<str>, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: CmsClient::with_config(base_url, config)?,
        })
    }

    /// Create a media client and log in.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            client: CmsClient::connect(credentials).await?,
        })
    }

    /// Create a media client from an existing CmsClient.
    pub fn from_client(client: CmsClient) -> Self {
        Self { client }
    }

    /// Get the underlying CmsClient.
    pub fn inner(&self) -> &CmsClient {
        &self.client
    }
}

impl From<CmsClient> for MediaClient {
    fn from(client: CmsClient) -> Self {
        Self::from_client(client)
    }
}
