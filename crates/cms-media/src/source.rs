//! Byte sources for uploads.

use std::path::Path;

use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt, TryStreamExt};
use tokio_util::io::ReaderStream;

use crate::error::{Error, Result};

/// A stream of upload bytes plus its total length, when known up front.
///
/// A known length selects a single streamed part; an unknown one sends each
/// emitted chunk as its own part.
pub struct UploadSource {
    stream: BoxStream<'static, Result<Bytes>>,
    length: Option<u64>,
}

impl std::fmt::Debug for UploadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadSource")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl UploadSource {
    /// Read a local file; the length is the file size.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = tokio::fs::File::open(path.as_ref()).await?;
        let length = file.metadata().await?.len();
        let stream = ReaderStream::new(file).map_err(Error::from);
        Ok(Self {
            stream: stream.boxed(),
            length: Some(length),
        })
    }

    /// Relay the body of an HTTP response; the length is its Content-Length, if any.
    pub fn from_response(response: cms_api_client::Response) -> Self {
        let length = response.content_length();
        let stream = response.bytes_stream().map_err(Error::from);
        Self {
            stream: stream.boxed(),
            length,
        }
    }

    /// Any byte stream of unknown length.
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
        E: Into<Error> + 'static,
    {
        Self {
            stream: stream.map_err(Into::<Error>::into).boxed(),
            length: None,
        }
    }

    /// An in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let length = bytes.len() as u64;
        Self {
            stream: stream::once(async move { Ok(bytes) }).boxed(),
            length: Some(length),
        }
    }

    /// Declare the total length of the source.
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Total length; zero counts as unknown.
    pub fn length(&self) -> Option<u64> {
        self.length.filter(|len| *len > 0)
    }

    pub(crate) fn into_parts(self) -> (BoxStream<'static, Result<Bytes>>, Option<u64>) {
        let length = self.length();
        (self.stream, length)
    }
}
