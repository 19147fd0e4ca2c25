use std::path::Path;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

use cms_api_client::{RequestBuilder, RequestMethod};

use crate::error::{Error, ErrorKind, Result};
use crate::source::UploadSource;
use crate::types::{UploadInit, UploadInitRequest};
use crate::upload_type::UploadType;

impl super::MediaClient {
    /// Upload a local file.
    ///
    /// The remote path defaults to the file name, which puts the upload in the
    /// root folder.
    #[instrument(skip_all, fields(remote_path = ?remote_path))]
    pub async fn upload(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: Option<&str>,
        upload_type: Option<UploadType>,
    ) -> Result<UploadInit> {
        let local_path = local_path.as_ref();
        let remote_path = match remote_path {
            Some(path) => path.to_string(),
            None => local_path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::new(ErrorKind::InvalidPath(format!(
                        "'{}' has no usable file name",
                        local_path.display()
                    )))
                })?,
        };

        let source = UploadSource::from_file(local_path).await?;
        self.upload_stream(source, &remote_path, upload_type).await
    }

    /// Upload a byte source to `remote_path` (`folder/sub/name.ext`).
    ///
    /// Sources of known length go up as one streamed part at offset 0; others
    /// send every chunk as its own part at the running offset. If any part
    /// fails, the half-created media is deleted before the error is returned.
    #[instrument(skip(self, source), fields(length = ?source.length()))]
    pub async fn upload_stream(
        &self,
        source: UploadSource,
        remote_path: &str,
        upload_type: Option<UploadType>,
    ) -> Result<UploadInit> {
        let (filename, subfolder) = split_remote_path(remote_path)?;
        let upload_type = upload_type.unwrap_or_default().resolve(&filename);

        let request = UploadInitRequest {
            filename,
            filepath: subfolder,
            upload_type,
        };
        let init: UploadInit = self
            .client
            .execute_as(
                RequestMethod::Post,
                "fileupload/init",
                Some(serde_json::to_value(&request)?),
            )
            .await?;
        debug!(uuid = %init.uuid, "Upload session opened");

        let (stream, length) = source.into_parts();
        let transfer = match length {
            Some(length) => self.upload_whole(&init.uuid, stream, length).await,
            None => self.upload_chunks(&init.uuid, stream).await,
        };

        if let Err(err) = transfer {
            return Err(self.discard(&init, err).await);
        }

        self.client
            .post(&format!("fileupload/complete/{}", encode(&init.uuid)), None)
            .await?;
        debug!(uuid = %init.uuid, "Upload completed");

        Ok(init)
    }

    async fn upload_whole(
        &self,
        uuid: &str,
        stream: BoxStream<'static, Result<Bytes>>,
        length: u64,
    ) -> Result<()> {
        let request = self
            .part_request(uuid, 0)
            .await?
            .stream(reqwest::Body::wrap_stream(stream), length);
        self.send_part(request).await
    }

    async fn upload_chunks(
        &self,
        uuid: &str,
        mut stream: BoxStream<'static, Result<Bytes>>,
    ) -> Result<()> {
        let mut offset = 0u64;

        // The next chunk is only pulled once the previous part has been stored.
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                continue;
            }
            let length = chunk.len() as u64;
            let request = self.part_request(uuid, offset).await?.bytes(chunk);
            self.send_part(request).await?;
            offset += length;
        }

        debug!(total = offset, "All parts sent");
        Ok(())
    }

    async fn part_request(&self, uuid: &str, offset: u64) -> Result<RequestBuilder> {
        let url = self
            .client
            .urls()
            .api_url(&format!("fileupload/part/{}/{}", encode(uuid), offset))?;
        debug!(offset, "Uploading part");
        Ok(self
            .client
            .authorized(RequestMethod::Put, url)
            .await
            .header("Content-Type", "application/octet-stream"))
    }

    async fn send_part(&self, request: RequestBuilder) -> Result<()> {
        let response = self.client.send(request).await.map_err(|e| {
            Error::with_source(
                ErrorKind::UploadFailed {
                    status: None,
                    message: e.to_string(),
                },
                e,
            )
        })?;

        if response.is_success() {
            return Ok(());
        }

        let status = response.status();
        let reason = response.status_text();
        let body = response
            .into_api_response()
            .await
            .map(|r| r.into_value())
            .unwrap_or(Value::Null);
        let message = body
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or(reason)
            .to_string();

        Err(Error::with_source(
            ErrorKind::UploadFailed {
                status: Some(status),
                message,
            },
            cms_api_client::Error::api(status, body),
        ))
    }

    /// Delete the media created by a failed upload, exactly once.
    ///
    /// Returns the error to hand to the caller: the original one, unless the
    /// delete could not be sent at all.
    async fn discard(&self, init: &UploadInit, original: Error) -> Error {
        let target = format!("media/{}", encode(&init.cleanup_id()));
        warn!(uuid = %init.uuid, error = %original, "Upload failed, deleting partial media");

        match self.client.delete(&target, None).await {
            Ok(_) => original,
            Err(err) if err.is_transport() => {
                warn!(error = %err, "Cleanup delete could not be sent");
                err.into()
            }
            Err(err) => {
                warn!(status = ?err.status(), error = %err, "Cleanup delete failed");
                original
            }
        }
    }
}

/// Split `folder/sub/name.ext` into (`name.ext`, `folder/sub`).
pub(crate) fn split_remote_path(remote_path: &str) -> Result<(String, String)> {
    let path = remote_path.trim_start_matches('/');
    let (subfolder, filename) = path.rsplit_once('/').unwrap_or(("", path));

    if filename.is_empty() {
        return Err(Error::new(ErrorKind::InvalidPath(format!(
            "'{}' does not name a file",
            remote_path
        ))));
    }

    Ok((filename.to_string(), subfolder.to_string()))
}
