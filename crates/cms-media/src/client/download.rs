use std::path::Path;

use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt, TryStreamExt};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};

use cms_api_client::{CmsClient, RequestMethod};

use crate::error::{Error, ErrorKind, Result};

impl super::MediaClient {
    /// Stream a file from the service.
    ///
    /// Returns immediately; the request is sent on first poll. `remote_path` is
    /// resolved against the service root, not the API base, and may also be an
    /// absolute URL. Any status other than 200 yields a single error and no data.
    pub fn download_stream(&self, remote_path: &str) -> BoxStream<'static, Result<Bytes>> {
        let client = self.client.clone();
        let remote_path = remote_path.to_string();

        stream::once(async move { open_download(client, remote_path).await })
            .try_flatten()
            .boxed()
    }

    /// Download a file to `local_path` and return the number of bytes written.
    ///
    /// The local file is removed if the transfer or the write fails.
    #[instrument(skip(self, local_path))]
    pub async fn download(&self, remote_path: &str, local_path: impl AsRef<Path>) -> Result<u64> {
        let local_path = local_path.as_ref();
        let file = tokio::fs::File::create(local_path).await?;
        let mut writer = BufWriter::new(file);

        let result = async {
            let mut stream = self.download_stream(remote_path);
            let mut written = 0u64;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                writer.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            writer.flush().await?;
            Ok::<_, Error>(written)
        }
        .await;

        drop(writer);

        match result {
            Ok(written) => {
                debug!(bytes = written, "Download complete");
                Ok(written)
            }
            Err(err) => {
                if let Err(remove_err) = tokio::fs::remove_file(local_path).await {
                    warn!(error = %remove_err, path = %local_path.display(), "Could not remove partial download");
                }
                Err(err)
            }
        }
    }
}

async fn open_download(
    client: CmsClient,
    remote_path: String,
) -> Result<impl Stream<Item = Result<Bytes>>> {
    let url = client.urls().resolve(&remote_path)?;
    debug!(url = %url, "Starting download");

    let request = client.authorized(RequestMethod::Get, url).await;
    let response = client.send(request).await?;

    if response.status() != 200 {
        return Err(Error::new(ErrorKind::Download {
            status: response.status(),
            message: response.status_text().to_string(),
        }));
    }

    Ok(response.bytes_stream().map_err(Error::from))
}
