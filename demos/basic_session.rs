//! Basic session walkthrough against a CMS instance
//!
//! Logs in, lists a few media items, uploads a small text file into a
//! subfolder, downloads it again and logs out.
//!
//! Required environment variables:
//! - CMS_URL (or CMS_API_URL)
//! - CMS_USERNAME (or CMS_API_USERNAME)
//! - CMS_PASSWORD (or CMS_API_PASSWORD)
//!
//! Run with: cargo run --example basic_session

use cms_api::{Credentials, MediaClient, UploadSource, UploadType};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let creds = Credentials::from_env()?;
    println!("Connecting to {} as {}", creds.base_url(), creds.username());

    let media = MediaClient::connect(&creds).await?;
    let client = media.inner();
    println!("✓ Logged in, API base {}", client.api_base());

    let items = client.get("media", Some(json!({"limit": 5}))).await?;
    println!("✓ Media listing: {}", items);

    let source = UploadSource::from_bytes(&b"hello from cms-api\n"[..]);
    let init = media
        .upload_stream(source, "cms-api-demo/hello.txt", Some(UploadType::Media))
        .await?;
    println!("✓ Uploaded, session {}", init.uuid);

    let local = std::env::temp_dir().join("cms-api-demo-hello.txt");
    let written = media
        .download("content/cms-api-demo/hello.txt", &local)
        .await?;
    println!("✓ Downloaded {} bytes to {}", written, local.display());

    client.logout().await;
    println!("✓ Logged out");

    Ok(())
}
