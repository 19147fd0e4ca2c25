//! Media transfer tests: uploads through a shared session and large round trips.

use super::common::{logged_in_media, start_service};
use cms_api::client::RequestMethod;
use cms_api::{UploadSource, UploadType};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LARGE_FILE_SIZE: usize = 10_000_002;
const START_MARKER: &[u8] = b"<<START>>";
const MIDDLE_MARKER: &[u8] = b"<<MIDDLE>>";
const END_MARKER: &[u8] = b"<<END>>";

fn large_payload() -> Vec<u8> {
    let mut data: Vec<u8> = (0..LARGE_FILE_SIZE).map(|i| (i % 251) as u8).collect();
    let middle = LARGE_FILE_SIZE / 2;
    let end = LARGE_FILE_SIZE - END_MARKER.len();
    data[..START_MARKER.len()].copy_from_slice(START_MARKER);
    data[middle..middle + MIDDLE_MARKER.len()].copy_from_slice(MIDDLE_MARKER);
    data[end..].copy_from_slice(END_MARKER);
    data
}

async fn mount_upload_session(server: &MockServer, uuid: &str) {
    Mock::given(method("POST"))
        .and(path("/api/rest/fileupload/init"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": uuid, "mediaId": 501})))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/api/rest/fileupload/complete/{uuid}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"mediaId": 501})))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Uploads and downloads
// ============================================================================

#[tokio::test]
async fn test_large_file_round_trip_keeps_markers() {
    let (server, _) = start_service().await;
    mount_upload_session(&server, "big-1").await;

    Mock::given(method("PUT"))
        .and(path("/api/rest/fileupload/part/big-1/0"))
        .and(header("content-length", "10000002"))
        .and(header("apiToken", "tok-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let original = large_payload();
    let upload_path = dir.path().join("big.bin");
    std::fs::write(&upload_path, &original).unwrap();

    let media = logged_in_media(&server).await;
    let init = media
        .upload(&upload_path, Some("archive/big.bin"), Some(UploadType::Media))
        .await
        .expect("Upload should succeed");
    assert_eq!(init.uuid, "big-1");

    let received = server.received_requests().await.unwrap();
    let stored = received
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .map(|r| r.body.clone())
        .expect("Part upload should have been received");
    assert_eq!(stored.len(), LARGE_FILE_SIZE);

    Mock::given(method("GET"))
        .and(path("/content/archive/big.bin"))
        .and(header("apiToken", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(stored))
        .expect(1)
        .mount(&server)
        .await;

    let download_path = dir.path().join("big-copy.bin");
    let written = media
        .download("content/archive/big.bin", &download_path)
        .await
        .expect("Download should succeed");
    assert_eq!(written, LARGE_FILE_SIZE as u64);

    let copy = std::fs::read(&download_path).unwrap();
    let middle = LARGE_FILE_SIZE / 2;
    assert_eq!(copy.len(), LARGE_FILE_SIZE);
    assert_eq!(&copy[..START_MARKER.len()], START_MARKER);
    assert_eq!(&copy[middle..middle + MIDDLE_MARKER.len()], MIDDLE_MARKER);
    assert_eq!(&copy[LARGE_FILE_SIZE - END_MARKER.len()..], END_MARKER);
    assert!(copy == original);
}

#[tokio::test]
async fn test_relay_response_into_upload() {
    let (server, _) = start_service().await;
    let origin = MockServer::start().await;
    mount_upload_session(&server, "relay-1").await;

    Mock::given(method("GET"))
        .and(path("/feeds/poster.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![42u8; 2048]))
        .mount(&origin)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/rest/fileupload/part/relay-1/0"))
        .and(header("content-length", "2048"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let media = logged_in_media(&server).await;
    let client = media.inner();

    let url = url_for(&origin, "/feeds/poster.png");
    let response = client
        .send(client.authorized(RequestMethod::Get, url).await)
        .await
        .unwrap();
    let source = UploadSource::from_response(response);
    assert_eq!(source.length(), Some(2048));

    let init = media
        .upload_stream(source, "posters/poster.png", None)
        .await
        .unwrap();
    assert_eq!(init.media_id, Some(json!(501)));
}

#[tokio::test]
async fn test_download_from_absolute_url() {
    let (server, _) = start_service().await;
    let cdn = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cache/intro.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"intro".to_vec()))
        .expect(1)
        .mount(&cdn)
        .await;

    let media = logged_in_media(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("intro.mp4");

    let written = media
        .download(url_for(&cdn, "/cache/intro.mp4").as_str(), &local)
        .await
        .unwrap();
    assert_eq!(written, 5);
    assert_eq!(std::fs::read(&local).unwrap(), b"intro");
}

fn url_for(server: &MockServer, path: &str) -> url::Url {
    url::Url::parse(&format!("{}{}", server.uri(), path)).unwrap()
}
