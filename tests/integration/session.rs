//! Session lifecycle tests: login, re-login on expiry, logout.

use std::sync::atomic::Ordering;

use super::common::{client, expired_body, start_service, PASSWORD, USERNAME};
use cms_api::client::ErrorKind;
use cms_api::Credentials;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_expiry_rotates_token_and_replays_call() {
    let (server, logins) = start_service().await;

    // The first token is rejected as expired; the second one works.
    Mock::given(method("PUT"))
        .and(path("/api/rest/playlists/9"))
        .and(header("apiToken", "tok-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(expired_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/rest/playlists/9"))
        .and(header("apiToken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "name": "Lobby"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.login(USERNAME, PASSWORD).await.unwrap();

    let updated = client
        .put("playlists/9", Some(json!({"name": "Lobby"})))
        .await
        .expect("Replayed call should succeed");

    assert_eq!(updated["name"], "Lobby");
    assert_eq!(logins.load(Ordering::SeqCst), 2);
    assert_eq!(client.token().await.as_deref(), Some("tok-2"));
    assert_eq!(client.last_login_response().await["token"], "alt-2");
}

#[tokio::test]
async fn test_connect_and_logout() {
    let (server, logins) = start_service().await;

    Mock::given(method("GET"))
        .and(path("/api/rest/auth/logout"))
        .and(query_param("token", "alt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"loggedOut": true})))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::new(server.uri(), USERNAME, PASSWORD);
    let client = cms_api::CmsClient::connect(&creds)
        .await
        .expect("Connect should log in");

    assert!(client.is_authenticated().await);
    assert_eq!(logins.load(Ordering::SeqCst), 1);

    client.logout().await;
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn test_clones_share_the_session() {
    let (server, _) = start_service().await;

    Mock::given(method("GET"))
        .and(path("/api/rest/displays"))
        .and(header("apiToken", "tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let other = client.clone();
    client.login(USERNAME, PASSWORD).await.unwrap();

    let displays = other.get("displays", None).await.unwrap();
    assert_eq!(displays, json!([{"id": 1}]));
}

#[tokio::test]
async fn test_concurrent_expiry_recovers() {
    let (server, logins) = start_service().await;

    Mock::given(method("GET"))
        .and(path("/api/rest/media"))
        .and(header("apiToken", "tok-1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(expired_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/rest/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client(&server);
    client.login(USERNAME, PASSWORD).await.unwrap();

    let (a, b) = tokio::join!(client.get("media", None), client.get("media", None));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert!(logins.load(Ordering::SeqCst) >= 2);
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_non_json_success_body_is_not_an_error() {
    let (server, _) = start_service().await;

    Mock::given(method("GET"))
        .and(path("/api/rest/system/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let client = client(&server);
    client.login(USERNAME, PASSWORD).await.unwrap();

    let value = client.get("system/ping", None).await.unwrap();
    assert_eq!(value["httpErrorCode"], 500);
    assert_eq!(value["code"], "OK");
    assert_eq!(value["description"], "pong");
}

#[tokio::test]
async fn test_rejected_login_surfaces_payload() {
    let server = wiremock::MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rest/auth/login"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"httpErrorCode": 403, "code": "InvalidCredentials"})),
        )
        .mount(&server)
        .await;

    let client = client(&server);
    let err = client.login("someone", "wrong").await.unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Api { status: 403, .. }));
    assert_eq!(client.last_login_response().await["code"], "InvalidCredentials");
    assert!(!client.is_authenticated().await);
}
