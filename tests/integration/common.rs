use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cms_api::{ClientConfig, CmsClient, MediaClient};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const USERNAME: &str = "operator";
pub const PASSWORD: &str = "correct horse";

/// Start a mock service whose login hands out `tok-1`, `tok-2`, ... in order.
///
/// Returns the server and the number of logins served so far.
pub async fn start_service() -> (MockServer, Arc<AtomicU32>) {
    let server = MockServer::start().await;
    let logins = Arc::new(AtomicU32::new(0));
    let counter = logins.clone();

    Mock::given(method("POST"))
        .and(path("/api/rest/auth/login"))
        .and(body_json(json!({"username": USERNAME, "password": PASSWORD})))
        .respond_with(move |_: &Request| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            ResponseTemplate::new(200).set_body_json(json!({
                "apiToken": format!("tok-{n}"),
                "token": format!("alt-{n}"),
                "username": USERNAME
            }))
        })
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/rest/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"loggedOut": true})))
        .mount(&server)
        .await;

    (server, logins)
}

pub fn client(server: &MockServer) -> CmsClient {
    CmsClient::with_config(
        server.uri(),
        ClientConfig::builder().with_tracing(false).build(),
    )
    .expect("Failed to create client")
}

pub async fn logged_in_media(server: &MockServer) -> MediaClient {
    let client = client(server);
    client
        .login(USERNAME, PASSWORD)
        .await
        .expect("Login should succeed");
    MediaClient::from_client(client)
}

pub fn expired_body() -> serde_json::Value {
    json!({"httpErrorCode": 401, "code": "NoUserLogon", "description": "Not logged in"})
}
