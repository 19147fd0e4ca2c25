//! Raw HTTP transport for the CMS service.

use reqwest::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestBuilder};
use crate::response::Response;

/// HTTP client performing one request at a time. Plain and TLS targets are
/// handled transparently based on the URL scheme.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a single request. Any HTTP status is a successful transport result;
    /// only connection-level failures are errors.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let RequestBuilder {
            method,
            url,
            headers,
            body,
            token,
        } = request;

        if self.config.enable_tracing {
            debug!(method = %method, url = %url, "Sending request");
        }

        let mut req = self.inner.request(method.to_reqwest(), url);

        if let Some((name, value)) = token {
            req = req.header(header_name(&name)?, header_value(&value)?);
        }

        for (name, value) in &headers {
            req = req.header(header_name(name)?, header_value(value)?);
        }

        if let Some(body) = body {
            req = match body {
                RequestBody::Bytes(bytes) => req.header(CONTENT_LENGTH, bytes.len()).body(bytes),
                RequestBody::Stream { body, length } => req.header(CONTENT_LENGTH, length).body(body),
            };
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        Error::with_source(ErrorKind::Config(format!("invalid header name '{}'", name)), e)
    })
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        Error::with_source(ErrorKind::Config("invalid header value".to_string()), e)
    })
}

/// Validate a header name up front so misconfiguration fails at construction.
pub(crate) fn validate_header_name(name: &str) -> Result<()> {
    header_name(name).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestMethod;
    use url::Url;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::new(ClientConfig::builder().with_tracing(false).build()).unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.config().token_header, "apiToken");
    }

    #[tokio::test]
    async fn test_token_header_attached() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/rest/ping"))
            .and(header("apiToken", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "pong": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/api/rest/ping", mock_server.uri())).unwrap();
        let response = client()
            .execute(RequestBuilder::new(RequestMethod::Get, url).token("apiToken", "test-token"))
            .await
            .unwrap();

        assert!(response.is_success());
        let api = response.into_api_response().await.unwrap();
        assert_eq!(api.into_result().unwrap()["pong"], true);
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();
        let response = client()
            .execute(RequestBuilder::new(RequestMethod::Delete, url))
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
        assert_eq!(response.status_text(), "Not Found");
    }

    #[tokio::test]
    async fn test_bytes_body_sends_content_length() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/part"))
            .and(header("content-length", "5"))
            .and(body_bytes(b"hello".to_vec()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = Url::parse(&format!("{}/part", mock_server.uri())).unwrap();
        let response = client()
            .execute(RequestBuilder::new(RequestMethod::Put, url).bytes(b"hello".to_vec()))
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP connections.
        let url = Url::parse("http://127.0.0.1:9/unreachable").unwrap();
        let err = client()
            .execute(RequestBuilder::new(RequestMethod::Get, url))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert!(err.source.is_some());
    }

    #[test]
    fn test_header_name_validation() {
        assert!(validate_header_name("apiToken").is_ok());
        assert!(validate_header_name("bad header").is_err());
    }
}
