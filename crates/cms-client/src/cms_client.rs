//! Session-aware CMS client.
//!
//! `CmsClient` owns the session for one service: it attaches the token to every
//! call, logs in and out, and recovers from an expired session by logging in
//! again and replaying the failed call exactly once.
//!
//! ## Security
//!
//! - Tokens and passwords are redacted in Debug output
//! - Passwords are skipped in tracing spans

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::client::{validate_header_name, HttpClient};
use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{ApiRequest, RequestBuilder, RequestMethod};
use crate::response::{ApiResponse, Response};
use crate::session::{ServiceUrls, SessionState};

/// High-level client for the CMS REST API.
///
/// Clones share the same session, so a login through one clone is visible to
/// all of them.
///
/// # Example
///
/// ```rust,ignore
/// use cms_api_client::CmsClient;
/// use serde_json::json;
///
/// let client = CmsClient::new("https://cms.example.com")?;
/// client.login("admin", "secret").await?;
///
/// let media = client.get("media", Some(json!({"limit": 20}))).await?;
/// client.put("media/12", Some(json!({"name": "Lobby loop"}))).await?;
/// ```
#[derive(Clone)]
pub struct CmsClient {
    http: HttpClient,
    urls: ServiceUrls,
    session: Arc<RwLock<SessionState>>,
    login_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for CmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsClient")
            .field("root_url", &self.urls.root().as_str())
            .field("token_header", &self.http.config().token_header)
            .finish_non_exhaustive()
    }
}

impl CmsClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(base_url: impl AsRef<str>, config: ClientConfig) -> Result<Self> {
        validate_header_name(&config.token_header)?;
        let urls = ServiceUrls::new(base_url.as_ref(), &config.api_path)?;
        let http = HttpClient::new(config)?;
        Ok(Self {
            http,
            urls,
            session: Arc::new(RwLock::new(SessionState::new())),
            login_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Create a client and log in with the given credentials.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        Self::connect_with_config(credentials, ClientConfig::default()).await
    }

    /// Create a client with custom configuration and log in.
    pub async fn connect_with_config(
        credentials: &Credentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = Self::with_config(credentials.base_url(), config)?;
        client
            .login(credentials.username(), credentials.password())
            .await?;
        Ok(client)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    /// Name of the token header.
    pub fn token_header(&self) -> &str {
        &self.http.config().token_header
    }

    /// Service root URL.
    pub fn root_url(&self) -> &Url {
        self.urls.root()
    }

    /// REST API base URL.
    pub fn api_base(&self) -> &Url {
        self.urls.api_base()
    }

    /// Service URL helpers.
    pub fn urls(&self) -> &ServiceUrls {
        &self.urls
    }

    /// Current session token.
    pub async fn token(&self) -> Option<String> {
        self.session.read().await.token.clone()
    }

    /// True once a login succeeded and no logout or expiry happened since.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.token.is_some()
    }

    /// Response object of the most recent login attempt (empty object before any).
    pub async fn last_login_response(&self) -> Value {
        self.session.read().await.last_login_response.clone()
    }

    // =========================================================================
    // Raw requests (with authentication)
    // =========================================================================

    /// Create a raw request builder carrying the current token, if any.
    pub async fn authorized(&self, method: RequestMethod, url: Url) -> RequestBuilder {
        let builder = RequestBuilder::new(method, url);
        match self.token().await {
            Some(token) => builder.token(self.token_header(), token),
            None => builder,
        }
    }

    /// Send a raw request without JSON handling or re-login.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    // =========================================================================
    // Generic API calls
    // =========================================================================

    /// Issue one API call and return its parsed body.
    ///
    /// If the service reports an expired session, the client logs in again with
    /// the credentials of the last login and replays the call once. A second
    /// failure is returned as is.
    #[instrument(skip_all, fields(method = %method, endpoint = %endpoint))]
    pub async fn execute(
        &self,
        method: RequestMethod,
        endpoint: &str,
        data: Option<Value>,
    ) -> Result<Value> {
        let request = ApiRequest::new(method, endpoint, data)?;
        let response = self.send_api(&request).await?;

        if !response.is_session_expired() {
            return response.into_result();
        }

        warn!(endpoint = %request.endpoint(), "Session expired, logging in again");
        let credentials = {
            let mut session = self.session.write().await;
            session.clear_tokens();
            session.credentials()
        };

        let Some((username, password)) = credentials else {
            let original = Error::api(response.status(), response.into_value());
            return Err(Error::with_source(ErrorKind::SessionExpired, original));
        };

        self.login(&username, &password).await?;

        // Replayed once; whatever comes back now is final.
        self.send_api(&request).await?.into_result()
    }

    /// Issue one API call and deserialize the body.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        method: RequestMethod,
        endpoint: &str,
        data: Option<Value>,
    ) -> Result<T> {
        let value = self.execute(method, endpoint, data).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// GET with `data` as query string.
    pub async fn get(&self, endpoint: &str, data: Option<Value>) -> Result<Value> {
        self.execute(RequestMethod::Get, endpoint, data).await
    }

    /// HEAD with `data` as query string.
    pub async fn head(&self, endpoint: &str, data: Option<Value>) -> Result<Value> {
        self.execute(RequestMethod::Head, endpoint, data).await
    }

    /// DELETE with `data` as query string.
    pub async fn delete(&self, endpoint: &str, data: Option<Value>) -> Result<Value> {
        self.execute(RequestMethod::Delete, endpoint, data).await
    }

    /// POST with `data` as JSON body.
    pub async fn post(&self, endpoint: &str, data: Option<Value>) -> Result<Value> {
        self.execute(RequestMethod::Post, endpoint, data).await
    }

    /// PUT with `data` as JSON body.
    pub async fn put(&self, endpoint: &str, data: Option<Value>) -> Result<Value> {
        self.execute(RequestMethod::Put, endpoint, data).await
    }

    async fn send_api(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.urls.api_url(&request.target()?)?;
        let mut builder = self.authorized(request.method(), url).await;
        if let Some(body) = request.body()? {
            builder = builder.json_bytes(body);
        }
        let response = self.http.execute(builder).await?;
        let response = response.into_api_response().await?;

        if self.http.config().enable_tracing {
            debug!(
                status = response.status(),
                effective_status = response.effective_status(),
                "API response parsed"
            );
        }

        Ok(response)
    }

    // =========================================================================
    // Session management
    // =========================================================================

    /// Log in, replacing any current session.
    ///
    /// An existing session is logged out first; a failing logout is ignored.
    /// Tokens are cleared before the login call either way.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Value> {
        let _guard = self.login_lock.lock().await;

        if self.urls.exposes_credentials() {
            warn!(
                url = %self.urls.root(),
                "Logging in over an unencrypted connection, credentials are sent in clear text"
            );
        }

        self.logout_current().await;

        {
            let mut session = self.session.write().await;
            session.clear_tokens();
            session.username = Some(username.to_string());
            session.password = Some(password.to_string());
        }

        let request = ApiRequest::new(
            RequestMethod::Post,
            "auth/login",
            Some(json!({ "username": username, "password": password })),
        )?;
        let response = self.send_api(&request).await?;
        let status = response.status();
        let body = response.into_value();

        let mut session = self.session.write().await;
        session.last_login_response = body.clone();

        if status >= 400 {
            return Err(Error::api(status, body));
        }

        let token_header = self.token_header();
        let token = body
            .get(token_header)
            .and_then(token_text)
            .ok_or_else(|| {
                Error::new(ErrorKind::MissingToken {
                    field: token_header.to_string(),
                })
            })?;

        session.token = Some(token);
        session.previous_token = body.get("token").and_then(token_text);
        debug!("Login succeeded");

        Ok(body)
    }

    /// Log out and forget the stored credentials. Failures are ignored.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let _guard = self.login_lock.lock().await;
        self.logout_current().await;

        let mut session = self.session.write().await;
        session.clear_tokens();
        session.username = None;
        session.password = None;
    }

    /// Best-effort logout of the current session using the alternate token.
    async fn logout_current(&self) {
        let previous = {
            let session = self.session.read().await;
            if session.token.is_none() {
                return;
            }
            session.previous_token.clone()
        };

        let result = async {
            let request = ApiRequest::new(
                RequestMethod::Get,
                "auth/logout",
                Some(json!({ "token": previous })),
            )?;
            self.send_api(&request).await
        }
        .await;

        let mut session = self.session.write().await;
        match result {
            Ok(response) => {
                let status = response.status();
                session.last_login_response = response.into_value();
                if status >= 400 {
                    warn!(status, "Logout failed, continuing");
                }
            }
            Err(err) => warn!(error = %err, "Logout failed, continuing"),
        }
        session.clear_tokens();
    }
}

fn token_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
