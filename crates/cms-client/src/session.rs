//! Session state owned by one client.
//!
//! Tokens and the credentials of the most recent login live here. The state is
//! only mutated by login/logout and by the re-login path of the request executor.

use serde_json::{Map, Value};
use url::{Host, Url};

use crate::error::{Error, ErrorKind, Result};

/// Service root and the REST API base derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    root: Url,
    api_base: Url,
}

impl ServiceUrls {
    /// Parse the service root and derive `<root>/<api_path>`.
    pub fn new(base_url: &str, api_path: &str) -> Result<Self> {
        let mut root = Url::parse(base_url)?;
        if root.cannot_be_a_base() || root.host().is_none() {
            return Err(Error::new(ErrorKind::InvalidUrl(format!(
                "'{}' cannot be used as a service root",
                base_url
            ))));
        }
        root.set_query(None);
        root.set_fragment(None);
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }

        let mut api_path = api_path.trim_start_matches('/').to_string();
        if !api_path.is_empty() && !api_path.ends_with('/') {
            api_path.push('/');
        }
        let api_base = root.join(&api_path)?;

        Ok(Self { root, api_base })
    }

    /// Service root, always ending with `/`.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// REST API base, always ending with `/`.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Resolve an endpoint (with optional query) against the API base.
    pub fn api_url(&self, target: &str) -> Result<Url> {
        Ok(self.api_base.join(target.trim_start_matches('/'))?)
    }

    /// Resolve a download path against the root. Absolute URLs are taken as-is;
    /// a leading `/` is dropped so relative paths cannot escape the root prefix.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        Ok(self.root.join(path.trim_start_matches('/'))?)
    }

    /// True for https targets.
    pub fn is_secure(&self) -> bool {
        self.root.scheme() == "https"
    }

    /// True when the host is a loopback address or `localhost`.
    pub fn is_loopback(&self) -> bool {
        match self.root.host() {
            Some(Host::Ipv4(addr)) => addr.is_loopback(),
            Some(Host::Ipv6(addr)) => addr.is_loopback(),
            Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
            None => false,
        }
    }

    /// Credentials sent to this service would cross the network unencrypted.
    pub fn exposes_credentials(&self) -> bool {
        !self.is_secure() && !self.is_loopback()
    }
}

/// Mutable per-client session data.
#[derive(Clone, Default)]
pub struct SessionState {
    pub(crate) token: Option<String>,
    pub(crate) previous_token: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) last_login_response: Value,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "previous_token",
                &self.previous_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            last_login_response: Value::Object(Map::new()),
            ..Default::default()
        }
    }

    pub(crate) fn clear_tokens(&mut self) {
        self.token = None;
        self.previous_token = None;
    }

    pub(crate) fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        }
    }
}
