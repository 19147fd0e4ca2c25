//! Login credentials.
//!
//! The password is redacted in Debug output.

use crate::error::{Error, ErrorKind, Result};

/// Service location plus the username/password pair used to log in.
#[derive(Clone)]
pub struct Credentials {
    base_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Create new credentials with the given values.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Load credentials from environment variables.
    ///
    /// Reads `CMS_URL`, `CMS_USERNAME` and `CMS_PASSWORD`; each is also
    /// accepted with a `CMS_API_` prefix instead.
    pub fn from_env() -> Result<Self> {
        let base_url = env_var("CMS_URL", "CMS_API_URL")?;
        let username = env_var("CMS_USERNAME", "CMS_API_USERNAME")?;
        let password = env_var("CMS_PASSWORD", "CMS_API_PASSWORD")?;

        Ok(Self::new(base_url, username, password))
    }

    /// Root URL of the service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

fn env_var(name: &str, alternate: &str) -> Result<String> {
    std::env::var(name)
        .or_else(|_| std::env::var(alternate))
        .map_err(|e| {
            Error::with_source(
                ErrorKind::Config(format!("Environment variable not set: {}", name)),
                e,
            )
        })
}
