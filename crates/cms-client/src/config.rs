//! Client configuration.

use std::time::Duration;

/// Connection and session settings shared by every call a client makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Header carrying the session token; the login response holds it under the same name.
    pub token_header: String,
    /// REST API location below the service root.
    pub api_path: String,
    /// Whole-request timeout. Unset means none; large transfers can run for a long time.
    pub timeout: Option<Duration>,
    /// Limit for establishing a connection.
    pub connect_timeout: Duration,
    /// How long an unused pooled connection stays open.
    pub pool_idle_timeout: Duration,
    /// Upper bound of unused pooled connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// Sent as `User-Agent`.
    pub user_agent: String,
    /// Emit debug traces for each request and response.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token_header: crate::DEFAULT_TOKEN_HEADER.to_string(),
            api_path: crate::DEFAULT_API_PATH.to_string(),
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(60),
            pool_max_idle_per_host: 4,
            user_agent: crate::USER_AGENT.to_string(),
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    /// Start from the defaults.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: ClientConfig::default(),
        }
    }
}

/// Fluent construction of a [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Token header name (default `apiToken`).
    pub fn with_token_header(mut self, name: impl Into<String>) -> Self {
        self.config.token_header = name.into();
        self
    }

    /// REST API path below the service root (default `api/rest/`).
    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.config.api_path = path.into();
        self
    }

    /// Abort any call that takes longer than `timeout`, transfers included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_pool_idle_timeout(mut self, idle: Duration) -> Self {
        self.config.pool_idle_timeout = idle;
        self
    }

    pub fn with_pool_max_idle(mut self, connections: usize) -> Self {
        self.config.pool_max_idle_per_host = connections;
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Turn per-request debug traces on or off. Never affects behavior.
    pub fn with_tracing(mut self, on: bool) -> Self {
        self.config.enable_tracing = on;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
