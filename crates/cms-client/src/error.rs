//! Error types for cms-client.

use serde_json::Value;

/// Result type alias for cms-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for cms-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Create an API error from a transport status and the parsed (or synthesized) body.
    pub fn api(status: u16, body: Value) -> Self {
        Self::new(ErrorKind::Api { status, body })
    }

    /// HTTP status carried by this error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response payload of an API error.
    pub fn body(&self) -> Option<&Value> {
        match &self.kind {
            ErrorKind::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns true if the request never got an HTTP answer.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// Returns true if the error payload is the service's "no user logon" signature.
    pub fn is_session_expired(&self) -> bool {
        match &self.kind {
            ErrorKind::SessionExpired => true,
            ErrorKind::Api { body, .. } => crate::response::is_expiry_signature(body),
            _ => false,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Connection-level failure; the original transport error is the source.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with status >= 400.
    #[error("API error: {status} {}", describe_body(.body))]
    Api { status: u16, body: Value },

    /// Login succeeded at the HTTP level but the token field was absent.
    #[error("No token received: login response has no '{field}' field")]
    MissingToken { field: String },

    /// The session expired and there are no stored credentials to log in again with.
    #[error("Session expired and no credentials are stored for re-login")]
    SessionExpired,

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Request data could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn describe_body(body: &Value) -> String {
    let code = body.get("code").and_then(Value::as_str);
    let description = body
        .get("description")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str);

    match (code, description) {
        (Some(code), Some(description)) => format!("{code} - {}", truncate(description)),
        (Some(code), None) => code.to_string(),
        (None, Some(description)) => truncate(description),
        (None, None) => String::new(),
    }
}

fn truncate(message: &str) -> String {
    const MAX_LENGTH: usize = 200;

    if message.chars().count() <= MAX_LENGTH {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(MAX_LENGTH).collect();
    truncated.push_str("...[truncated]");
    truncated
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::with_source(ErrorKind::Transport(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
