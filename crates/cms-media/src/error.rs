//! Error types for cms-media.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// HTTP status of the failed call, when the service answered.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::UploadFailed { status, .. } => *status,
            ErrorKind::Download { status, .. } => Some(*status),
            ErrorKind::Client(_) => self.client_error().and_then(|e| e.status()),
            _ => None,
        }
    }

    /// The wrapped client error, if this error came from the session client.
    pub fn client_error(&self) -> Option<&cms_api_client::Error> {
        self.source.as_ref()?.downcast_ref::<cms_api_client::Error>()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Client error: {0}")]
    Client(String),
    #[error("Upload failed{}: {message}", status_suffix(.status))]
    UploadFailed {
        status: Option<u16>,
        message: String,
    },
    #[error("Download failed with status {status}: {message}")]
    Download { status: u16, message: String },
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

impl From<cms_api_client::Error> for Error {
    fn from(err: cms_api_client::Error) -> Self {
        Error {
            kind: ErrorKind::Client(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Io(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        cms_api_client::Error::from(err).into()
    }
}
