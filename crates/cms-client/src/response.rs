//! HTTP response handling and API body classification.

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use serde_json::{json, Value};

use crate::error::{Error, Result};

/// Wrapper around a raw HTTP response.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Canonical reason phrase of the status ("OK", "Not Found", ...).
    pub fn status_text(&self) -> &'static str {
        self.inner.status().canonical_reason().unwrap_or("")
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Content-Length announced by the service, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    /// Get the response body as bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        self.inner.bytes().await.map_err(Into::into)
    }

    /// Stream the response body.
    pub fn bytes_stream(self) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        self.inner.bytes_stream().map_err(Error::from)
    }

    /// Read the whole body and classify it as an API response.
    pub async fn into_api_response(self) -> Result<ApiResponse> {
        let status = self.status();
        let reason = self.status_text();
        let body = self.bytes().await?;
        Ok(ApiResponse::parse(status, reason, &body))
    }

    /// Get access to the inner reqwest::Response.
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}

/// Error object synthesized when a non-empty body is not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedBody {
    /// Always 500; the transport status is kept separately on [`ApiResponse`].
    pub http_error_code: u16,
    /// Reason phrase of the transport status.
    pub code: String,
    /// Raw body text.
    pub description: String,
}

impl MalformedBody {
    /// The mapping handed to callers in place of the unparseable body.
    pub fn to_value(&self) -> Value {
        json!({
            "httpErrorCode": self.http_error_code,
            "code": self.code,
            "description": self.description,
        })
    }
}

/// Parsed body of an API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    /// Zero-length body.
    Empty,
    /// Valid JSON of any shape.
    Json(Value),
    /// Non-empty body that failed to parse.
    Malformed(MalformedBody),
}

/// A completed API call: transport status plus the classified body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: u16,
    body: ParsedBody,
}

impl ApiResponse {
    /// Classify a raw body. Never fails: bad JSON becomes [`ParsedBody::Malformed`].
    pub fn parse(status: u16, reason: &str, body: &[u8]) -> Self {
        let body = if body.is_empty() {
            ParsedBody::Empty
        } else {
            match serde_json::from_slice::<Value>(body) {
                Ok(value) => ParsedBody::Json(value),
                Err(_) => ParsedBody::Malformed(MalformedBody {
                    http_error_code: 500,
                    code: reason.to_string(),
                    description: String::from_utf8_lossy(body).into_owned(),
                }),
            }
        };
        Self { status, body }
    }

    /// Transport status as received. Drives the success/failure decision.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Status used when classifying the payload: 500 for malformed bodies.
    pub fn effective_status(&self) -> u16 {
        match self.body {
            ParsedBody::Malformed(_) => 500,
            _ => self.status,
        }
    }

    pub fn body(&self) -> &ParsedBody {
        &self.body
    }

    /// True when the body is the service's "no user logon" error object.
    pub fn is_session_expired(&self) -> bool {
        match &self.body {
            ParsedBody::Json(value) => is_expiry_signature(value),
            _ => false,
        }
    }

    /// The body as a JSON value. Empty bodies become `null`.
    pub fn into_value(self) -> Value {
        match self.body {
            ParsedBody::Empty => Value::Null,
            ParsedBody::Json(value) => value,
            ParsedBody::Malformed(malformed) => malformed.to_value(),
        }
    }

    /// Resolve on status < 400, reject with the payload otherwise.
    pub fn into_result(self) -> Result<Value> {
        let status = self.status;
        let value = self.into_value();
        if status >= 400 {
            Err(Error::api(status, value))
        } else {
            Ok(value)
        }
    }
}

pub(crate) fn is_expiry_signature(value: &Value) -> bool {
    let code_matches = value.get("code").and_then(Value::as_str) == Some("NoUserLogon");
    let status_matches = match value.get("httpErrorCode") {
        Some(Value::Number(n)) => n.as_u64() == Some(401),
        Some(Value::String(s)) => s == "401",
        _ => false,
    };
    code_matches && status_matches
}
