//! Request descriptors and raw request building.

use bytes::Bytes;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{Error, ErrorKind, Result};

/// HTTP request method supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Head,
    Delete,
    Post,
    Put,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Head => reqwest::Method::HEAD,
            RequestMethod::Delete => reqwest::Method::DELETE,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
        }
    }

    /// Write methods carry their data as a JSON body; read methods as a query string.
    pub fn is_write(&self) -> bool {
        matches!(self, RequestMethod::Post | RequestMethod::Put)
    }

    /// Uppercase method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Head => "HEAD",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical API call: method, endpoint relative to the API base, optional data.
///
/// The descriptor is kept intact so the same call can be replayed after a re-login.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: RequestMethod,
    endpoint: String,
    data: Option<Map<String, Value>>,
}

impl ApiRequest {
    /// Create a descriptor. `data` must be a JSON object (or null/absent).
    pub fn new(method: RequestMethod, endpoint: &str, data: Option<Value>) -> Result<Self> {
        let data = match data {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(Error::new(ErrorKind::Serialization(format!(
                    "request data must be a JSON object, got {}",
                    json_type_name(&other)
                ))))
            }
        };

        Ok(Self {
            method,
            endpoint: endpoint.trim_start_matches('/').to_string(),
            data,
        })
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    /// Endpoint plus the query string for read methods.
    pub fn target(&self) -> Result<String> {
        match &self.data {
            Some(data) if !self.method.is_write() && !data.is_empty() => {
                let query = encode_query(data)?;
                let separator = if self.endpoint.contains('?') { '&' } else { '?' };
                Ok(format!("{}{}{}", self.endpoint, separator, query))
            }
            _ => Ok(self.endpoint.clone()),
        }
    }

    /// JSON body for write methods. Absent data still yields an empty body.
    pub fn body(&self) -> Result<Option<Bytes>> {
        if !self.method.is_write() {
            return Ok(None);
        }
        match &self.data {
            Some(data) => Ok(Some(Bytes::from(serde_json::to_vec(data)?))),
            None => Ok(Some(Bytes::new())),
        }
    }
}

/// Query-encode a flat mapping.
///
/// Strings are sent verbatim, numbers and booleans as their JSON text, null as an
/// empty value, arrays as repeated keys and nested objects as JSON text.
pub fn encode_query(data: &Map<String, Value>) -> Result<String> {
    let mut pairs: Vec<(&str, String)> = Vec::with_capacity(data.len());
    for (key, value) in data {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.as_str(), scalar_text(item)));
                }
            }
            other => pairs.push((key.as_str(), scalar_text(other))),
        }
    }
    Ok(serde_urlencoded::to_string(pairs)?)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Request body content for raw requests.
#[derive(Debug)]
pub enum RequestBody {
    /// Buffered body; its length is sent as Content-Length.
    Bytes(Bytes),
    /// Streaming body with a known length.
    Stream { body: reqwest::Body, length: u64 },
}

/// Builder for a single raw HTTP request.
#[derive(Debug)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: Url,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) token: Option<(String, String)>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
            token: None,
        }
    }

    /// Attach the session token under the given header name.
    pub fn token(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.token = Some((header.into(), value.into()));
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set JSON bytes as body.
    pub fn json_bytes(mut self, body: Bytes) -> Self {
        self.body = Some(RequestBody::Bytes(body));
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self
    }

    /// Set bytes body.
    pub fn bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(RequestBody::Bytes(body.into()));
        self
    }

    /// Set a streaming body of known length.
    pub fn stream(mut self, body: reqwest::Body, length: u64) -> Self {
        self.body = Some(RequestBody::Stream { body, length });
        self
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}
