//! Upload session types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `fileupload/init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInitRequest {
    pub filename: String,
    /// Target subfolder, empty for the root.
    pub filepath: String,
    pub upload_type: String,
}

/// Result of `fileupload/init`, returned to the caller once the upload completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadInit {
    /// Upload session identifier.
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Media id; numeric or textual depending on the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<Value>,
    /// Any other fields the service assigned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadInit {
    /// Identifier used by the cleanup delete: the media id, else the upload uuid.
    pub fn cleanup_id(&self) -> String {
        match &self.media_id {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => self.uuid.clone(),
        }
    }
}
