//! JSON request/response bodies for the `/v1` relay endpoints. Handler and
//! transport concerns (routing, status codes) live in `secsend-relay`; this
//! only fixes the shapes both ends agree on.

use serde::{Deserialize, Serialize};

use crate::metadata::EncryptedFileMetadata;

/// Body of `POST /v1/upload/new`: the client's freshly sealed metadata.
/// Deserializes directly into [`EncryptedFileMetadata`] — the client never
/// sends `complete`/`timeout_ts`, which the server injects itself.
pub type UploadNewRequest = EncryptedFileMetadata;

/// `200` response to `POST /v1/upload/new`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadNewResponse {
    /// The freshly minted root-id, in its textual form
    pub root_id: String,
}

/// `200` response shared by `upload/push`, `upload/finish`, and `delete` —
/// an empty JSON object, matching the original API's `response.json({})`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmptyResponse {}

/// `200` response to `GET /v1/metadata/<file_id>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataResponse {
    /// The stored envelope
    pub metadata: EncryptedFileMetadata,
    /// Current size of the content file in bytes
    pub size: u64,
}

/// `200` response to `GET /v1/config`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    /// Accepted `timeout_s` values
    pub timeout_s_valid: Vec<u64>,
    /// Maximum upload size in bytes, 0 meaning unlimited
    pub filesize_limit: u64,
}

/// Body of an error response: `{"message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error description
    pub message: String,
}

impl ErrorResponse {
    /// Build an error body from any displayable error
    pub fn from_message(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
