//! Maps every typed error the lower crates can raise onto an HTTP status
//! code and a `{"message": "..."}` body, centralizing the table from §7 of
//! the spec the way the original `secsend_api/app.py` centralizes its
//! `@app.exception` handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use secsend_crypto::CryptoError;
use secsend_protocol::ProtocolError;
use secsend_protocol::wire::ErrorResponse;
use secsend_store::StoreError;

/// Errors a relay HTTP handler can surface
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Object store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Envelope/metadata error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// ID codec error
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// `upload/new`'s JSON body failed schema validation
    #[error("invalid metadata: {0}")]
    Schema(String),

    /// `timeout_s` isn't in the server's allow-list
    #[error("invalid timeout value")]
    InvalidTimeout,

    /// A running `upload/push` crossed `filesize_limit`
    #[error("file limit exceeded")]
    SizeLimitExceeded,

    /// `upload/push` targeted an object that already finished uploading
    #[error("ID '{0}' is already complete")]
    AlreadyComplete(String),

    /// `upload/new` exhausted its retry budget generating a fresh ID
    #[error("no more available IDs")]
    IdUnavailable,

    /// `delete` was called with a file-id instead of a root-id
    #[error("a root ID is required for this operation")]
    WrongIdKind,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Store(e) => match e {
                StoreError::IdUnknown => StatusCode::NOT_FOUND,
                StoreError::IdExists => StatusCode::INTERNAL_SERVER_ERROR,
                StoreError::FileLocked => StatusCode::BAD_REQUEST,
                StoreError::InvalidMetadata => StatusCode::INTERNAL_SERVER_ERROR,
                StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Protocol(_) => StatusCode::BAD_REQUEST,
            ServerError::Crypto(e) => match e {
                CryptoError::IdInvalid(_) => StatusCode::BAD_REQUEST,
                CryptoError::IdWrongType(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_REQUEST,
            },
            ServerError::Schema(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidTimeout => StatusCode::BAD_REQUEST,
            ServerError::SizeLimitExceeded => StatusCode::BAD_REQUEST,
            ServerError::AlreadyComplete(_) => StatusCode::BAD_REQUEST,
            ServerError::IdUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::WrongIdKind => StatusCode::BAD_REQUEST,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal relay error");
        } else {
            tracing::debug!(error = %self, "rejecting request");
        }

        (status, Json(ErrorResponse::from_message(self.to_string()))).into_response()
    }
}
