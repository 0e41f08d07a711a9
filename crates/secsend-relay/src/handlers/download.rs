//! `GET /v1/metadata/<file_id>`, `GET /v1/download/<file_id>`
//!
//! Range support is limited to the open-ended `bytes=N-` form the spec
//! calls for: the recipient either downloads the whole object or resumes
//! from a ciphertext-chunk-aligned offset it already computed client-side.

use std::ops::Bound;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use axum_extra::headers::Range;
use axum_extra::TypedHeader;
use tokio::io::AsyncSeekExt;
use tokio_util::io::ReaderStream;

use secsend_crypto::FileId;
use secsend_protocol::wire::MetadataResponse;
use secsend_store::StoreError;

use crate::error::ServerError;
use crate::state::AppState;

/// `GET /v1/metadata/<file_id>`
pub async fn metadata_handler(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<MetadataResponse>, ServerError> {
    let file_id = FileId::parse(&file_id)?;
    let handle = state.store.open(file_id);
    handle.check_validity().await?;

    let metadata = handle.metadata().await?;
    let size = handle.size().await;
    Ok(Json(MetadataResponse { metadata, size }))
}

/// Resolve the start offset of an open-ended `bytes=N-` range request.
/// Only the first satisfiable range is honored, matching the spec's
/// single-range, open-ended-only contract.
fn range_start(range: Option<&Range>, total: u64) -> u64 {
    range
        .and_then(|r| r.satisfiable_ranges(total).next())
        .and_then(|(start, _end)| match start {
            Bound::Included(n) => Some(n),
            _ => None,
        })
        .unwrap_or(0)
}

/// `GET /v1/download/<file_id>` — streams ciphertext, honoring an
/// open-ended byte-range request with a `206 Partial Content` response.
pub async fn download_handler(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    range: Option<TypedHeader<Range>>,
) -> Result<Response, ServerError> {
    let file_id = FileId::parse(&file_id)?;
    let handle = state.store.open(file_id);
    handle.check_validity().await?;

    let metadata = handle.metadata().await?;
    if !metadata.complete {
        return Err(StoreError::IdUnknown.into());
    }

    let total = handle.size().await;
    let mut file = handle.stream_read().await?;

    let start = range_start(range.as_ref().map(|TypedHeader(r)| r), total).min(total);
    if start > 0 {
        file.seek(std::io::SeekFrom::Start(start)).await.map_err(StoreError::from)?;
    }
    let remaining = total - start;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let mut response = Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, remaining.to_string());

    if start > 0 {
        response = response
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_RANGE, format!("bytes {start}-{}/{total}", total.saturating_sub(1)));
    } else {
        response = response.status(StatusCode::OK);
    }

    response
        .body(body)
        .map_err(|e| ServerError::Store(StoreError::Io(e.to_string())))
}
