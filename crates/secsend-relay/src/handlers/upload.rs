//! `POST /v1/upload/new`, `/upload/push/<root_id>`, `/upload/finish/<root_id>`

use axum::body::Body;
use axum::extract::{Path, State};
use axum::Json;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use secsend_crypto::RootId;
use secsend_protocol::metadata::ALGO;
use secsend_protocol::wire::{EmptyResponse, UploadNewRequest, UploadNewResponse};
use secsend_store::{ObjectStore, StoreError};

use crate::error::ServerError;
use crate::state::AppState;

/// How many fresh root-ids `upload/new` tries before giving up, matching
/// the original `for i in range(8)` retry loop
const ID_RETRIES: u32 = 8;

/// Try up to [`ID_RETRIES`] ids from `next_id`, creating a pending object in
/// `store` for the first one that doesn't collide.
///
/// Factored out of [`upload_new`] and parameterized over the id source so
/// the exhaustion path (scenario 5: `upload/new` giving up after 8
/// collisions) can be exercised with a deliberately colliding `next_id`
/// instead of needing to actually exhaust the real 2^80 root-id space.
pub async fn create_with_retry(
    store: &ObjectStore,
    metadata: &UploadNewRequest,
    mut next_id: impl FnMut() -> RootId,
) -> Result<RootId, ServerError> {
    for _ in 0..ID_RETRIES {
        let root_id = next_id();
        let file_id = root_id.file_id();
        match store.create(file_id, metadata).await {
            Ok(_handle) => return Ok(root_id),
            Err(StoreError::IdExists) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(ServerError::IdUnavailable)
}

/// `POST /v1/upload/new` — mint a fresh root-id and persist a pending object
pub async fn upload_new(
    State(state): State<AppState>,
    Json(mut metadata): Json<UploadNewRequest>,
) -> Result<Json<UploadNewResponse>, ServerError> {
    metadata.validate()?;

    if metadata.algo != ALGO {
        return Err(ServerError::Schema(format!("unsupported algo '{}'", metadata.algo)));
    }
    if !state.config.accepts_timeout(metadata.timeout_s) {
        return Err(ServerError::InvalidTimeout);
    }

    // The server owns these fields regardless of what the client sent.
    metadata.complete = false;
    metadata.timeout_ts = 0.0;

    let root_id = create_with_retry(&state.store, &metadata, RootId::generate).await?;
    Ok(Json(UploadNewResponse {
        root_id: root_id.render(),
    }))
}

/// `POST /v1/upload/push/<root_id>` — append ciphertext to a pending object.
///
/// Holds the write lock for the whole body, as the spec requires. The
/// running-total size counter is seeded from the on-disk size at the start
/// of each push rather than kept across requests — the Open Question
/// resolution in the design notes accepts this as not crash-tolerant.
pub async fn upload_push(
    State(state): State<AppState>,
    Path(root_id): Path<String>,
    body: Body,
) -> Result<Json<EmptyResponse>, ServerError> {
    let root_id = RootId::parse(&root_id)?;
    let file_id = root_id.file_id();
    let handle = state.store.open(file_id);

    let lock = handle.lock_write().await?;

    let metadata = handle.metadata().await?;
    if metadata.complete {
        return Err(ServerError::AlreadyComplete(root_id.render()));
    }

    let limit = state.config.filesize_limit;
    let mut cursize = handle.size().await;

    let mut file = handle.stream_append().await?;
    let mut stream = body.into_data_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| StoreError::Io(e.to_string()))?;
        cursize += chunk.len() as u64;
        if limit != 0 && cursize >= limit {
            drop(file);
            handle.delete().await?;
            lock.release().await?;
            return Err(ServerError::SizeLimitExceeded);
        }
        file.write_all(&chunk).await.map_err(StoreError::from)?;
    }
    file.flush().await.map_err(StoreError::from)?;
    drop(file);

    lock.release().await?;
    Ok(Json(EmptyResponse::default()))
}

/// `POST /v1/upload/finish/<root_id>` — flip to complete and start the TTL
pub async fn upload_finish(
    State(state): State<AppState>,
    Path(root_id): Path<String>,
) -> Result<Json<EmptyResponse>, ServerError> {
    let root_id = RootId::parse(&root_id)?;
    let file_id = root_id.file_id();
    let handle = state.store.open(file_id);

    let lock = handle.lock_write().await?;
    handle.set_as_complete().await?;
    lock.release().await?;

    Ok(Json(EmptyResponse::default()))
}
