//! `POST /v1/delete/<root_id>`
//!
//! Possession of the root-id is the only authentication this relay has: a
//! file-id is rejected outright rather than silently accepted (§4.6, §9).

use axum::extract::{Path, State};
use axum::Json;

use secsend_crypto::AnyId;
use secsend_protocol::wire::EmptyResponse;

use crate::error::ServerError;
use crate::state::AppState;

/// `POST /v1/delete/<root_id>` — unlink an object
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EmptyResponse>, ServerError> {
    let root_id = match AnyId::parse(&id)? {
        AnyId::Root(root_id) => root_id,
        AnyId::File(_) => return Err(ServerError::WrongIdKind),
    };

    let file_id = root_id.file_id();
    let handle = state.store.open(file_id);
    handle.check_validity().await?;
    handle.delete().await?;

    Ok(Json(EmptyResponse::default()))
}
