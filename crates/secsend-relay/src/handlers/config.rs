//! `GET /v1/config`

use axum::extract::State;
use axum::Json;

use secsend_protocol::wire::ConfigResponse;

use crate::state::AppState;

/// `GET /v1/config` — advertise the accepted `timeout_s` values and the
/// upload size limit so clients can validate before they start uploading
pub async fn config_handler(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        timeout_s_valid: state.config.timeout_s_valid.clone(),
        filesize_limit: state.config.filesize_limit,
    })
}
