//! Axum router composition for the `/v1` relay API.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{config, delete, download, upload};
use crate::state::AppState;

/// Build the full router. CORS is wired in unconditionally as ambient
/// server plumbing — a browser webapp talking to this relay is out of
/// scope, but enabling cross-origin requests costs nothing here and
/// mirrors the original `cors.py`/`options.py` pair.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/upload/new", post(upload::upload_new))
        .route("/v1/upload/push/{root_id}", post(upload::upload_push))
        .route("/v1/upload/finish/{root_id}", post(upload::upload_finish))
        .route("/v1/metadata/{file_id}", get(download::metadata_handler))
        .route("/v1/download/{file_id}", get(download::download_handler))
        .route("/v1/delete/{id}", post(delete::delete_handler))
        .route("/v1/config", get(config::config_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
