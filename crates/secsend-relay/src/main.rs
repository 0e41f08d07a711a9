//! secsend relay server: serves the `/v1` zero-knowledge file-transfer API.
//! Never reads names, MIME types, or content — only opaque ciphertext.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use secsend_store::ObjectStore;

use secsend_relay::config::RelayConfig;
use secsend_relay::state::AppState;
use secsend_relay::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = RelayConfig::from_env().context("loading relay configuration")?;

    if let Some(html_root) = &config.html_root {
        tracing::warn!(
            html_root = %html_root,
            "SECSEND_HTML_ROOT set but static webapp serving is out of scope for this relay"
        );
    }

    let bind_addr = config.bind_addr.clone();
    let store = ObjectStore::new(config.backend_files_root.clone());
    let state = AppState::new(store, config);
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;

    tracing::info!(addr = %bind_addr, "secsend relay listening");
    axum::serve(listener, app).await.context("serving relay HTTP API")?;

    Ok(())
}
