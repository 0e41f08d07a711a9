//! Shared, cheaply-cloneable state handed to every handler.
//!
//! There is deliberately no in-memory registry of objects here (Design
//! Notes, §9): every invariant the handlers enforce is anchored to the
//! filesystem via [`secsend_store::ObjectStore`].

use std::sync::Arc;

use secsend_store::ObjectStore;

use crate::config::RelayConfig;

/// State shared across all axum handlers via [`axum::extract::State`]
#[derive(Clone)]
pub struct AppState {
    /// The content-addressed object store
    pub store: Arc<ObjectStore>,
    /// Static configuration loaded at startup
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Build state from a storage root and loaded config
    pub fn new(store: ObjectStore, config: RelayConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
