use std::sync::Arc;

use crate::matching::skill_gap::ResourceCatalog;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres or in-memory, picked at startup from config.
    pub store: Arc<dyn RecordStore>,
    /// Read-only for the life of the process.
    pub resources: Arc<ResourceCatalog>,
}
