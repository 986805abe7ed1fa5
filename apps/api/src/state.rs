use std::sync::Arc;

use tokio::sync::Mutex;

use crate::export::Exporter;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single mutator: every handler takes the lock for the whole read-modify-write.
    pub store: Arc<Mutex<ProfileStore>>,
    pub exporter: Arc<Exporter>,
}

impl AppState {
    pub fn new(store: ProfileStore, exporter: Exporter) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
            exporter: Arc::new(exporter),
        }
    }
}
