use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service version plus which storage backend the profiles live in.
/// `loadError` is set when the stored profiles could not be read at startup.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.lock().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "storage": store.backend_name(),
        "profiles": store.profile_count(),
        "loadError": store.load_error(),
    }))
}
