use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::export::ExportOutcome;
use crate::state::AppState;

/// POST /api/v1/export
///
/// Exports the current profile. The store lock is released before printing,
/// since the print targets may take a while.
pub async fn handle_export(State(state): State<AppState>) -> Result<Json<ExportOutcome>, AppError> {
    let data = state.store.lock().await.current()?.data.clone();
    let outcome = state.exporter.export(&data).await?;
    Ok(Json(outcome))
}
