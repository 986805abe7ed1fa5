//! Axum route handlers for profile management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::profile::{Profile, ProfileSummary};
use crate::models::resume::ResumeData;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileNameRequest {
    pub name: String,
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(State(state): State<AppState>) -> Json<Vec<ProfileSummary>> {
    Json(state.store.lock().await.list())
}

/// POST /api/v1/profiles
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileNameRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = state.store.lock().await.create(&req.name).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/profiles/current
pub async fn handle_current_profile(
    State(state): State<AppState>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.store.lock().await.current()?.clone()))
}

/// PUT /api/v1/profiles/current/data
///
/// Replaces the whole resume payload, as the form autosave does.
pub async fn handle_save_current_data(
    State(state): State<AppState>,
    Json(data): Json<ResumeData>,
) -> Result<Json<Profile>, AppError> {
    let mut store = state.store.lock().await;
    Ok(Json(store.update_current(data).await?.clone()))
}

/// PATCH /api/v1/profiles/:id
pub async fn handle_rename_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProfileNameRequest>,
) -> Result<Json<Profile>, AppError> {
    let profile = state.store.lock().await.rename(&id, &req.name).await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/profiles/:id
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.lock().await.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profiles/:id/activate
pub async fn handle_activate_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let mut store = state.store.lock().await;
    Ok(Json(store.switch(&id).await?.clone()))
}

/// POST /api/v1/profiles/:id/duplicate
pub async fn handle_duplicate_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = state.store.lock().await.duplicate(&id).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/profiles/:id/export
pub async fn handle_export_profile_json(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<([(axum::http::HeaderName, &'static str); 1], String), AppError> {
    let json = state.store.lock().await.export_json(&id)?;
    Ok(([(axum::http::header::CONTENT_TYPE, "application/json")], json))
}

/// POST /api/v1/profiles/import
pub async fn handle_import_profile(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = state.store.lock().await.import_json(&body).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}
