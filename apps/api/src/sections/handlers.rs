//! Axum route handlers for section ordering, visibility and custom sections.
//! All of them act on the current profile.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::custom::{CustomField, CustomSection, RawValue, SectionLayout};
use crate::models::resume::{ResumeData, ResumeSection};
use crate::sections::custom::{self, FieldSpec};
use crate::sections::render::{render_rows, RenderedRow};
use crate::sections::validator::{completeness_report, CompletenessReport};
use crate::sections::SectionManager;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub sections: Vec<ResumeSection>,
    pub completeness: CompletenessReport,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub section_id: String,
    pub new_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomSectionRequest {
    pub name: String,
    #[serde(default)]
    pub layout: SectionLayout,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomSectionResponse {
    pub section_id: String,
    pub custom_section: CustomSection,
}

#[derive(Debug, Deserialize)]
pub struct RowRequest {
    #[serde(default)]
    pub values: BTreeMap<String, RawValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowCreated {
    pub row_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Serialize)]
pub struct CustomPreview {
    pub name: String,
    pub layout: SectionLayout,
    pub rows: Vec<RenderedRow>,
}

fn sections_response(data: &ResumeData) -> SectionsResponse {
    SectionsResponse {
        sections: data.sections.clone(),
        completeness: completeness_report(data),
    }
}

fn custom_mut<'a>(data: &'a mut ResumeData, id: &str) -> Result<&'a mut CustomSection, AppError> {
    data.custom_section_mut(id)
        .ok_or_else(|| AppError::NotFound(format!("Custom section {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Section list
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sections
pub async fn handle_list_sections(
    State(state): State<AppState>,
) -> Result<Json<SectionsResponse>, AppError> {
    let store = state.store.lock().await;
    let mut data = store.current()?.data.clone();
    let sections = SectionManager::new(&mut data).sections().to_vec();
    Ok(Json(SectionsResponse {
        sections,
        completeness: completeness_report(&data),
    }))
}

/// POST /api/v1/sections/reorder
///
/// Invalid ids or indices are ignored and the unchanged list is returned.
pub async fn handle_reorder(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<SectionsResponse>, AppError> {
    let mut store = state.store.lock().await;
    let data = store
        .update_current_with(|data| {
            SectionManager::new(data).reorder(&req.section_id, req.new_index);
            Ok(data.clone())
        })
        .await?;
    Ok(Json(sections_response(&data)))
}

/// PATCH /api/v1/sections/:id/visibility
pub async fn handle_set_visibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<VisibilityRequest>,
) -> Result<Json<SectionsResponse>, AppError> {
    let mut store = state.store.lock().await;
    let data = store
        .update_current_with(|data| {
            SectionManager::new(data).set_visibility(&id, req.visible)?;
            Ok(data.clone())
        })
        .await?;
    Ok(Json(sections_response(&data)))
}

/// PATCH /api/v1/sections/:id/name
pub async fn handle_rename_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<SectionsResponse>, AppError> {
    let mut store = state.store.lock().await;
    let data = store
        .update_current_with(|data| {
            SectionManager::new(data).rename_section(&id, &req.name)?;
            Ok(data.clone())
        })
        .await?;
    Ok(Json(sections_response(&data)))
}

/// DELETE /api/v1/sections/:id
///
/// Only custom sections can be removed; their rows go with them.
pub async fn handle_remove_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store
        .update_current_with(|data| SectionManager::new(data).remove_custom_section(&id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Custom sections
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/custom-sections
pub async fn handle_create_custom_section(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomSectionRequest>,
) -> Result<(StatusCode, Json<CreateCustomSectionResponse>), AppError> {
    let custom = custom::create_custom_section(&req.name, req.layout, req.fields)?;
    let mut store = state.store.lock().await;
    let response = store
        .update_current_with(|data| {
            let section_id = SectionManager::new(data).add_custom_section(custom);
            let custom_section = data
                .sections
                .iter()
                .find(|s| s.id == section_id)
                .and_then(|s| s.custom_section_id.as_deref())
                .and_then(|cid| data.custom_section(cid))
                .cloned()
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Custom section vanished after insert")))?;
            Ok(CreateCustomSectionResponse {
                section_id,
                custom_section,
            })
        })
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/custom-sections/:id/rows
pub async fn handle_add_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RowRequest>,
) -> Result<(StatusCode, Json<RowCreated>), AppError> {
    let mut store = state.store.lock().await;
    let row_id = store
        .update_current_with(|data| Ok(custom::add_data_row(custom_mut(data, &id)?, req.values)))
        .await?;
    Ok((StatusCode::CREATED, Json(RowCreated { row_id })))
}

/// PUT /api/v1/custom-sections/:id/rows/:row_id
pub async fn handle_update_row(
    State(state): State<AppState>,
    Path((id, row_id)): Path<(String, String)>,
    Json(req): Json<RowRequest>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store
        .update_current_with(|data| custom::update_data_row(custom_mut(data, &id)?, &row_id, req.values))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/custom-sections/:id/rows/:row_id
pub async fn handle_remove_row(
    State(state): State<AppState>,
    Path((id, row_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store
        .update_current_with(|data| custom::remove_data_row(custom_mut(data, &id)?, &row_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/custom-sections/:id/row-order
pub async fn handle_move_row(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store
        .update_current_with(|data| {
            custom::move_data_row(custom_mut(data, &id)?, req.from, req.to);
            Ok(())
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/custom-sections/:id/fields
pub async fn handle_add_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(spec): Json<FieldSpec>,
) -> Result<(StatusCode, Json<CustomField>), AppError> {
    let field = custom::create_field(&spec.label, &spec.field_type, spec.options)?;
    let mut store = state.store.lock().await;
    let created = field.clone();
    store
        .update_current_with(|data| {
            custom::add_field(custom_mut(data, &id)?, field);
            Ok(())
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/v1/custom-sections/:id/fields/:field_id
pub async fn handle_remove_field(
    State(state): State<AppState>,
    Path((id, field_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store
        .update_current_with(|data| custom::remove_field(custom_mut(data, &id)?, &field_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/custom-sections/:id/field-order
pub async fn handle_reorder_fields(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Vec<CustomField>>, AppError> {
    let mut store = state.store.lock().await;
    let fields = store
        .update_current_with(|data| {
            let section = custom_mut(data, &id)?;
            custom::reorder_fields(section, req.from, req.to);
            Ok(section.fields.clone())
        })
        .await?;
    Ok(Json(fields))
}

/// GET /api/v1/custom-sections/:id/preview
pub async fn handle_preview_custom_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomPreview>, AppError> {
    let store = state.store.lock().await;
    let section = store
        .current()?
        .data
        .custom_section(&id)
        .ok_or_else(|| AppError::NotFound(format!("Custom section {id} not found")))?;
    Ok(Json(CustomPreview {
        name: section.name.clone(),
        layout: section.layout,
        rows: render_rows(section),
    }))
}
