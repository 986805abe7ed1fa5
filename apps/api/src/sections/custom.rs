//! Schema and row operations for user-authored sections.
//!
//! Rows are written without checking them against the field schema; missing
//! or mistyped values are handled when the row is rendered.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::custom::{
    CustomField, CustomSection, CustomSectionData, FieldType, RawValue, SectionLayout,
    MAX_RATING_CAP,
};
use crate::models::new_id;

/// Optional settings for a new field, as sent by the section wizard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldOptions {
    pub required: bool,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
    pub max_rating: Option<u32>,
}

/// Field definition as submitted by a client, before an id is assigned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(flatten)]
    pub options: FieldOptions,
}

/// Builds a field with a fresh id. `field_type` is the wire name, e.g. `"rating"`.
pub fn create_field(
    label: &str,
    field_type: &str,
    options: FieldOptions,
) -> Result<CustomField, AppError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(AppError::Validation("Field label cannot be empty".to_string()));
    }
    let field_type: FieldType = field_type.trim().parse()?;

    let select_options = match field_type {
        FieldType::Select => {
            let opts: Vec<String> = options
                .options
                .unwrap_or_default()
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if opts.is_empty() {
                return Err(AppError::Validation(format!(
                    "Select field '{label}' needs at least one option"
                )));
            }
            Some(opts)
        }
        _ => None,
    };

    let max_rating = match field_type {
        FieldType::Rating => match options.max_rating {
            Some(0) => {
                return Err(AppError::Validation(format!(
                    "Rating field '{label}' needs a maximum of at least 1"
                )))
            }
            Some(max) if max > MAX_RATING_CAP => {
                return Err(AppError::Validation(format!(
                    "Rating field '{label}' can have a maximum of at most {MAX_RATING_CAP}"
                )))
            }
            other => other,
        },
        _ => None,
    };

    Ok(CustomField {
        id: new_id(),
        label: label.to_string(),
        field_type,
        required: options.required,
        placeholder: options.placeholder.filter(|p| !p.trim().is_empty()),
        options: select_options,
        max_rating,
    })
}

/// Final wizard step: a named section with at least one field and no rows.
pub fn create_custom_section(
    name: &str,
    layout: SectionLayout,
    fields: Vec<FieldSpec>,
) -> Result<CustomSection, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Section name cannot be empty".to_string()));
    }
    if fields.is_empty() {
        return Err(AppError::Validation(format!(
            "Section '{name}' needs at least one field"
        )));
    }

    let fields = fields
        .into_iter()
        .map(|spec| create_field(&spec.label, &spec.field_type, spec.options))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CustomSection {
        id: new_id(),
        name: name.to_string(),
        layout,
        fields,
        data: Vec::new(),
        is_visible: true,
        order: 0,
    })
}

/// Appends a row as given. Returns the new row id.
pub fn add_data_row(section: &mut CustomSection, values: BTreeMap<String, RawValue>) -> String {
    let id = new_id();
    section.data.push(CustomSectionData {
        id: id.clone(),
        values,
    });
    id
}

pub fn update_data_row(
    section: &mut CustomSection,
    row_id: &str,
    values: BTreeMap<String, RawValue>,
) -> Result<(), AppError> {
    let row = section
        .data
        .iter_mut()
        .find(|r| r.id == row_id)
        .ok_or_else(|| AppError::NotFound(format!("Row {row_id} not found")))?;
    row.values = values;
    Ok(())
}

pub fn remove_data_row(section: &mut CustomSection, row_id: &str) -> Result<(), AppError> {
    let before = section.data.len();
    section.data.retain(|r| r.id != row_id);
    if section.data.len() == before {
        return Err(AppError::NotFound(format!("Row {row_id} not found")));
    }
    Ok(())
}

/// Explicit user reorder of rows. Out-of-range indices are a no-op.
pub fn move_data_row(section: &mut CustomSection, from: usize, to: usize) -> bool {
    move_item(&mut section.data, from, to)
}

/// Moves one field definition. Row values stay keyed by field id, so rows
/// are untouched. Out-of-range indices are a no-op.
pub fn reorder_fields(section: &mut CustomSection, from: usize, to: usize) -> bool {
    move_item(&mut section.fields, from, to)
}

pub fn add_field(section: &mut CustomSection, field: CustomField) {
    section.fields.push(field);
}

/// Drops the field definition. Existing rows keep their value under the
/// stale key; it is simply no longer rendered.
pub fn remove_field(section: &mut CustomSection, field_id: &str) -> Result<CustomField, AppError> {
    let index = section
        .fields
        .iter()
        .position(|f| f.id == field_id)
        .ok_or_else(|| AppError::NotFound(format!("Field {field_id} not found")))?;
    Ok(section.fields.remove(index))
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}
