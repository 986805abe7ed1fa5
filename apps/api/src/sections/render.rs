//! Field Value Renderer: turns a stored raw value into a normalized display
//! value according to the field's declared type.
//!
//! A blank or absent value renders nothing at all. Callers drop the whole
//! field, label included, so half-filled rows never print labelled blanks.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::custom::{CustomField, CustomSection, CustomSectionData, FieldType, RawValue};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayValue {
    Text { text: String },
    Paragraphs { lines: Vec<String> },
    Date { text: String },
    Link { href: String, text: String },
    Rating { value: u32, max: u32 },
    Tags { items: Vec<String> },
    Bullets { items: Vec<String> },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub field_id: String,
    pub label: String,
    pub field_type: FieldType,
    pub value: DisplayValue,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    pub row_id: String,
    pub fields: Vec<RenderedField>,
}

/// Normalizes one value. `None` means "render nothing".
pub fn render_value(field: &CustomField, raw: Option<&RawValue>) -> Option<DisplayValue> {
    let raw = raw.filter(|r| !r.is_blank())?;

    let value = match field.field_type {
        FieldType::Url => {
            let text = as_text(raw)?;
            DisplayValue::Link {
                href: absolute_url(&text),
                text,
            }
        }
        FieldType::Email => {
            let text = as_text(raw)?;
            DisplayValue::Link {
                href: format!("mailto:{text}"),
                text,
            }
        }
        FieldType::Phone => {
            let text = as_text(raw)?;
            DisplayValue::Link {
                href: format!("tel:{text}"),
                text,
            }
        }
        FieldType::Rating => {
            let max = field.max_rating();
            DisplayValue::Rating {
                value: parse_rating(raw).clamp(0, i64::from(max)) as u32,
                max,
            }
        }
        FieldType::Tags => DisplayValue::Tags {
            items: non_empty(split_list(raw, ','))?,
        },
        FieldType::Bullets => DisplayValue::Bullets {
            items: non_empty(split_list(raw, '\n'))?,
        },
        FieldType::Textarea => DisplayValue::Paragraphs {
            lines: non_empty(split_list(raw, '\n'))?,
        },
        FieldType::Date => {
            let text = as_text(raw)?;
            DisplayValue::Date {
                text: format_date(&text).unwrap_or(text),
            }
        }
        FieldType::Text | FieldType::Number | FieldType::Select => DisplayValue::Text {
            text: as_text(raw)?,
        },
    };

    Some(value)
}

pub fn render_field(field: &CustomField, raw: Option<&RawValue>) -> Option<RenderedField> {
    render_value(field, raw).map(|value| RenderedField {
        field_id: field.id.clone(),
        label: field.label.clone(),
        field_type: field.field_type,
        value,
    })
}

/// Renders a row's non-empty fields in schema order. Stale keys are skipped.
pub fn render_row(section: &CustomSection, row: &CustomSectionData) -> RenderedRow {
    RenderedRow {
        row_id: row.id.clone(),
        fields: section
            .fields
            .iter()
            .filter_map(|field| render_field(field, row.values.get(&field.id)))
            .collect(),
    }
}

pub fn render_rows(section: &CustomSection) -> Vec<RenderedRow> {
    section.data.iter().map(|row| render_row(section, row)).collect()
}

/// Anything not starting with `http` gets an `https://` prefix.
pub fn absolute_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn as_text(raw: &RawValue) -> Option<String> {
    let text = match raw {
        RawValue::Text(s) => s.trim().to_string(),
        RawValue::Number(n) => n.to_string(),
        RawValue::Flag(b) => b.to_string(),
        RawValue::List(items) => items
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        RawValue::Legacy(serde_json::Value::String(s)) => s.trim().to_string(),
        RawValue::Legacy(v) => v.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Accepts either a list or a single delimited string.
fn split_list(raw: &RawValue, delimiter: char) -> Vec<String> {
    let items: Vec<String> = match raw {
        RawValue::List(items) => items.clone(),
        other => match as_text(other) {
            Some(text) => text.split(delimiter).map(str::to_string).collect(),
            None => Vec::new(),
        },
    };
    items
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    (!items.is_empty()).then_some(items)
}

/// Lenient integer parse: leading sign and digits, anything else is 0.
fn parse_rating(raw: &RawValue) -> i64 {
    match raw {
        RawValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        other => as_text(other).map(|t| parse_leading_int(&t)).unwrap_or(0),
    }
}

fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

/// `2023-04-15` → `Apr 15, 2023`, `2023-04` → `Apr 2023`.
pub fn format_date(text: &str) -> Option<String> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.format("%b %-d, %Y").to_string());
    }
    NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%b %Y").to_string())
}
