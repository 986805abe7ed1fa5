use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DEFAULT_MAX_RATING: u32 = 5;
/// Upper bound for a rating scale; stored values above it are clamped.
pub const MAX_RATING_CAP: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Date,
    Email,
    Url,
    Phone,
    Tags,
    Bullets,
    Rating,
    Select,
    Number,
}

impl FieldType {
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Date,
        FieldType::Email,
        FieldType::Url,
        FieldType::Phone,
        FieldType::Tags,
        FieldType::Bullets,
        FieldType::Rating,
        FieldType::Select,
        FieldType::Number,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Phone => "phone",
            FieldType::Tags => "tags",
            FieldType::Bullets => "bullets",
            FieldType::Rating => "rating",
            FieldType::Select => "select",
            FieldType::Number => "number",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unsupported field type '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SectionLayout {
    #[default]
    SingleColumn,
    TwoColumn,
    Timeline,
    Grid,
}

impl SectionLayout {
    pub fn css_class(&self) -> &'static str {
        match self {
            SectionLayout::SingleColumn => "layout-single-column",
            SectionLayout::TwoColumn => "layout-two-column",
            SectionLayout::Timeline => "layout-timeline",
            SectionLayout::Grid => "layout-grid",
        }
    }
}

/// One typed column in a custom section's schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<u32>,
}

impl CustomField {
    pub fn max_rating(&self) -> u32 {
        self.max_rating
            .unwrap_or(DEFAULT_MAX_RATING)
            .clamp(1, MAX_RATING_CAP)
    }
}

/// A stored field value, tagged by its JSON shape. The declared field type
/// decides how it is interpreted at render time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    List(Vec<String>),
    Number(serde_json::Number),
    Flag(bool),
    /// Whatever an older schema or a hand edit left behind.
    Legacy(serde_json::Value),
}

impl RawValue {
    /// Empty, null and whitespace-only values count as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
            RawValue::Number(_) | RawValue::Flag(_) => false,
            RawValue::Legacy(v) => match v {
                serde_json::Value::Null => true,
                serde_json::Value::Array(a) => a.is_empty(),
                serde_json::Value::Object(o) => o.is_empty(),
                _ => false,
            },
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// One data row: field id to raw value. Keys without a matching field are
/// kept but never rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomSectionData {
    pub id: String,
    #[serde(default)]
    pub values: BTreeMap<String, RawValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomSection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub layout: SectionLayout,
    #[serde(default)]
    pub fields: Vec<CustomField>,
    #[serde(default)]
    pub data: Vec<CustomSectionData>,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    #[serde(default)]
    pub order: usize,
}

fn visible_by_default() -> bool {
    true
}
