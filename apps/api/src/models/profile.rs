use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::new_id;
use crate::models::resume::ResumeData;

/// A named, independently stored snapshot of one user's resume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub data: ResumeData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(name: impl Into<String>, data: ResumeData) -> Self {
        let now = Utc::now();
        Profile {
            id: new_id(),
            name: name.into(),
            data,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing entry without the resume payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
