use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::custom::CustomSection;

pub const DATA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    PersonalInfo,
    Summary,
    Skills,
    Experience,
    Projects,
    Education,
    Certifications,
    Achievements,
    Interests,
    Custom,
    /// Any type string this build does not recognise. Kept so a stale or
    /// hand-edited profile still loads.
    #[serde(other)]
    Unknown,
}

impl SectionType {
    /// Built-in section types in their default order, with display name and
    /// whether the section is required.
    pub const BUILT_IN: [(SectionType, &'static str, bool); 9] = [
        (SectionType::PersonalInfo, "Personal Information", true),
        (SectionType::Summary, "Professional Summary", false),
        (SectionType::Skills, "Technical Skills", true),
        (SectionType::Experience, "Work Experience", false),
        (SectionType::Projects, "Projects", false),
        (SectionType::Education, "Education", true),
        (SectionType::Certifications, "Certifications", false),
        (SectionType::Achievements, "Achievements", false),
        (SectionType::Interests, "Interests", false),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::PersonalInfo => "personalInfo",
            SectionType::Summary => "summary",
            SectionType::Skills => "skills",
            SectionType::Experience => "experience",
            SectionType::Projects => "projects",
            SectionType::Education => "education",
            SectionType::Certifications => "certifications",
            SectionType::Achievements => "achievements",
            SectionType::Interests => "interests",
            SectionType::Custom => "custom",
            SectionType::Unknown => "unknown",
        }
    }
}

/// One block of the output document, built-in or custom.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSection {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub name: String,
    pub is_visible: bool,
    pub is_required: bool,
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_section_id: Option<String>,
}

impl ResumeSection {
    pub fn custom(custom: &CustomSection, order: usize) -> Self {
        ResumeSection {
            id: format!("custom-{}", custom.id),
            section_type: SectionType::Custom,
            name: custom.name.clone(),
            is_visible: custom.is_visible,
            is_required: false,
            order,
            custom_section_id: Some(custom.id.clone()),
        }
    }
}

/// The built-in section list a new profile starts with.
pub fn default_sections() -> Vec<ResumeSection> {
    SectionType::BUILT_IN
        .iter()
        .enumerate()
        .map(|(order, (section_type, name, required))| ResumeSection {
            id: section_type.as_str().to_string(),
            section_type: *section_type,
            name: name.to_string(),
            is_visible: true,
            is_required: *required,
            order,
            custom_section_id: None,
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Skills {
    pub programming_languages: Vec<String>,
    pub frameworks_libraries: Vec<String>,
    pub databases: Vec<String>,
    pub tools: Vec<String>,
    pub other: Vec<String>,
}

impl Skills {
    /// Non-empty categories with their print label.
    pub fn labelled(&self) -> Vec<(&'static str, &[String])> {
        [
            ("Languages", self.programming_languages.as_slice()),
            ("Frameworks & Libraries", self.frameworks_libraries.as_slice()),
            ("Databases", self.databases.as_slice()),
            ("Tools", self.tools.as_slice()),
            ("Other", self.other.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub position: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub tech_stack: String,
    pub description: String,
    pub link: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub date: String,
    pub credential_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub id: String,
    pub description: String,
    pub date: String,
}

/// Font and spacing applied to the print document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub font_family: String,
    /// Base font size in points.
    pub font_size: f32,
    /// Page margin in inches, applied on all sides.
    pub margin: f32,
    pub line_height: f32,
}

impl Default for Customization {
    fn default() -> Self {
        Customization {
            font_family: "Inter".to_string(),
            font_size: 11.0,
            margin: 0.75,
            line_height: 1.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    pub last_modified: DateTime<Utc>,
    pub version: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            last_modified: Utc::now(),
            version: DATA_VERSION.to_string(),
        }
    }
}

/// The complete document owned by one profile. Missing keys take their
/// defaults so partial payloads from older clients still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub skills: Skills,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub achievements: Vec<Achievement>,
    pub interests: String,
    pub customization: Customization,
    pub sections: Vec<ResumeSection>,
    pub custom_sections: Vec<CustomSection>,
    pub metadata: Metadata,
}

impl Default for ResumeData {
    fn default() -> Self {
        ResumeData {
            personal_info: PersonalInfo::default(),
            summary: String::new(),
            skills: Skills::default(),
            experience: Vec::new(),
            projects: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
            achievements: Vec::new(),
            interests: String::new(),
            customization: Customization::default(),
            sections: default_sections(),
            custom_sections: Vec::new(),
            metadata: Metadata::default(),
        }
    }
}

impl ResumeData {
    pub fn custom_section(&self, id: &str) -> Option<&CustomSection> {
        self.custom_sections.iter().find(|c| c.id == id)
    }

    pub fn custom_section_mut(&mut self, id: &str) -> Option<&mut CustomSection> {
        self.custom_sections.iter_mut().find(|c| c.id == id)
    }

    pub fn touch(&mut self) {
        self.metadata.last_modified = Utc::now();
    }
}
