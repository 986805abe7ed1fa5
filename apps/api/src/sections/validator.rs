use serde::Serialize;

use crate::models::resume::{ResumeData, ResumeSection, SectionType};

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Whether a section has enough data to be exported.
pub fn is_complete(section: &ResumeSection, data: &ResumeData) -> bool {
    // Hidden optional sections never block export.
    if !section.is_visible && !section.is_required {
        return true;
    }

    match section.section_type {
        SectionType::PersonalInfo => {
            let info = &data.personal_info;
            filled(&info.name) && filled(&info.email) && filled(&info.phone)
        }
        SectionType::Summary => filled(&data.summary),
        SectionType::Skills => {
            !data.skills.programming_languages.is_empty()
                || !data.skills.frameworks_libraries.is_empty()
        }
        SectionType::Projects => {
            !data.projects.is_empty()
                && data
                    .projects
                    .iter()
                    .all(|p| filled(&p.name) && filled(&p.tech_stack))
        }
        SectionType::Education => {
            !data.education.is_empty()
                && data
                    .education
                    .iter()
                    .all(|e| filled(&e.institution) && filled(&e.degree))
        }
        SectionType::Experience => data
            .experience
            .iter()
            .all(|e| filled(&e.position) && filled(&e.company)),
        SectionType::Certifications => data
            .certifications
            .iter()
            .all(|c| filled(&c.title) && filled(&c.organization)),
        SectionType::Achievements => data.achievements.iter().all(|a| filled(&a.description)),
        SectionType::Interests => true,
        // Row presence only; per-field `required` flags are not enforced.
        SectionType::Custom => section
            .custom_section_id
            .as_deref()
            .and_then(|id| data.custom_section(id))
            .is_some_and(|custom| !custom.data.is_empty()),
        // Fail open: an unrecognised section must not block the whole export.
        SectionType::Unknown => true,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCompleteness {
    pub section_id: String,
    pub name: String,
    pub is_visible: bool,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    pub sections: Vec<SectionCompleteness>,
    /// Visible or required sections still missing data, in display order.
    pub incomplete: Vec<String>,
    pub ready_for_export: bool,
}

pub fn completeness_report(data: &ResumeData) -> CompletenessReport {
    let mut ordered: Vec<&ResumeSection> = data.sections.iter().collect();
    ordered.sort_by_key(|s| s.order);

    let sections: Vec<SectionCompleteness> = ordered
        .into_iter()
        .map(|s| SectionCompleteness {
            section_id: s.id.clone(),
            name: s.name.clone(),
            is_visible: s.is_visible,
            is_complete: is_complete(s, data),
        })
        .collect();

    let incomplete: Vec<String> = sections
        .iter()
        .filter(|s| !s.is_complete)
        .map(|s| s.section_id.clone())
        .collect();

    CompletenessReport {
        ready_for_export: incomplete.is_empty(),
        sections,
        incomplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::custom::{CustomSection, CustomSectionData, SectionLayout};
    use crate::models::resume::{
        Achievement, Certification, Education, Experience, Project,
    };

    fn section(data: &ResumeData, section_type: SectionType) -> ResumeSection {
        data.sections
            .iter()
            .find(|s| s.section_type == section_type)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_personal_info_needs_name_email_phone() {
        let mut data = ResumeData::default();
        data.personal_info.name = String::new();
        data.personal_info.email = "x@y.com".into();
        data.personal_info.phone = "555".into();
        let s = section(&data, SectionType::PersonalInfo);
        assert!(!is_complete(&s, &data));

        data.personal_info.name = "Jane".into();
        assert!(is_complete(&s, &data));
    }

    #[test]
    fn test_summary_trimmed() {
        let mut data = ResumeData::default();
        data.summary = "   \n".into();
        let s = section(&data, SectionType::Summary);
        assert!(!is_complete(&s, &data));
        data.summary = "Backend engineer".into();
        assert!(is_complete(&s, &data));
    }

    #[test]
    fn test_hidden_optional_always_complete() {
        let data = ResumeData::default();
        let mut s = section(&data, SectionType::Summary);
        s.is_visible = false;
        assert!(is_complete(&s, &data));
    }

    #[test]
    fn test_hidden_required_still_checked() {
        let data = ResumeData::default();
        let mut s = section(&data, SectionType::PersonalInfo);
        s.is_visible = false;
        assert!(!is_complete(&s, &data));
    }

    #[test]
    fn test_skills_either_category() {
        let mut data = ResumeData::default();
        let s = section(&data, SectionType::Skills);
        data.skills.databases = vec!["PostgreSQL".into()];
        assert!(!is_complete(&s, &data));
        data.skills.frameworks_libraries = vec!["Axum".into()];
        assert!(is_complete(&s, &data));
    }

    #[test]
    fn test_projects_require_entries_with_name_and_stack() {
        let mut data = ResumeData::default();
        let s = section(&data, SectionType::Projects);
        assert!(!is_complete(&s, &data));
        data.projects.push(Project {
            name: "Crawler".into(),
            ..Default::default()
        });
        assert!(!is_complete(&s, &data));
        data.projects[0].tech_stack = "Rust, Tokio".into();
        assert!(is_complete(&s, &data));
    }

    #[test]
    fn test_education_requires_institution_and_degree() {
        let mut data = ResumeData::default();
        let s = section(&data, SectionType::Education);
        assert!(!is_complete(&s, &data));
        data.education.push(Education {
            institution: "MIT".into(),
            degree: "BSc".into(),
            ..Default::default()
        });
        assert!(is_complete(&s, &data));
    }

    #[test]
    fn test_optional_lists_empty_ok_but_entries_checked() {
        let mut data = ResumeData::default();
        let exp = section(&data, SectionType::Experience);
        let cert = section(&data, SectionType::Certifications);
        let ach = section(&data, SectionType::Achievements);
        assert!(is_complete(&exp, &data));
        assert!(is_complete(&cert, &data));
        assert!(is_complete(&ach, &data));

        data.experience.push(Experience {
            company: "Acme".into(),
            ..Default::default()
        });
        data.certifications.push(Certification {
            title: "CKA".into(),
            ..Default::default()
        });
        data.achievements.push(Achievement {
            description: "  ".into(),
            ..Default::default()
        });
        assert!(!is_complete(&exp, &data));
        assert!(!is_complete(&cert, &data));
        assert!(!is_complete(&ach, &data));
    }

    #[test]
    fn test_interests_always_complete() {
        let data = ResumeData::default();
        assert!(is_complete(&section(&data, SectionType::Interests), &data));
    }

    #[test]
    fn test_unknown_type_fails_open() {
        let data = ResumeData::default();
        let bogus = ResumeSection {
            id: "bogus".into(),
            section_type: SectionType::Unknown,
            name: "Bogus".into(),
            is_visible: true,
            is_required: true,
            order: 0,
            custom_section_id: None,
        };
        assert!(is_complete(&bogus, &data));
    }

    #[test]
    fn test_custom_needs_one_row_even_if_empty() {
        let mut data = ResumeData::default();
        let custom = CustomSection {
            id: "c1".into(),
            name: "Talks".into(),
            layout: SectionLayout::Grid,
            fields: vec![],
            data: vec![],
            is_visible: true,
            order: 0,
        };
        let s = ResumeSection::custom(&custom, 9);
        data.custom_sections.push(custom);
        assert!(!is_complete(&s, &data));

        data.custom_sections[0].data.push(CustomSectionData::default());
        assert!(is_complete(&s, &data));
    }

    #[test]
    fn test_custom_missing_target_incomplete() {
        let data = ResumeData::default();
        let mut s = section(&data, SectionType::Summary);
        s.section_type = SectionType::Custom;
        s.custom_section_id = Some("gone".into());
        assert!(!is_complete(&s, &data));
    }

    #[test]
    fn test_report_lists_incomplete_in_order() {
        let mut data = ResumeData::default();
        data.personal_info.name = "Jane".into();
        data.personal_info.email = "jane@example.com".into();
        data.personal_info.phone = "555".into();
        let report = completeness_report(&data);
        assert!(!report.ready_for_export);
        assert_eq!(report.sections.len(), data.sections.len());
        assert_eq!(
            report.incomplete,
            vec!["summary", "skills", "projects", "education"]
        );
    }
}
