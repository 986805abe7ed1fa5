//! Section Reordering & Visibility Manager.
//!
//! # Ordering invariant
//! `data.sections` is kept sorted by `order`, and the `order` values are
//! exactly `0..n`. Every mutating method renumbers before returning, and
//! `SectionManager::new` normalizes whatever was loaded from storage.
//! Custom sections mirror the `order`/`is_visible` of the `ResumeSection`
//! that references them.

use tracing::debug;

use crate::errors::AppError;
use crate::models::custom::CustomSection;
use crate::models::resume::{ResumeData, ResumeSection, SectionType};

pub struct SectionManager<'a> {
    data: &'a mut ResumeData,
}

impl<'a> SectionManager<'a> {
    pub fn new(data: &'a mut ResumeData) -> Self {
        let mut manager = SectionManager { data };
        manager.data.sections.sort_by_key(|s| s.order);
        manager.renumber();
        manager
    }

    pub fn sections(&self) -> &[ResumeSection] {
        &self.data.sections
    }

    /// Visible sections in display order: the input to export.
    pub fn ordered_visible(&self) -> Vec<&ResumeSection> {
        self.data.sections.iter().filter(|s| s.is_visible).collect()
    }

    /// Moves a section to `new_index` and renumbers. Unknown ids and
    /// out-of-range indices are ignored; returns whether anything moved.
    pub fn reorder(&mut self, section_id: &str, new_index: usize) -> bool {
        let Some(from) = self.position(section_id) else {
            debug!("reorder ignored: unknown section {section_id}");
            return false;
        };
        if new_index >= self.data.sections.len() {
            debug!("reorder ignored: index {new_index} out of bounds");
            return false;
        }
        let section = self.data.sections.remove(from);
        self.data.sections.insert(new_index, section);
        self.renumber();
        from != new_index
    }

    pub fn set_visibility(&mut self, section_id: &str, visible: bool) -> Result<(), AppError> {
        let index = self
            .position(section_id)
            .ok_or_else(|| AppError::NotFound(format!("Section {section_id} not found")))?;
        let section = &mut self.data.sections[index];
        if !visible && section.is_required {
            return Err(AppError::Constraint(format!(
                "{} is required and cannot be hidden",
                section.name
            )));
        }
        section.is_visible = visible;
        let custom_id = section.custom_section_id.clone();
        if let Some(custom) = custom_id.and_then(|id| self.data.custom_section_mut(&id)) {
            custom.is_visible = visible;
        }
        Ok(())
    }

    /// Renames a custom section. Built-in labels are fixed.
    pub fn rename_section(&mut self, section_id: &str, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Section name cannot be empty".to_string()));
        }
        let index = self
            .position(section_id)
            .ok_or_else(|| AppError::NotFound(format!("Section {section_id} not found")))?;
        let section = &mut self.data.sections[index];
        if section.section_type != SectionType::Custom {
            return Err(AppError::Constraint(format!(
                "{} is a built-in section and cannot be renamed",
                section.name
            )));
        }
        section.name = name.to_string();
        let custom_id = section.custom_section_id.clone();
        if let Some(custom) = custom_id.and_then(|id| self.data.custom_section_mut(&id)) {
            custom.name = name.to_string();
        }
        Ok(())
    }

    /// Stores the custom section and appends a section referencing it.
    /// Returns the new `ResumeSection` id.
    pub fn add_custom_section(&mut self, mut custom: CustomSection) -> String {
        let order = self
            .data
            .sections
            .iter()
            .map(|s| s.order + 1)
            .max()
            .unwrap_or(0);
        custom.order = order;
        let section = ResumeSection::custom(&custom, order);
        let id = section.id.clone();
        self.data.sections.push(section);
        self.data.custom_sections.push(custom);
        self.renumber();
        id
    }

    /// Removes a custom section and the data it owns, then compacts orders.
    /// Removes a custom section. A `ResumeSection` whose custom payload is
    /// already gone is still removed; the payload is returned when present.
    pub fn remove_custom_section(&mut self, section_id: &str) -> Result<Option<CustomSection>, AppError> {
        let index = self
            .position(section_id)
            .ok_or_else(|| AppError::NotFound(format!("Section {section_id} not found")))?;
        if self.data.sections[index].section_type != SectionType::Custom {
            return Err(AppError::Constraint(format!(
                "{} is a built-in section and cannot be removed",
                self.data.sections[index].name
            )));
        }
        let section = self.data.sections.remove(index);
        let custom = section.custom_section_id.as_deref().and_then(|custom_id| {
            let custom_index = self.data.custom_sections.iter().position(|c| c.id == custom_id)?;
            Some(self.data.custom_sections.remove(custom_index))
        });
        if custom.is_none() {
            debug!(section_id, "removed custom section with no payload");
        }
        self.renumber();
        Ok(custom)
    }

    fn position(&self, section_id: &str) -> Option<usize> {
        self.data.sections.iter().position(|s| s.id == section_id)
    }

    fn renumber(&mut self) {
        for (order, section) in self.data.sections.iter_mut().enumerate() {
            section.order = order;
        }
        let ResumeData {
            sections,
            custom_sections,
            ..
        } = &mut *self.data;
        for custom in custom_sections.iter_mut() {
            if let Some(section) = sections
                .iter()
                .find(|s| s.custom_section_id.as_deref() == Some(custom.id.as_str()))
            {
                custom.order = section.order;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn orders(data: &ResumeData) -> Vec<usize> {
        data.sections.iter().map(|s| s.order).collect()
    }

    fn ids(data: &ResumeData) -> Vec<String> {
        data.sections.iter().map(|s| s.id.clone()).collect()
    }

    fn talks() -> CustomSection {
        CustomSection {
            id: "talks".into(),
            name: "Talks".into(),
            layout: Default::default(),
            fields: vec![],
            data: vec![],
            is_visible: true,
            order: 0,
        }
    }

    #[test]
    fn test_reorder_moves_and_renumbers() {
        let mut data = ResumeData::default();
        let mut manager = SectionManager::new(&mut data);
        assert!(manager.reorder("interests", 0));
        assert_eq!(manager.sections()[0].id, "interests");
        assert_eq!(manager.sections()[1].id, "personalInfo");
        assert_eq!(orders(&data), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_reorder_invalid_is_noop() {
        let mut data = ResumeData::default();
        let before = data.sections.clone();
        let mut manager = SectionManager::new(&mut data);
        assert!(!manager.reorder("nope", 0));
        assert!(!manager.reorder("summary", 9));
        assert_eq!(data.sections, before);
    }

    #[test]
    fn test_new_normalizes_loaded_orders() {
        let mut data = ResumeData::default();
        data.sections[0].order = 40;
        data.sections[3].order = 7;
        data.sections.reverse();
        SectionManager::new(&mut data);
        assert_eq!(orders(&data), (0..9).collect::<Vec<_>>());
        assert_eq!(data.sections.last().unwrap().id, "personalInfo");
    }

    #[test]
    fn test_hide_required_rejected() {
        let mut data = ResumeData::default();
        let before = data.sections.clone();
        let mut manager = SectionManager::new(&mut data);
        let err = manager.set_visibility("personalInfo", false).unwrap_err();
        assert!(matches!(err, AppError::Constraint(_)));
        assert_eq!(data.sections, before);
    }

    #[test]
    fn test_hide_and_show_optional() {
        let mut data = ResumeData::default();
        let mut manager = SectionManager::new(&mut data);
        manager.set_visibility("summary", false).unwrap();
        assert!(manager.ordered_visible().iter().all(|s| s.id != "summary"));
        manager.set_visibility("summary", true).unwrap();
        assert_eq!(manager.ordered_visible().len(), 9);
    }

    #[test]
    fn test_showing_required_section_allowed() {
        let mut data = ResumeData::default();
        let mut manager = SectionManager::new(&mut data);
        assert!(manager.set_visibility("skills", true).is_ok());
    }

    #[test]
    fn test_add_custom_section_appends() {
        let mut data = ResumeData::default();
        let mut manager = SectionManager::new(&mut data);
        let id = manager.add_custom_section(talks());
        let last = manager.sections().last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.order, 9);
        assert_eq!(last.section_type, SectionType::Custom);
        assert_eq!(last.custom_section_id.as_deref(), Some("talks"));
        assert_eq!(data.custom_sections[0].order, 9);
    }

    #[test]
    fn test_add_then_remove_restores_list() {
        let mut data = ResumeData::default();
        SectionManager::new(&mut data).reorder("skills", 5);
        let before = data.sections.clone();

        let mut manager = SectionManager::new(&mut data);
        let id = manager.add_custom_section(talks());
        let removed = manager.remove_custom_section(&id).unwrap();
        assert_eq!(removed.map(|c| c.id).as_deref(), Some("talks"));
        assert_eq!(data.sections, before);
        assert!(data.custom_sections.is_empty());
    }

    #[test]
    fn test_remove_compacts_orders() {
        let mut data = ResumeData::default();
        let mut manager = SectionManager::new(&mut data);
        let first = manager.add_custom_section(talks());
        let mut other = talks();
        other.id = "volunteering".into();
        manager.add_custom_section(other);
        manager.reorder(&first, 2);
        manager.remove_custom_section(&first).unwrap();
        assert_eq!(orders(&data), (0..10).collect::<Vec<_>>());
        assert_eq!(data.custom_sections[0].order, 9);
    }

    #[test]
    fn test_remove_dangling_custom_section() {
        let mut data = ResumeData::default();
        data.sections.push(ResumeSection {
            id: "custom-gone".into(),
            name: "Gone".into(),
            section_type: SectionType::Custom,
            order: 9,
            is_visible: true,
            is_required: false,
            custom_section_id: Some("gone".into()),
        });
        let mut manager = SectionManager::new(&mut data);
        let removed = manager.remove_custom_section("custom-gone").unwrap();
        assert!(removed.is_none());
        assert_eq!(data.sections.len(), 9);
        assert!(data.sections.iter().all(|s| s.id != "custom-gone"));
        assert_eq!(orders(&data), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_remove_built_in_rejected() {
        let mut data = ResumeData::default();
        let mut manager = SectionManager::new(&mut data);
        assert!(matches!(
            manager.remove_custom_section("summary"),
            Err(AppError::Constraint(_))
        ));
    }

    #[test]
    fn test_custom_visibility_mirrored() {
        let mut data = ResumeData::default();
        let mut manager = SectionManager::new(&mut data);
        let id = manager.add_custom_section(talks());
        manager.set_visibility(&id, false).unwrap();
        assert!(!data.custom_sections[0].is_visible);
    }

    #[test]
    fn test_rename_only_custom() {
        let mut data = ResumeData::default();
        let mut manager = SectionManager::new(&mut data);
        let id = manager.add_custom_section(talks());
        manager.rename_section(&id, "Conference Talks").unwrap();
        assert!(matches!(
            manager.rename_section(&id, " "),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            manager.rename_section("summary", "About"),
            Err(AppError::Constraint(_))
        ));
        assert_eq!(data.custom_sections[0].name, "Conference Talks");
    }

    proptest! {
        #[test]
        fn prop_reorders_keep_orders_dense(moves in prop::collection::vec((0usize..12, 0usize..12), 0..40)) {
            let mut data = ResumeData::default();
            let mut manager = SectionManager::new(&mut data);
            manager.add_custom_section(talks());
            let all_ids: Vec<String> = manager.sections().iter().map(|s| s.id.clone()).collect();

            for (pick, target) in moves {
                let id = all_ids.get(pick).cloned().unwrap_or_else(|| "missing".to_string());
                manager.reorder(&id, target);
            }

            let n = data.sections.len();
            prop_assert_eq!(orders(&data), (0..n).collect::<Vec<_>>());
            let mut seen = ids(&data);
            seen.sort();
            let mut expected = all_ids.clone();
            expected.sort();
            prop_assert_eq!(seen, expected);
        }
    }
}
