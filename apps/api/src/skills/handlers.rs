use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::skills::catalog::{self, SkillMatch};

const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
pub struct SkillCategory {
    pub name: &'static str,
    pub skills: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct SkillLookup {
    pub skill: String,
    pub category: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub skill: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

/// GET /api/v1/skills
pub async fn handle_list_skills() -> Json<Vec<SkillCategory>> {
    Json(
        catalog::categories()
            .into_iter()
            .map(|name| SkillCategory {
                name,
                skills: catalog::skills_in(name).unwrap_or_default(),
            })
            .collect(),
    )
}

/// GET /api/v1/skills/categories/:category
pub async fn handle_category_skills(
    Path(category): Path<String>,
) -> Result<Json<SkillCategory>, AppError> {
    let skills = catalog::skills_in(&category)
        .ok_or_else(|| AppError::NotFound(format!("Skill category '{category}' not found")))?;
    let name = catalog::categories()
        .into_iter()
        .find(|name| name.eq_ignore_ascii_case(category.trim()))
        .unwrap_or_default();
    Ok(Json(SkillCategory { name, skills }))
}

/// GET /api/v1/skills/lookup?skill=
///
/// Which catalog category a skill belongs to, e.g. to file a typed-in skill
/// under the right heading.
pub async fn handle_lookup_skill(
    Query(params): Query<LookupQuery>,
) -> Result<Json<SkillLookup>, AppError> {
    let category = catalog::category_of(&params.skill).ok_or_else(|| {
        AppError::NotFound(format!("'{}' is not in the skill catalog", params.skill.trim()))
    })?;
    Ok(Json(SkillLookup {
        skill: params.skill.trim().to_string(),
        category,
    }))
}

/// GET /api/v1/skills/search?q=&limit=
pub async fn handle_search_skills(
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<SkillMatch>>, AppError> {
    if params.q.trim().is_empty() {
        return Err(AppError::Validation("q cannot be empty".to_string()));
    }
    Ok(Json(catalog::search(
        &params.q,
        params.limit.unwrap_or(DEFAULT_LIMIT),
    )))
}
