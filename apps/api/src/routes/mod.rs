pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::sections::handlers as sections;
use crate::skills::handlers as skills;
use crate::state::AppState;
use crate::store::handlers as profiles;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Skills catalog
        .route("/api/v1/skills", get(skills::handle_list_skills))
        .route("/api/v1/skills/search", get(skills::handle_search_skills))
        .route("/api/v1/skills/lookup", get(skills::handle_lookup_skill))
        .route(
            "/api/v1/skills/categories/:category",
            get(skills::handle_category_skills),
        )
        // Profiles
        .route(
            "/api/v1/profiles",
            get(profiles::handle_list_profiles).post(profiles::handle_create_profile),
        )
        .route(
            "/api/v1/profiles/current",
            get(profiles::handle_current_profile),
        )
        .route(
            "/api/v1/profiles/current/data",
            put(profiles::handle_save_current_data),
        )
        .route("/api/v1/profiles/import", post(profiles::handle_import_profile))
        .route(
            "/api/v1/profiles/:id",
            patch(profiles::handle_rename_profile).delete(profiles::handle_delete_profile),
        )
        .route(
            "/api/v1/profiles/:id/activate",
            post(profiles::handle_activate_profile),
        )
        .route(
            "/api/v1/profiles/:id/duplicate",
            post(profiles::handle_duplicate_profile),
        )
        .route(
            "/api/v1/profiles/:id/export",
            get(profiles::handle_export_profile_json),
        )
        // Sections of the current profile
        .route("/api/v1/sections", get(sections::handle_list_sections))
        .route("/api/v1/sections/reorder", post(sections::handle_reorder))
        .route(
            "/api/v1/sections/:id",
            delete(sections::handle_remove_section),
        )
        .route(
            "/api/v1/sections/:id/visibility",
            patch(sections::handle_set_visibility),
        )
        .route(
            "/api/v1/sections/:id/name",
            patch(sections::handle_rename_section),
        )
        // Custom sections
        .route(
            "/api/v1/custom-sections",
            post(sections::handle_create_custom_section),
        )
        .route(
            "/api/v1/custom-sections/:id/preview",
            get(sections::handle_preview_custom_section),
        )
        .route(
            "/api/v1/custom-sections/:id/rows",
            post(sections::handle_add_row),
        )
        .route(
            "/api/v1/custom-sections/:id/rows/:row_id",
            put(sections::handle_update_row).delete(sections::handle_remove_row),
        )
        .route(
            "/api/v1/custom-sections/:id/row-order",
            post(sections::handle_move_row),
        )
        .route(
            "/api/v1/custom-sections/:id/fields",
            post(sections::handle_add_field),
        )
        .route(
            "/api/v1/custom-sections/:id/fields/:field_id",
            delete(sections::handle_remove_field),
        )
        .route(
            "/api/v1/custom-sections/:id/field-order",
            post(sections::handle_reorder_fields),
        )
        // Export
        .route("/api/v1/export", post(export::handle_export))
        .with_state(state)
}
