pub mod custom;
pub mod profile;
pub mod resume;

/// Generates a collision-resistant id for fields, rows, sections and profiles.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
