// Section model: custom-section schema and rows, field rendering,
// completeness validation, and ordering/visibility of the section list.
// Apart from the handlers everything here is pure and synchronous;
// persistence lives in `store`.

pub mod custom;
pub mod handlers;
pub mod manager;
pub mod render;
pub mod validator;

pub use manager::SectionManager;
