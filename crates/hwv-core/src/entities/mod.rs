//! Persisted entities.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` so the HTTP layer can return
//! them directly.

mod display_model;
mod submission;

pub use display_model::HardwareDisplayModel;
pub use submission::HardwareSurveySubmission;
