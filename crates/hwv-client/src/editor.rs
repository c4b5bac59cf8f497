//! Validation state for an interactive document editor.

use hwv_core::validation::ValidationError;
use hwv_schema::SchemaSession;

use crate::http::SubmitOutcome;

/// Text a fresh editor starts with.
pub const DEFAULT_DOCUMENT: &str = "{\n}";

/// Error list and verdict for the document currently in an editor.
///
/// Every change revalidates the full text; the list is replaced, never merged.
#[derive(Debug, Clone)]
pub struct EditorValidation {
    schema: SchemaSession,
    errors: Vec<ValidationError>,
    is_valid: bool,
    accepted_id: Option<String>,
}

impl EditorValidation {
    /// Start with [`DEFAULT_DOCUMENT`] already validated.
    #[must_use]
    pub fn new(schema: SchemaSession) -> Self {
        let mut editor = Self {
            schema,
            errors: Vec::new(),
            is_valid: false,
            accepted_id: None,
        };
        editor.on_change(DEFAULT_DOCUMENT);
        editor
    }

    /// Revalidate after an edit.
    pub fn on_change(&mut self, text: &str) -> &[ValidationError] {
        let report = self.schema.validate(text);
        self.is_valid = report.is_valid();
        self.errors = report.into_errors();
        &self.errors
    }

    /// Fold a submit result into the displayed state.
    ///
    /// Server rejections are appended after the local errors.
    pub fn apply_outcome(&mut self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Accepted(id) => self.accepted_id = Some(id.clone()),
            SubmitOutcome::Rejected(errors) => {
                self.is_valid = false;
                self.errors.extend(errors.iter().cloned());
            }
            SubmitOutcome::Invalid(report) => {
                self.is_valid = false;
                self.errors = report.errors().to_vec();
            }
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Identifier of the last accepted submission, if any.
    #[must_use]
    pub fn accepted_id(&self) -> Option<&str> {
        self.accepted_id.as_deref()
    }
}
