//! Validation results shared by the client and server sides.
//!
//! A `ValidationReport` is plain data: parse failures and schema violations
//! are recorded as entries, never raised. `is_valid()` is derived from the
//! error list, so a report cannot claim validity while carrying errors.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FailureKind;

/// Message reported when a document is not well-formed JSON.
pub const PARSE_FAILURE_MESSAGE: &str = "Unknown issue occurred while validating the input.";

/// Field key used for errors that belong to the document as a whole.
pub const ROOT_FIELD: &str = "$";

/// Field path to the messages reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// One problem found in a document.
///
/// Parse failures leave `line`, `column`, and `path` empty. Schema violations
/// fill all three: `line`/`column` are 1-based and point at the offending
/// value, `path` is the dotted location (`tests[0].codec`, empty for the root).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

impl ValidationError {
    /// The generic, unlocated error for text that is not JSON.
    #[must_use]
    pub fn parse_failure() -> Self {
        Self {
            line: None,
            column: None,
            path: None,
            message: PARSE_FAILURE_MESSAGE.to_string(),
        }
    }

    /// An error reported by the server for a field, without location.
    #[must_use]
    pub fn for_field(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line: None,
            column: None,
            path: Some(path.into()),
            message: message.into(),
        }
    }

    /// Whether the error carries a text position.
    #[must_use]
    pub const fn is_located(&self) -> bool {
        self.line.is_some() && self.column.is_some()
    }
}

/// Verdict plus ordered errors for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ValidationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<FailureKind>,
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// A passing report.
    #[must_use]
    pub fn valid() -> Self {
        Self::default()
    }

    /// The report for text that does not parse as JSON.
    #[must_use]
    pub fn parse_failure() -> Self {
        Self {
            failure: Some(FailureKind::Parse),
            errors: vec![ValidationError::parse_failure()],
        }
    }

    /// Build a report from schema violations in discovery order.
    ///
    /// An empty list yields a passing report.
    #[must_use]
    pub fn from_violations(errors: Vec<ValidationError>) -> Self {
        let failure = (!errors.is_empty()).then_some(FailureKind::Schema);
        Self { failure, errors }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Why the document failed, or `None` when it passed.
    #[must_use]
    pub const fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Group messages by field path, for the rejection response body.
    ///
    /// Errors without a path, or with the empty root path, are keyed by
    /// [`ROOT_FIELD`]. Message order within a field follows discovery order.
    #[must_use]
    pub fn field_errors(&self) -> FieldErrors {
        let mut fields = FieldErrors::new();
        for error in &self.errors {
            let key = match error.path.as_deref() {
                None | Some("") => ROOT_FIELD.to_string(),
                Some(path) => path.to_string(),
            };
            fields.entry(key).or_default().push(error.message.clone());
        }
        fields
    }
}

/// Flatten a field-error map into one `ValidationError` per message.
///
/// The field path is repeated for each of its messages.
#[must_use]
pub fn flatten_field_errors(fields: &FieldErrors) -> Vec<ValidationError> {
    fields
        .iter()
        .flat_map(|(path, messages)| {
            messages
                .iter()
                .map(move |message| ValidationError::for_field(path.clone(), message.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn located(path: &str, message: &str) -> ValidationError {
        ValidationError {
            line: Some(1),
            column: Some(1),
            path: Some(path.to_string()),
            message: message.to_string(),
        }
    }

    #[test]
    fn empty_violations_are_valid() {
        let report = ValidationReport::from_violations(Vec::new());
        assert!(report.is_valid());
        assert_eq!(report.failure(), None);
    }

    #[test]
    fn parse_failure_has_single_unlocated_error() {
        let report = ValidationReport::parse_failure();
        assert!(!report.is_valid());
        assert_eq!(report.failure(), Some(FailureKind::Parse));
        assert_eq!(report.errors().len(), 1);
        let error = &report.errors()[0];
        assert!(!error.is_located());
        assert!(error.path.is_none());
        assert_eq!(error.message, PARSE_FAILURE_MESSAGE);
    }

    #[test]
    fn field_errors_group_by_path_in_order() {
        let report = ValidationReport::from_violations(vec![
            located("tests[0].codec", "first"),
            located("", "root problem"),
            located("tests[0].codec", "second"),
        ]);

        let fields = report.field_errors();
        assert_eq!(fields["tests[0].codec"], vec!["first", "second"]);
        assert_eq!(fields[ROOT_FIELD], vec!["root problem"]);
    }

    #[test]
    fn flatten_repeats_path_per_message() {
        let mut fields = FieldErrors::new();
        fields.insert(
            "resolution".into(),
            vec!["is required".into(), "must be a string".into()],
        );
        fields.insert("deviceId".into(), vec!["too short".into()]);

        let flat = flatten_field_errors(&fields);
        assert_eq!(
            flat,
            vec![
                ValidationError::for_field("deviceId", "too short"),
                ValidationError::for_field("resolution", "is required"),
                ValidationError::for_field("resolution", "must be a string"),
            ]
        );
    }

    #[test]
    fn report_serializes_without_empty_locations() {
        let json = serde_json::to_value(ValidationReport::parse_failure()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "failure": "parse",
                "errors": [{"message": PARSE_FAILURE_MESSAGE}]
            })
        );
    }
}
