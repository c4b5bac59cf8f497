//! The document validator shared by the client and server paths.

use hwv_core::validation::{ValidationError, ValidationReport};
use jsonschema::error::ValidationErrorKind;

use crate::document::CompiledSchema;
use crate::locate::{PositionIndex, join_property, pointer_to_path};

/// Validate `document` against `schema`.
///
/// Pure and total: text that is not JSON yields the single generic parse
/// error; otherwise every schema violation becomes one located error, in the
/// order the validator reported it. An empty error list means valid.
#[must_use]
pub fn validate(document: &str, schema: &CompiledSchema) -> ValidationReport {
    let Ok(instance) = serde_json::from_str::<serde_json::Value>(document) else {
        return ValidationReport::parse_failure();
    };

    let mut errors = schema.validator().iter_errors(&instance).peekable();
    if errors.peek().is_none() {
        return ValidationReport::valid();
    }

    let index = PositionIndex::build(document);
    ValidationReport::from_violations(errors.map(|error| locate(&error, &index)).collect())
}

fn locate(error: &jsonschema::ValidationError<'_>, index: &PositionIndex) -> ValidationError {
    let pointer = error.instance_path.to_string();
    let located = index.get(&pointer);
    let (line, column) = located
        .map(|l| (l.position.line, l.position.column))
        .unzip();
    let base = located.map_or_else(|| pointer_to_path(&pointer), |l| l.path.clone());

    // A missing property has no position of its own: report it under its
    // own name, located at the enclosing object.
    let path = match &error.kind {
        ValidationErrorKind::Required { property } => property
            .as_str()
            .map_or_else(|| base.clone(), |name| join_property(&base, name)),
        _ => base,
    };

    ValidationError {
        line,
        column,
        path: Some(path),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SchemaDocument;
    use crate::provider::EmbeddedSchemaProvider;
    use hwv_core::enums::FailureKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn resolution_schema() -> CompiledSchema {
        SchemaDocument::new(json!({
            "type": "object",
            "properties": {"resolution": {"type": "string"}},
            "required": ["resolution"]
        }))
        .compile()
        .unwrap()
    }

    fn survey_schema() -> CompiledSchema {
        EmbeddedSchemaProvider::document().unwrap().compile().unwrap()
    }

    #[test]
    fn accepts_conforming_document() {
        let report = validate(r#"{"resolution": "1080p"}"#, &resolution_schema());
        assert!(report.is_valid());
        assert!(report.errors().is_empty());
    }

    #[test]
    fn missing_required_field_is_reported_by_name() {
        let report = validate("{}", &resolution_schema());
        assert!(!report.is_valid());
        assert_eq!(report.failure(), Some(FailureKind::Schema));
        assert_eq!(report.errors().len(), 1);

        let error = &report.errors()[0];
        assert_eq!(error.path.as_deref(), Some("resolution"));
        assert_eq!((error.line, error.column), (Some(1), Some(1)));
        assert!(error.message.contains("required"), "{}", error.message);
    }

    #[rstest]
    #[case("{")]
    #[case("")]
    #[case("not json at all")]
    #[case(r#"{"resolution": "1080p",}"#)]
    fn malformed_text_yields_one_unlocated_error(#[case] text: &str) {
        let report = validate(text, &resolution_schema());
        assert!(!report.is_valid());
        assert_eq!(report.failure(), Some(FailureKind::Parse));
        assert_eq!(report.errors().len(), 1);
        assert!(!report.errors()[0].is_located());
        assert!(report.errors()[0].path.is_none());
    }

    #[test]
    fn type_violation_points_at_offending_value() {
        let text = "{\n  \"resolution\": 1080\n}";
        let report = validate(text, &resolution_schema());
        assert_eq!(report.errors().len(), 1);
        let error = &report.errors()[0];
        assert_eq!(error.path.as_deref(), Some("resolution"));
        assert_eq!((error.line, error.column), (Some(2), Some(17)));
    }

    #[test]
    fn nested_violations_use_dotted_paths() {
        let text = r#"{
  "deviceId": "arc-a380",
  "tests": [
    {"codec": "h264", "resolution": "1080p", "maxStreams": 8},
    {"codec": "hevc", "maxStreams": "lots"}
  ]
}"#;
        let report = validate(text, &survey_schema());
        let paths: Vec<_> = report
            .errors()
            .iter()
            .filter_map(|e| e.path.as_deref())
            .collect();

        assert!(paths.contains(&"tests[1].resolution"), "{paths:?}");
        assert!(paths.contains(&"tests[1].maxStreams"), "{paths:?}");
        assert!(report.errors().iter().all(ValidationError::is_located));

        let streams = report
            .errors()
            .iter()
            .find(|e| e.path.as_deref() == Some("tests[1].maxStreams"))
            .unwrap();
        assert_eq!(streams.line, Some(5));
    }

    #[test]
    fn verdict_matches_error_list() {
        let schema = survey_schema();
        for text in [
            r#"{"deviceId": "x"}"#,
            r#"{"deviceId": ""}"#,
            r#"{"deviceId": "x", "tests": [{}]}"#,
            "[]",
            "42",
        ] {
            let report = validate(text, &schema);
            assert_eq!(report.is_valid(), report.errors().is_empty(), "{text}");
        }
    }

    #[test]
    fn validation_is_repeatable() {
        let schema = survey_schema();
        let text = r#"{"deviceId": "", "tests": [{"codec": 1}]}"#;
        assert_eq!(validate(text, &schema), validate(text, &schema));
    }
}
