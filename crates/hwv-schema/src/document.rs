//! Schema documents and their compiled form.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A JSON Schema document describing valid submissions.
///
/// Immutable once fetched; share it by reference or through `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDocument(serde_json::Value);

impl SchemaDocument {
    #[must_use]
    pub const fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Parse schema text.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Invalid` if the text is not JSON.
    pub fn from_text(text: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text)
            .map(Self)
            .map_err(|e| SchemaError::Invalid(format!("schema is not JSON: {e}")))
    }

    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Compile the document for validation.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Invalid` if `jsonschema` rejects the document.
    pub fn compile(self) -> Result<CompiledSchema, SchemaError> {
        let validator = jsonschema::validator_for(&self.0)
            .map_err(|e| SchemaError::Invalid(format!("{e}")))?;
        Ok(CompiledSchema {
            document: self,
            validator,
        })
    }
}

/// A schema document together with its compiled validator.
pub struct CompiledSchema {
    document: SchemaDocument,
    validator: jsonschema::Validator,
}

impl CompiledSchema {
    #[must_use]
    pub const fn document(&self) -> &SchemaDocument {
        &self.document
    }

    pub(crate) const fn validator(&self) -> &jsonschema::Validator {
        &self.validator
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}
