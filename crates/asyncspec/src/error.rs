use asyncspec_router::TemplateError;
use thiserror::Error;

/// Errors produced while decoding, resolving or validating a document.
///
/// Validation is fail-fast: the first error found is returned unchanged
/// through every enclosing `validate` call.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A `$ref` cell (or one-of cell) has no attached value.
    #[error("unresolved reference: {0:?}")]
    UnresolvedReference(String),

    /// A required field is missing or holds a value outside its allowed set.
    #[error("wrong field: {0}")]
    WrongField(String),

    /// Unbalanced `{`/`}` in a server URL template.
    #[error("malformed template: {0}")]
    MalformedTemplate(String),

    /// A declared field was given a value of the wrong shape.
    #[error("type mismatch for key {key:?}: {reason}")]
    TypeMismatch { key: String, reason: String },

    /// A schema value is not a valid JSON Schema.
    #[error("schema error: {0}")]
    Schema(String),

    /// A map key does not match the identifier pattern for its collection.
    #[error("invalid identifier {identifier:?}: must match {pattern}")]
    InvalidIdentifier { identifier: String, pattern: String },

    /// Following a `$ref` chain led back to a pointer already being resolved.
    #[error("circular reference: {0}")]
    CircularReference(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpecError {
    pub(crate) fn wrong_field(message: impl Into<String>) -> Self {
        Self::WrongField(message.into())
    }

    pub(crate) fn required(field: &str) -> Self {
        Self::WrongField(format!("field {field} is required"))
    }
}

impl From<TemplateError> for SpecError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::MalformedTemplate { template } => Self::MalformedTemplate(template),
        }
    }
}
