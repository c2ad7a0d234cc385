//! JSON Schema values embedded in a document.
//!
//! Schemas are kept as raw JSON; the only structural questions asked of them
//! are whether they describe an object and whether they declare properties.
//! Validation checks the schema itself against the JSON Schema meta-schema,
//! never any instance data.

use std::sync::OnceLock;

use jsonschema::{Draft, Validator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::codec::Omit;
use crate::error::SpecError;
use crate::validate::{Validate, ValidationContext};

/// A draft meta-schema, compiled on first use.
///
/// The compiled validator is only a `$ref` to the bundled meta-schema, so a
/// schema is checked as plain data and its own `$ref`s are never followed.
struct MetaSchema {
    draft: Draft,
    uri: &'static str,
    validator: OnceLock<Result<Validator, String>>,
}

impl MetaSchema {
    const fn new(draft: Draft, uri: &'static str) -> Self {
        Self {
            draft,
            uri,
            validator: OnceLock::new(),
        }
    }

    fn validator(&self) -> Result<&Validator, SpecError> {
        self.validator
            .get_or_init(|| {
                jsonschema::options()
                    .with_draft(self.draft)
                    .build(&json!({ "$ref": self.uri }))
                    .map_err(|err| err.to_string())
            })
            .as_ref()
            .map_err(|err| SpecError::Schema(format!("meta-schema {}: {err}", self.uri)))
    }
}

/// Dialects the meta-schema check knows how to handle.
static META_SCHEMAS: [MetaSchema; 5] = [
    MetaSchema::new(Draft::Draft4, "http://json-schema.org/draft-04/schema"),
    MetaSchema::new(Draft::Draft6, "http://json-schema.org/draft-06/schema"),
    MetaSchema::new(Draft::Draft7, "http://json-schema.org/draft-07/schema"),
    MetaSchema::new(Draft::Draft201909, "https://json-schema.org/draft/2019-09/schema"),
    MetaSchema::new(Draft::Draft202012, "https://json-schema.org/draft/2020-12/schema"),
];

/// Schema objects without `$schema` follow draft 07.
const DEFAULT_DIALECT: usize = 2;

fn meta_schema(dialect: Option<&str>) -> Option<&'static MetaSchema> {
    match dialect {
        None => Some(&META_SCHEMAS[DEFAULT_DIALECT]),
        Some(dialect) => {
            let dialect = dialect.trim_end_matches('#');
            META_SCHEMAS.iter().find(|meta| meta.uri == dialect)
        }
    }
}

/// An arbitrary JSON Schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(pub Value);

impl Schema {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Whether `type` is `"object"` or a list containing it.
    pub fn is_object_type(&self) -> bool {
        match self.0.get("type") {
            Some(Value::String(t)) => t == "object",
            Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
            _ => false,
        }
    }

    /// Whether `properties` is a non-empty mapping.
    pub fn has_properties(&self) -> bool {
        self.0
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|props| !props.is_empty())
    }

    /// Require an object schema with at least one property, then validate it.
    ///
    /// Used for binding fields such as HTTP `query` and `headers` that are
    /// matched against named parameters.
    pub(crate) fn validate_object(
        &self,
        field: &str,
        ctx: &ValidationContext,
    ) -> Result<(), SpecError> {
        if !self.is_object_type() || !self.has_properties() {
            return Err(SpecError::wrong_field(format!(
                "{field} must be an object schema with properties"
            )));
        }
        self.validate(ctx)
    }

    fn dialect(&self) -> Option<&str> {
        self.0.get("$schema").and_then(Value::as_str)
    }
}

impl Omit for Schema {
    fn is_omitted(&self) -> bool {
        self.0.is_null()
    }
}

impl Validate for Schema {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        match &self.0 {
            Value::Bool(_) => return Ok(()),
            Value::Object(_) => {}
            _ => return Err(SpecError::Schema("schema must be an object or a boolean".into())),
        }

        let dialect = self.dialect();
        let Some(meta) = meta_schema(dialect) else {
            tracing::debug!(?dialect, "skipping meta-schema check for unknown dialect");
            return Ok(());
        };

        meta.validator()?
            .validate(&self.0)
            .map_err(|err| SpecError::Schema(err.to_string()))
    }
}
