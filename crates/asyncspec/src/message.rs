//! Messages, message traits and their payload unions.

use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::Omit;
use crate::error::SpecError;
use crate::info::{ExternalDocs, Tag};
use crate::reference::{
    CorrelationIdRef, MessageBindingsRef, MessageTraitRef, Ref, SchemaRef, REF_KEY,
};
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record, Schema};

/// Keys whose presence marks an object as a JSON Schema.
const SCHEMA_KEYWORDS: &[&str] = &[
    REF_KEY,
    "$schema",
    "type",
    "properties",
    "additionalProperties",
    "patternProperties",
    "required",
    "items",
    "additionalItems",
    "enum",
    "const",
    "format",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "if",
    "then",
    "else",
    "discriminator",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "minLength",
    "maxLength",
    "pattern",
    "minItems",
    "maxItems",
    "uniqueItems",
    "contains",
    "minProperties",
    "maxProperties",
    "propertyNames",
    "dependencies",
    "$id",
    "$comment",
    "definitions",
    "title",
    "description",
    "default",
    "examples",
    "readOnly",
    "writeOnly",
    "deprecated",
];

fn looks_like_schema(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| SCHEMA_KEYWORDS.iter().any(|k| map.contains_key(*k)))
}

/// A message payload: a schema, or any other value kept verbatim.
///
/// Objects that carry `$ref` or a JSON Schema keyword decode as a schema;
/// everything else is opaque. Only the schema variant is validated.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    Schema(SchemaRef),
    Any(Value),
}

impl MessagePayload {
    pub fn schema(&self) -> Option<&SchemaRef> {
        match self {
            Self::Schema(schema) => Some(schema),
            Self::Any(_) => None,
        }
    }

    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        if looks_like_schema(&value) {
            Ok(Self::Schema(Ref::from_value(value)?))
        } else {
            Ok(Self::Any(value))
        }
    }
}

impl Default for MessagePayload {
    fn default() -> Self {
        Self::Any(Value::Null)
    }
}

impl Omit for MessagePayload {
    fn is_omitted(&self) -> bool {
        matches!(self, Self::Any(Value::Null))
    }
}

impl Serialize for MessagePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Schema(schema) => schema.serialize(serializer),
            Self::Any(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MessagePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

impl Validate for MessagePayload {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        match self {
            Self::Schema(schema) => schema.validate(ctx),
            Self::Any(_) => Ok(()),
        }
    }
}

/// The `schemaFormat` of a message: a format name or an inline schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaFormat {
    Name(String),
    Schema(Schema),
}

/// Fields shared by a message and the traits applied to it.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct MessageTrait {
    pub headers: Option<SchemaRef>,
    pub correlation_id: Option<CorrelationIdRef>,
    pub schema_format: Option<SchemaFormat>,
    pub content_type: String,
    pub name: String,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub external_docs: Option<ExternalDocs>,
    pub bindings: Option<MessageBindingsRef>,
    pub examples: Vec<Value>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for MessageTrait {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.headers.validate(ctx)?;
        self.correlation_id.validate(ctx)?;
        self.bindings.validate(ctx)
    }
}

/// A message exchanged on a channel.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Message {
    #[record(flatten)]
    pub common: MessageTrait,
    pub payload: MessagePayload,
    pub traits: Vec<MessageTraitRef>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for Message {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.payload.validate(ctx)?;
        self.traits.validate(ctx)?;
        self.common.validate(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> ValidationContext {
        ValidationContext::default()
    }

    #[test]
    fn payload_schema_detection() {
        let payload: MessagePayload =
            serde_json::from_value(json!({"$ref": "#/components/schemas/lightMeasuredPayload"}))
                .unwrap();
        assert_eq!(
            payload.schema().unwrap().pointer,
            "#/components/schemas/lightMeasuredPayload"
        );

        let payload: MessagePayload =
            serde_json::from_value(json!({"type": "object", "properties": {"lumens": {}}})).unwrap();
        assert!(payload.schema().unwrap().is_resolved());

        let payload: MessagePayload =
            serde_json::from_value(json!({"lumens": 3, "sentAt": "now"})).unwrap();
        assert_eq!(payload, MessagePayload::Any(json!({"lumens": 3, "sentAt": "now"})));

        let payload: MessagePayload = serde_json::from_value(json!("raw text")).unwrap();
        assert!(payload.schema().is_none());
    }

    #[test]
    fn annotation_only_payload_is_a_schema() {
        let payload: MessagePayload = serde_json::from_value(json!({
            "title": "Light measured",
            "description": "Any reading the sensor emits."
        }))
        .unwrap();
        assert!(payload.schema().is_some());
        assert!(payload.validate(&ctx()).is_ok());

        let payload: MessagePayload = serde_json::from_value(json!({"title": 5})).unwrap();
        assert!(matches!(payload.validate(&ctx()), Err(SpecError::Schema(_))));
    }

    #[test]
    fn only_schema_payloads_are_validated() {
        let bad = MessagePayload::Schema(Ref::inline(Schema(json!({"type": 1}))));
        assert!(matches!(bad.validate(&ctx()), Err(SpecError::Schema(_))));

        let opaque = MessagePayload::Any(json!({"type_": 1}));
        assert!(opaque.validate(&ctx()).is_ok());

        let unresolved = MessagePayload::Schema(Ref::to("#/components/schemas/missing"));
        assert!(matches!(
            unresolved.validate(&ctx()),
            Err(SpecError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn schema_format_variants() {
        let name: SchemaFormat =
            serde_json::from_value(json!("application/vnd.aai.asyncapi;version=2.0.0")).unwrap();
        assert!(matches!(name, SchemaFormat::Name(_)));

        let schema: SchemaFormat = serde_json::from_value(json!({"type": "string"})).unwrap();
        assert!(matches!(schema, SchemaFormat::Schema(_)));
    }

    #[test]
    fn message_round_trip_with_trait_fields() {
        let input = json!({
            "name": "lightMeasured",
            "title": "Light measured",
            "contentType": "application/json",
            "correlationId": {"$ref": "#/components/correlationIds/sentAt"},
            "traits": [{"$ref": "#/components/messageTraits/commonHeaders"}],
            "payload": {"$ref": "#/components/schemas/lightMeasuredPayload"},
            "examples": [{"lumens": 3}],
            "x-internal": true
        });
        let message: Message = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(message.common.name, "lightMeasured");
        assert_eq!(message.common.content_type, "application/json");
        assert_eq!(message.traits.len(), 1);
        assert_eq!(message.extensions.len(), 1);
        assert_eq!(serde_json::to_value(&message).unwrap(), input);
    }

    #[test]
    fn trait_extensions_survive_encoding() {
        let mut message = Message::default();
        message.common.name = "m".to_string();
        message
            .common
            .extensions
            .insert("x-trait-ext".to_string(), json!(1));

        let encoded = serde_json::to_value(&message).unwrap();
        assert_eq!(encoded, json!({"name": "m", "x-trait-ext": 1}));

        let back: Message = serde_json::from_value(encoded).unwrap();
        assert_eq!(back.common.name, "m");
        assert_eq!(back.extensions["x-trait-ext"], json!(1));
    }

    #[test]
    fn message_validates_payload_then_traits_then_common() {
        let message: Message = serde_json::from_value(json!({
            "payload": {"type": "object"},
            "correlationId": {"description": "no location"}
        }))
        .unwrap();
        assert!(matches!(message.validate(&ctx()), Err(SpecError::WrongField(ref m)) if m.contains("location")));

        let message: Message = serde_json::from_value(json!({
            "payload": {"type": "object"},
            "headers": {"type": "object", "properties": {"x-trace": {"type": "string"}}},
            "correlationId": {"location": "$message.header#/x-trace"}
        }))
        .unwrap();
        assert!(message.validate(&ctx()).is_ok());
    }
}
