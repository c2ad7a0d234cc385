//! `$ref` cells.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bindings::{ChannelBindings, MessageBindings, OperationBindings, ServerBindings};
use crate::codec::Omit;
use crate::error::SpecError;
use crate::validate::{Validate, ValidationContext};
use crate::{
    Channel, CorrelationId, Message, MessageTrait, Operation, OperationTrait, Parameter, Schema,
};

/// The key holding a reference pointer.
pub const REF_KEY: &str = "$ref";

/// What a [`Ref`] cell may point at.
pub trait Target: Serialize + DeserializeOwned + Validate {}

impl<T: Serialize + DeserializeOwned + Validate> Target for T {}

/// A value written either inline or as `{"$ref": pointer}`.
///
/// Decoding fills `pointer` for a reference and `value` for an inline
/// object. A resolution pass later attaches the pointed-at value; after that
/// the cell is not changed again. Validation only ever looks at `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ref<T> {
    pub pointer: String,
    pub value: Option<T>,
}

pub type ChannelRef = Ref<Channel>;
pub type MessageRef = Ref<Message>;
pub type ParameterRef = Ref<Parameter>;
pub type MessageTraitRef = Ref<MessageTrait>;
pub type OperationTraitRef = Ref<OperationTrait>;
pub type OperationRef = Ref<Operation>;
pub type CorrelationIdRef = Ref<CorrelationId>;
pub type ServerBindingsRef = Ref<ServerBindings>;
pub type ChannelBindingsRef = Ref<ChannelBindings>;
pub type OperationBindingsRef = Ref<OperationBindings>;
pub type MessageBindingsRef = Ref<MessageBindings>;
pub type SchemaRef = Ref<Schema>;

impl<T> Default for Ref<T> {
    fn default() -> Self {
        Self {
            pointer: String::new(),
            value: None,
        }
    }
}

impl<T> Ref<T> {
    /// A cell pointing at `pointer`, not yet resolved.
    pub fn to(pointer: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            value: None,
        }
    }

    /// A cell holding `value` inline.
    pub fn inline(value: T) -> Self {
        Self {
            pointer: String::new(),
            value: Some(value),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_pointer(&self) -> bool {
        !self.pointer.is_empty()
    }

    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }

    /// Neither a pointer nor a value.
    pub fn is_empty(&self) -> bool {
        self.pointer.is_empty() && self.value.is_none()
    }

    /// Record the outcome of resolution.
    ///
    /// Returns `false` and leaves the cell untouched if it already holds a
    /// value.
    pub fn attach(&mut self, value: T) -> bool {
        if self.value.is_some() {
            return false;
        }
        self.value = Some(value);
        true
    }
}

impl<T: DeserializeOwned> Ref<T> {
    /// Decode a cell from a raw value.
    ///
    /// An object whose `$ref` is a non-empty string becomes a pointer; any
    /// other input is decoded as `T`.
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        if let Some(pointer) = value
            .get(REF_KEY)
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
        {
            return Ok(Self::to(pointer));
        }
        Ok(Self::inline(serde_json::from_value(value)?))
    }
}

impl<T> From<T> for Ref<T> {
    fn from(value: T) -> Self {
        Self::inline(value)
    }
}

impl<T> Omit for Ref<T> {
    fn is_omitted(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Serialize> Serialize for Ref<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_pointer() {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(REF_KEY, &self.pointer)?;
            return map.end();
        }
        match &self.value {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Ref<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

impl<T: Validate> Validate for Ref<T> {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        match &self.value {
            Some(value) => value.validate(ctx),
            None => Err(SpecError::UnresolvedReference(self.pointer.clone())),
        }
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
    fn pointer_encodes_as_ref_only() {
        let mut cell: ParameterRef = Ref::to("#/components/parameters/id");
        cell.attach(Parameter::default());
        assert_eq!(
            serde_json::to_value(&cell).unwrap(),
            json!({"$ref": "#/components/parameters/id"})
        );
    }

    #[test]
    fn inline_encodes_as_value() {
        let cell = CorrelationIdRef::inline(CorrelationId {
            location: "$message.header#/id".to_string(),
            ..Default::default()
        });
        assert_eq!(
            serde_json::to_value(&cell).unwrap(),
            json!({"location": "$message.header#/id"})
        );
    }

    #[test]
    fn empty_encodes_as_null() {
        let cell = SchemaRef::default();
        assert_eq!(serde_json::to_value(&cell).unwrap(), Value::Null);
    }

    #[test]
    fn decode_pointer() {
        let cell: MessageRef =
            serde_json::from_value(json!({"$ref": "#/components/messages/lightMeasured"}))
                .unwrap();
        assert_eq!(cell.pointer, "#/components/messages/lightMeasured");
        assert!(cell.value.is_none());
    }

    #[test]
    fn decode_empty_pointer_as_value() {
        let cell: SchemaRef = serde_json::from_value(json!({"$ref": "", "type": "string"})).unwrap();
        assert!(cell.pointer.is_empty());
        assert_eq!(cell.value, Some(Schema(json!({"$ref": "", "type": "string"}))));
    }

    #[test]
    fn decode_inline_value() {
        let cell: CorrelationIdRef =
            serde_json::from_value(json!({"location": "$message.payload#/id"})).unwrap();
        assert!(cell.pointer.is_empty());
        assert_eq!(cell.value.unwrap().location, "$message.payload#/id");
    }

    #[test]
    fn decode_wrong_shape_fails() {
        let result = serde_json::from_value::<ParameterRef>(json!(["not", "a", "parameter"]));
        assert!(result.is_err());
    }

    #[test]
    fn unresolved_pointer_is_invalid() {
        let cell: CorrelationIdRef = Ref::to("#/components/correlationIds/missing");
        let err = cell.validate(&ctx()).unwrap_err();
        assert!(
            matches!(err, SpecError::UnresolvedReference(ref p) if p == "#/components/correlationIds/missing")
        );
    }

    #[test]
    fn empty_cell_is_invalid() {
        let cell = CorrelationIdRef::default();
        assert!(matches!(
            cell.validate(&ctx()),
            Err(SpecError::UnresolvedReference(ref p)) if p.is_empty()
        ));
    }

    #[test]
    fn attached_value_is_validated() {
        let mut cell: CorrelationIdRef = Ref::to("#/components/correlationIds/id");
        assert!(cell.attach(CorrelationId::default()));
        assert!(matches!(cell.validate(&ctx()), Err(SpecError::WrongField(_))));

        let mut cell: CorrelationIdRef = Ref::to("#/components/correlationIds/id");
        cell.attach(CorrelationId {
            location: "$message.header#/id".to_string(),
            ..Default::default()
        });
        assert!(cell.validate(&ctx()).is_ok());
    }

    #[test]
    fn attach_is_write_once() {
        let mut cell: SchemaRef = Ref::to("#/components/schemas/a");
        assert!(cell.attach(Schema(json!({"type": "string"}))));
        assert!(!cell.attach(Schema(json!({"type": "integer"}))));
        assert_eq!(cell.get(), Some(&Schema(json!({"type": "string"}))));
    }
}
