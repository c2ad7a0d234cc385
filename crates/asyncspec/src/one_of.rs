//! One-or-many reference cells.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::Omit;
use crate::error::SpecError;
use crate::reference::Ref;
use crate::validate::{Validate, ValidationContext};
use crate::Message;

/// The key holding a list of alternatives.
pub const ONE_OF_KEY: &str = "oneOf";

/// Either a single [`Ref`] or `{"oneOf": [...]}`, a list of alternatives.
///
/// When `alternatives` is non-empty it is authoritative and `single` is not
/// used; otherwise the cell behaves exactly like `single`.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf<T> {
    pub single: Ref<T>,
    pub alternatives: Vec<Ref<T>>,
}

pub type MessageOneOf = OneOf<Message>;

impl<T> Default for OneOf<T> {
    fn default() -> Self {
        Self {
            single: Ref::default(),
            alternatives: Vec::new(),
        }
    }
}

impl<T> OneOf<T> {
    /// A cell with a list of alternatives.
    pub fn any(alternatives: Vec<Ref<T>>) -> Self {
        Self {
            single: Ref::default(),
            alternatives,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.alternatives.is_empty()
    }
}

impl<T: DeserializeOwned> OneOf<T> {
    /// Decode a cell from a raw value.
    ///
    /// A `oneOf` key with a non-empty list yields alternatives; a `oneOf`
    /// key holding anything but a list is a type mismatch. Everything else
    /// is decoded as a single reference.
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        match value.get(ONE_OF_KEY) {
            Some(Value::Array(items)) if !items.is_empty() => {
                let alternatives = items
                    .iter()
                    .cloned()
                    .map(Ref::from_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::any(alternatives))
            }
            Some(Value::Array(_)) | None => Ok(Self::from(Ref::from_value(value)?)),
            Some(other) => Err(SpecError::TypeMismatch {
                key: ONE_OF_KEY.to_string(),
                reason: format!("expected a sequence, found {other}"),
            }),
        }
    }
}

impl<T> From<Ref<T>> for OneOf<T> {
    fn from(single: Ref<T>) -> Self {
        Self {
            single,
            alternatives: Vec::new(),
        }
    }
}

impl<T> Omit for OneOf<T> {
    fn is_omitted(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Serialize> Serialize for OneOf<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.alternatives.is_empty() {
            return self.single.serialize(serializer);
        }
        let present: Vec<&Ref<T>> = self
            .alternatives
            .iter()
            .filter(|alt| !alt.is_empty())
            .collect();
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(ONE_OF_KEY, &present)?;
        map.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for OneOf<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

impl<T: Validate> Validate for OneOf<T> {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        if let Some(value) = &self.single.value {
            return value.validate(ctx);
        }
        if self.alternatives.is_empty() {
            return Err(SpecError::UnresolvedReference(self.single.pointer.clone()));
        }
        self.alternatives.iter().try_for_each(|alt| alt.validate(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CorrelationId;
    use serde_json::json;

    type CorrelationOneOf = OneOf<CorrelationId>;

    fn ctx() -> ValidationContext {
        ValidationContext::default()
    }

    fn valid() -> Ref<CorrelationId> {
        Ref::inline(CorrelationId {
            location: "$message.header#/id".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn decode_alternatives_in_order() {
        let cell: MessageOneOf = serde_json::from_value(json!({
            "oneOf": [
                {"$ref": "#/components/messages/a"},
                {"name": "inline"},
                {"$ref": "#/components/messages/b"}
            ]
        }))
        .unwrap();

        assert!(cell.single.is_empty());
        assert_eq!(cell.alternatives.len(), 3);
        assert_eq!(cell.alternatives[0].pointer, "#/components/messages/a");
        assert_eq!(
            cell.alternatives[1].value.as_ref().unwrap().common.name,
            "inline"
        );
        assert_eq!(cell.alternatives[2].pointer, "#/components/messages/b");
    }

    #[test]
    fn decode_single_reference() {
        let cell: MessageOneOf =
            serde_json::from_value(json!({"$ref": "#/components/messages/a"})).unwrap();
        assert_eq!(cell.single.pointer, "#/components/messages/a");
        assert!(cell.alternatives.is_empty());
    }

    #[test]
    fn decode_non_list_one_of_fails() {
        let err = MessageOneOf::from_value(json!({"oneOf": {"name": "x"}})).unwrap_err();
        assert!(matches!(err, SpecError::TypeMismatch { ref key, .. } if key == "oneOf"));
    }

    #[test]
    fn encode_single_and_list() {
        let single: CorrelationOneOf = Ref::to("#/components/correlationIds/a").into();
        assert_eq!(
            serde_json::to_value(&single).unwrap(),
            json!({"$ref": "#/components/correlationIds/a"})
        );

        let list = CorrelationOneOf::any(vec![
            Ref::to("#/components/correlationIds/a"),
            Ref::default(),
            valid(),
        ]);
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!({"oneOf": [
                {"$ref": "#/components/correlationIds/a"},
                {"location": "$message.header#/id"}
            ]})
        );
    }

    #[test]
    fn validate_prefers_single_value() {
        let mut cell = CorrelationOneOf::any(vec![Ref::to("#/missing")]);
        cell.single = valid();
        assert!(cell.validate(&ctx()).is_ok());
    }

    #[test]
    fn validate_alternatives_fail_fast_in_order() {
        let cell = CorrelationOneOf::any(vec![
            valid(),
            Ref::to("#/components/correlationIds/first"),
            Ref::to("#/components/correlationIds/second"),
        ]);
        let err = cell.validate(&ctx()).unwrap_err();
        assert!(
            matches!(err, SpecError::UnresolvedReference(ref p) if p == "#/components/correlationIds/first")
        );

        let swapped = CorrelationOneOf::any(vec![
            Ref::inline(CorrelationId::default()),
            Ref::to("#/components/correlationIds/first"),
        ]);
        assert!(matches!(swapped.validate(&ctx()), Err(SpecError::WrongField(_))));
    }

    #[test]
    fn validate_passes_when_all_alternatives_pass() {
        let cell = CorrelationOneOf::any(vec![valid(), valid()]);
        assert!(cell.validate(&ctx()).is_ok());
    }

    #[test]
    fn validate_empty_cell_is_unresolved() {
        let cell = CorrelationOneOf::default();
        assert!(matches!(
            cell.validate(&ctx()),
            Err(SpecError::UnresolvedReference(_))
        ));
    }
}
