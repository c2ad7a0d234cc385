//! Extension-preserving record codec.
//!
//! A record is a struct with a fixed set of declared fields plus an
//! extension bag. Encoding starts from the bag and lays the declared fields
//! over it, so a declared field always wins over a same-named extension.
//! Decoding takes each declared key out of the input mapping and whatever is
//! left becomes the bag. Extensions are detected by key subtraction rather
//! than by an allow-list of `x-` prefixes, so any unrecognized key survives a
//! round trip.
//!
//! Records implement [`Record`] through `#[derive(Record)]`; the derive also
//! wires `serde::Serialize`/`Deserialize` through [`encode`] and [`decode`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::SpecError;

/// A JSON object, as produced by [`encode`] and consumed by [`decode`].
pub type Map = serde_json::Map<String, Value>;

/// Keys of a record that are not declared fields, with their raw values.
pub type Extensions = BTreeMap<String, Value>;

/// A struct with declared fields and an extension bag.
pub trait Record: Sized {
    fn extensions(&self) -> &Extensions;

    fn extensions_mut(&mut self) -> &mut Extensions;

    /// Write every declared field into `encoder`.
    fn encode_fields(&self, encoder: &mut Encoder) -> Result<(), SpecError>;

    /// Take every declared field out of `decoder`.
    ///
    /// The returned record has an empty extension bag; [`decode`] fills it
    /// from the keys the decoder has left over.
    fn decode_fields(decoder: &mut Decoder) -> Result<Self, SpecError>;
}

/// Whether a field value is left out of the encoded mapping.
pub trait Omit {
    fn is_omitted(&self) -> bool;
}

impl Omit for String {
    fn is_omitted(&self) -> bool {
        self.is_empty()
    }
}

impl Omit for bool {
    fn is_omitted(&self) -> bool {
        !*self
    }
}

impl Omit for Value {
    fn is_omitted(&self) -> bool {
        self.is_null()
    }
}

impl<T> Omit for Option<T> {
    fn is_omitted(&self) -> bool {
        self.is_none()
    }
}

impl<T> Omit for Vec<T> {
    fn is_omitted(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Omit for BTreeMap<K, V> {
    fn is_omitted(&self) -> bool {
        self.is_empty()
    }
}

/// Builds the encoded mapping of one record.
#[derive(Debug)]
pub struct Encoder {
    map: Map,
}

impl Encoder {
    /// Start from a copy of the record's extension bag.
    pub fn new(extensions: &Extensions) -> Self {
        let map = extensions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self { map }
    }

    /// Add extension entries whose keys are not present yet.
    ///
    /// Used for the bag of a flattened record; the outer bag keeps priority
    /// and declared fields written later overwrite either.
    pub fn extend(&mut self, extensions: &Extensions) {
        for (key, value) in extensions {
            self.map
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Emit `value` under `key` unless it is omitted.
    ///
    /// An omitted field still removes a same-named extension, so the bag
    /// never leaks a declared key into the output.
    pub fn field<T>(&mut self, key: &str, value: &T) -> Result<(), SpecError>
    where
        T: Serialize + Omit,
    {
        if value.is_omitted() {
            self.map.remove(key);
        } else {
            self.map.insert(key.to_string(), serde_json::to_value(value)?);
        }
        Ok(())
    }

    /// Emit `value` under `key` even when it holds its default.
    pub fn always<T>(&mut self, key: &str, value: &T) -> Result<(), SpecError>
    where
        T: Serialize,
    {
        self.map.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn finish(self) -> Map {
        self.map
    }
}

/// Consumes declared keys from an input mapping.
#[derive(Debug)]
pub struct Decoder {
    map: Map,
}

impl Decoder {
    pub fn new(map: Map) -> Self {
        Self { map }
    }

    /// Take `key` out of the mapping and decode it.
    ///
    /// A missing key or an explicit `null` gives the field's default.
    pub fn field<T>(&mut self, key: &str) -> Result<T, SpecError>
    where
        T: DeserializeOwned + Default,
    {
        match self.map.remove(key) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value).map_err(|err| SpecError::TypeMismatch {
                key: key.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    /// The keys no declared field has claimed.
    pub fn into_extensions(self) -> Extensions {
        self.map.into_iter().collect()
    }
}

/// Encode a record into a mapping: extensions first, declared fields on top.
pub fn encode<T: Record>(record: &T) -> Result<Map, SpecError> {
    let mut encoder = Encoder::new(record.extensions());
    record.encode_fields(&mut encoder)?;
    Ok(encoder.finish())
}

/// Decode a record from a mapping; leftover keys become its extensions.
pub fn decode<T: Record>(map: Map) -> Result<T, SpecError> {
    let mut decoder = Decoder::new(map);
    let mut record = T::decode_fields(&mut decoder)?;
    *record.extensions_mut() = decoder.into_extensions();
    Ok(record)
}

/// Decode a record from an arbitrary value.
///
/// Anything other than an object fails with a type mismatch on the root
/// key `$`.
pub fn decode_value<T: Record>(value: Value) -> Result<T, SpecError> {
    match value {
        Value::Object(map) => decode(map),
        other => Err(SpecError::TypeMismatch {
            key: "$".to_string(),
            reason: format!("expected a mapping, found {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
