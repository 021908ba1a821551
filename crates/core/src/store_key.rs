//! StoreKey: hashable form of a document `_id`
//!
//! `_id` may be any value, including an embedded document or a float, neither
//! of which is `Hash`. The collection store keys documents by this canonical
//! representation instead:
//!
//! - embedded documents become key-sorted field lists, so `{a: 1, b: 2}` and
//!   `{b: 2, a: 1}` address the same document
//! - integral floats collapse onto the integer key (`1.0` and `1` are the
//!   same id, as they are equal values)
//! - other floats hash by bit pattern, with `-0.0` folded into `0.0`

use crate::document::Document;
use crate::oid::ObjectId;
use crate::value::Value;

/// Canonical, hashable identifier of a stored document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Null id
    Null,
    /// Boolean id
    Bool(bool),
    /// Integer id (also integral floats)
    Int(i64),
    /// Non-integral float id, by bit pattern
    Float(u64),
    /// String id
    String(String),
    /// Array id
    Array(Vec<StoreKey>),
    /// Embedded document id, fields sorted by name
    Document(Vec<(String, StoreKey)>),
    /// Binary id
    Binary(u8, Vec<u8>),
    /// ObjectId id
    ObjectId(ObjectId),
    /// Datetime id, milliseconds since epoch
    DateTime(i64),
    /// Regex id
    Regex(String, String),
    /// Timestamp id
    Timestamp(u32, u32),
    /// MinKey id
    MinKey,
    /// MaxKey id
    MaxKey,
}

impl StoreKey {
    /// Build the store key for an `_id` value
    pub fn from_id(id: &Value) -> Self {
        match id {
            Value::Null => StoreKey::Null,
            Value::Bool(b) => StoreKey::Bool(*b),
            Value::Int(i) => StoreKey::Int(*i),
            Value::Float(f) => float_key(*f),
            Value::String(s) => StoreKey::String(s.clone()),
            Value::Array(items) => StoreKey::Array(items.iter().map(StoreKey::from_id).collect()),
            Value::Document(doc) => StoreKey::from_document(doc),
            Value::Binary { subtype, bytes } => StoreKey::Binary(*subtype, bytes.clone()),
            Value::ObjectId(oid) => StoreKey::ObjectId(*oid),
            Value::DateTime(dt) => StoreKey::DateTime(dt.timestamp_millis()),
            Value::Regex { pattern, options } => StoreKey::Regex(pattern.clone(), options.clone()),
            Value::Timestamp { time, increment } => StoreKey::Timestamp(*time, *increment),
            Value::MinKey => StoreKey::MinKey,
            Value::MaxKey => StoreKey::MaxKey,
        }
    }

    /// Build the key for a mapping-valued `_id`
    pub fn from_document(doc: &Document) -> Self {
        let mut fields: Vec<(String, StoreKey)> = doc
            .iter()
            .map(|(k, v)| (k.clone(), StoreKey::from_id(v)))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        StoreKey::Document(fields)
    }
}

fn float_key(f: f64) -> StoreKey {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return StoreKey::Int(f as i64);
    }
    let normalized = if f == 0.0 { 0.0 } else { f };
    StoreKey::Float(normalized.to_bits())
}

impl From<&Value> for StoreKey {
    fn from(id: &Value) -> Self {
        StoreKey::from_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_document_ids_ignore_field_order() {
        let a = Value::Document(doc! { "a" => 1, "b" => 2 });
        let b = Value::Document(doc! { "b" => 2, "a" => 1 });
        assert_eq!(StoreKey::from_id(&a), StoreKey::from_id(&b));
    }

    #[test]
    fn test_integral_float_matches_int() {
        assert_eq!(
            StoreKey::from_id(&Value::Float(3.0)),
            StoreKey::from_id(&Value::Int(3))
        );
        assert_ne!(
            StoreKey::from_id(&Value::Float(3.5)),
            StoreKey::from_id(&Value::Int(3))
        );
    }

    #[test]
    fn test_keys_usable_in_hash_set() {
        let mut set = HashSet::new();
        set.insert(StoreKey::from_id(&Value::Document(doc! { "k" => "v" })));
        assert!(set.contains(&StoreKey::from_id(&Value::Document(doc! { "k" => "v" }))));
        assert!(!set.contains(&StoreKey::from_id(&Value::String("v".into()))));
    }

    proptest! {
        #[test]
        fn prop_equal_ints_give_equal_keys(i in any::<i32>()) {
            prop_assert_eq!(
                StoreKey::from_id(&Value::Int(i64::from(i))),
                StoreKey::from_id(&Value::Float(f64::from(i)))
            );
        }
    }
}
