//! Value types for mockmongo
//!
//! This module defines `Value`, the closed enum of everything a document
//! field can hold. It covers the JSON-native types plus the
//! database-specific types that extended JSON can encode (dates, binary,
//! ObjectIds, regular expressions, timestamps, min/max keys).
//!
//! ## Equality
//!
//! - Numbers compare by numeric value: `Int(1) == Float(1.0)`, matching how
//!   the database compares numbers inside queries
//! - Every other pair of different variants is never equal
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Documents compare without regard to key order

use crate::document::Document;
use crate::oid::ObjectId;
use chrono::{DateTime, TimeZone, Utc};
use std::cmp::Ordering;

/// Binary subtype for generic bytes
pub const BINARY_SUBTYPE_GENERIC: u8 = 0x00;
/// Binary subtype for RFC 4122 UUIDs
pub const BINARY_SUBTYPE_UUID: u8 = 0x04;

/// A single document field value
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer (covers both int32 and int64)
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Embedded document
    Document(Document),
    /// Binary data with its subtype
    Binary {
        /// Binary subtype (0x00 generic, 0x04 UUID, ...)
        subtype: u8,
        /// Raw bytes
        bytes: Vec<u8>,
    },
    /// 12-byte object identifier
    ObjectId(ObjectId),
    /// UTC datetime, stored at millisecond precision
    DateTime(DateTime<Utc>),
    /// Regular expression
    Regex {
        /// Pattern source
        pattern: String,
        /// Option flags (e.g. "i", "ms")
        options: String,
    },
    /// Internal replication timestamp
    Timestamp {
        /// Seconds since epoch
        time: u32,
        /// Ordinal within the second
        increment: u32,
    },
    /// Compares lower than every other value
    MinKey,
    /// Compares higher than every other value
    MaxKey,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            (
                Value::Binary {
                    subtype: sa,
                    bytes: ba,
                },
                Value::Binary {
                    subtype: sb,
                    bytes: bb,
                },
            ) => sa == sb && ba == bb,
            (Value::ObjectId(a), Value::ObjectId(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (
                Value::Regex {
                    pattern: pa,
                    options: oa,
                },
                Value::Regex {
                    pattern: pb,
                    options: ob,
                },
            ) => pa == pb && oa == ob,
            (
                Value::Timestamp {
                    time: ta,
                    increment: ia,
                },
                Value::Timestamp {
                    time: tb,
                    increment: ib,
                },
            ) => ta == tb && ia == ib,
            (Value::MinKey, Value::MinKey) => true,
            (Value::MaxKey, Value::MaxKey) => true,
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "long",
            Value::Float(_) => "double",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Document(_) => "object",
            Value::Binary { .. } => "binData",
            Value::ObjectId(_) => "objectId",
            Value::DateTime(_) => "date",
            Value::Regex { .. } => "regex",
            Value::Timestamp { .. } => "timestamp",
            Value::MinKey => "minKey",
            Value::MaxKey => "maxKey",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is an embedded document
    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is any numeric value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &Document if this is an embedded document
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Get as a datetime if this is a DateTime value
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Get as an ObjectId if this is an ObjectId value
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(oid) => Some(*oid),
            _ => None,
        }
    }

    /// Position of this value's type in the database's cross-type sort order
    ///
    /// Values of different brackets never satisfy range operators.
    pub fn type_bracket(&self) -> u8 {
        match self {
            Value::MinKey => 0,
            Value::Null => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::Document(_) => 4,
            Value::Array(_) => 5,
            Value::Binary { .. } => 6,
            Value::ObjectId(_) => 7,
            Value::Bool(_) => 8,
            Value::DateTime(_) => 9,
            Value::Timestamp { .. } => 10,
            Value::Regex { .. } => 11,
            Value::MaxKey => 12,
        }
    }

    /// Order two values of the same type bracket
    ///
    /// Returns `None` for values in different brackets, for NaN, and for
    /// arrays/documents that are not equal (no range ordering is defined
    /// for them here).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        if self.type_bracket() != other.type_bracket() {
            return None;
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (a, b) if a.type_bracket() == 2 => a.as_f64()?.partial_cmp(&b.as_f64()?),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::ObjectId(a), Value::ObjectId(b)) => Some(a.cmp(b)),
            (
                Value::Timestamp {
                    time: ta,
                    increment: ia,
                },
                Value::Timestamp {
                    time: tb,
                    increment: ib,
                },
            ) => Some((ta, ia).cmp(&(tb, ib))),
            (
                Value::Binary {
                    subtype: sa,
                    bytes: ba,
                },
                Value::Binary {
                    subtype: sb,
                    bytes: bb,
                },
            ) => Some((ba.len(), sa, ba).cmp(&(bb.len(), sb, bb))),
            (Value::Null, Value::Null) | (Value::MinKey, Value::MinKey) => Some(Ordering::Equal),
            (Value::MaxKey, Value::MaxKey) => Some(Ordering::Equal),
            (a, b) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }

    /// Drop sub-millisecond precision from every datetime in this value
    ///
    /// The database stores datetimes with millisecond precision, so values
    /// are normalised on insert and in filters.
    pub fn truncate_datetimes(&mut self) {
        match self {
            Value::DateTime(dt) => *dt = truncate_to_millis(dt),
            Value::Array(items) => items.iter_mut().for_each(Value::truncate_datetimes),
            Value::Document(doc) => doc.truncate_datetimes(),
            _ => {}
        }
    }
}

/// Truncate a datetime to millisecond precision
pub fn truncate_to_millis(dt: &DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(dt.timestamp_millis())
        .single()
        .unwrap_or(*dt)
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<Document> for Value {
    fn from(d: Document) -> Self {
        Value::Document(d)
    }
}

impl From<ObjectId> for Value {
    fn from(oid: ObjectId) -> Self {
        Value::ObjectId(oid)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

// ============================================================================
// serde_json interop (plain JSON, no extended type decoding)
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64::MAX and real numbers
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Document(
                obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}
