//! Extended JSON decoding and encoding
//!
//! Fixture files written as JSON cannot express dates, binary data or
//! ObjectIds natively. The database's extended JSON format wraps them in
//! single-purpose objects whose keys start with `$`; this module turns those
//! wrappers back into typed [`Value`]s (and writes them for test helpers).
//!
//! ## Recognised wrappers
//!
//! | Wrapper | Value |
//! |---------|-------|
//! | `{"$oid": "<24 hex>"}` | `ObjectId` |
//! | `{"$date": "<RFC 3339>"}`, `{"$date": <millis>}`, `{"$date": {"$numberLong": "<millis>"}}` | `DateTime` |
//! | `{"$numberInt": "<i32>"}`, `{"$numberLong": "<i64>"}` | `Int` |
//! | `{"$numberDouble": "<f64 \| Infinity \| -Infinity \| NaN>"}` | `Float` |
//! | `{"$binary": {"base64": .., "subType": "<hex>"}}`, `{"$binary": .., "$type": ..}` | `Binary` |
//! | `{"$uuid": "<hyphenated uuid>"}` | `Binary` subtype 4 |
//! | `{"$regularExpression": {"pattern": .., "options": ..}}`, `{"$regex": .., "$options": ..}` | `Regex` |
//! | `{"$timestamp": {"t": .., "i": ..}}` | `Timestamp` |
//! | `{"$minKey": 1}`, `{"$maxKey": 1}` | `MinKey`, `MaxKey` |
//! | `{"$undefined": true}` | `Null` |
//!
//! An object is only treated as a wrapper when its key set is exactly one of
//! the forms above; any other object is decoded as a plain document.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::oid::ObjectId;
use crate::value::{Value, BINARY_SUBTYPE_UUID};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Number, Value as Json};

/// Parse extended JSON text into a value
pub fn from_str(text: &str) -> Result<Value> {
    let json: Json = serde_json::from_str(text)?;
    decode(json)
}

/// Decode a parsed JSON tree, reconstructing extended types
pub fn decode(json: Json) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(b)),
        Json::Number(n) => Ok(number_value(&n)),
        Json::String(s) => Ok(Value::String(s)),
        Json::Array(items) => items
            .into_iter()
            .map(decode)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Json::Object(map) => decode_object(map),
    }
}

fn number_value(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

fn decode_object(mut map: Map<String, Json>) -> Result<Value> {
    if let Some(value) = decode_wrapper(&mut map)? {
        return Ok(value);
    }
    let mut doc = Document::new();
    for (key, value) in map {
        doc.insert(key, decode(value)?);
    }
    Ok(Value::Document(doc))
}

/// Decode `map` if it is one of the wrapper forms, consuming its fields
fn decode_wrapper(map: &mut Map<String, Json>) -> Result<Option<Value>> {
    let owned: Vec<String> = map.keys().cloned().collect();
    let keys: Vec<&str> = owned.iter().map(String::as_str).collect();
    let value = match keys.as_slice() {
        ["$oid"] => match map.remove("$oid") {
            Some(Json::String(digits)) => Value::ObjectId(ObjectId::parse_str(&digits)?),
            _ => return invalid("$oid must be a hex string"),
        },
        ["$date"] => Value::DateTime(decode_date(map.remove("$date"))?),
        ["$numberInt"] => match map.remove("$numberInt") {
            Some(Json::String(s)) => Value::Int(i64::from(parse_num::<i32>(&s, "$numberInt")?)),
            _ => return invalid("$numberInt must be a string"),
        },
        ["$numberLong"] => match map.remove("$numberLong") {
            Some(Json::String(s)) => Value::Int(parse_num::<i64>(&s, "$numberLong")?),
            _ => return invalid("$numberLong must be a string"),
        },
        ["$numberDouble"] => match map.remove("$numberDouble") {
            Some(Json::String(s)) => Value::Float(parse_double(&s)?),
            _ => return invalid("$numberDouble must be a string"),
        },
        ["$binary"] => match map.remove("$binary") {
            Some(Json::Object(mut inner)) => {
                let bytes = match inner.remove("base64") {
                    Some(Json::String(b64)) => decode_base64(&b64)?,
                    _ => return invalid("$binary.base64 must be a string"),
                };
                let subtype = match inner.remove("subType") {
                    Some(Json::String(digits)) => parse_subtype(&digits)?,
                    _ => return invalid("$binary.subType must be a hex string"),
                };
                Value::Binary { subtype, bytes }
            }
            _ => return invalid("$binary must be an object"),
        },
        ["$binary", "$type"] | ["$type", "$binary"] => {
            let bytes = match map.remove("$binary") {
                Some(Json::String(b64)) => decode_base64(&b64)?,
                _ => return invalid("legacy $binary must be a base64 string"),
            };
            let subtype = match map.remove("$type") {
                Some(Json::String(digits)) => parse_subtype(&digits)?,
                Some(Json::Number(n)) => n
                    .as_u64()
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| Error::Serialization("$type out of range".to_string()))?,
                _ => return invalid("$type must be a hex string or number"),
            };
            Value::Binary { subtype, bytes }
        }
        ["$uuid"] => match map.remove("$uuid") {
            Some(Json::String(s)) => {
                let uuid = uuid::Uuid::parse_str(&s)
                    .map_err(|e| Error::Serialization(format!("invalid $uuid '{}': {}", s, e)))?;
                Value::Binary {
                    subtype: BINARY_SUBTYPE_UUID,
                    bytes: uuid.as_bytes().to_vec(),
                }
            }
            _ => return invalid("$uuid must be a string"),
        },
        ["$regularExpression"] => match map.remove("$regularExpression") {
            Some(Json::Object(mut inner)) => {
                let pattern = take_string(&mut inner, "pattern")?;
                let options = take_string(&mut inner, "options")?;
                Value::Regex { pattern, options }
            }
            _ => return invalid("$regularExpression must be an object"),
        },
        ["$regex"] | ["$regex", "$options"] | ["$options", "$regex"]
            if map.get("$regex").map_or(false, Json::is_string) =>
        {
            let pattern = take_string(map, "$regex")?;
            let options = match map.remove("$options") {
                Some(Json::String(s)) => s,
                None => String::new(),
                _ => return invalid("$options must be a string"),
            };
            Value::Regex { pattern, options }
        }
        ["$timestamp"] => match map.remove("$timestamp") {
            Some(Json::Object(inner)) => {
                let time = inner.get("t").and_then(Json::as_u64);
                let increment = inner.get("i").and_then(Json::as_u64);
                match (time, increment) {
                    (Some(t), Some(i)) => Value::Timestamp {
                        time: u32::try_from(t).map_err(|_| overflow("$timestamp.t"))?,
                        increment: u32::try_from(i).map_err(|_| overflow("$timestamp.i"))?,
                    },
                    _ => return invalid("$timestamp needs integer t and i"),
                }
            }
            _ => return invalid("$timestamp must be an object"),
        },
        ["$minKey"] => Value::MinKey,
        ["$maxKey"] => Value::MaxKey,
        ["$undefined"] => Value::Null,
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn decode_date(raw: Option<Json>) -> Result<DateTime<Utc>> {
    let millis = match raw {
        Some(Json::String(s)) => {
            return DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Serialization(format!("invalid $date '{}': {}", s, e)));
        }
        Some(Json::Number(n)) => n
            .as_i64()
            .ok_or_else(|| Error::Serialization("$date must be integral milliseconds".into()))?,
        Some(Json::Object(mut inner)) if inner.len() == 1 => match inner.remove("$numberLong") {
            Some(Json::String(s)) => parse_num::<i64>(&s, "$date.$numberLong")?,
            _ => return invalid("$date object must be {\"$numberLong\": ..}"),
        },
        _ => return invalid("unsupported $date representation"),
    };
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| overflow("$date"))
}

fn parse_num<T: std::str::FromStr>(s: &str, what: &str) -> Result<T> {
    s.parse::<T>()
        .map_err(|_| Error::Serialization(format!("invalid {} '{}'", what, s)))
}

fn parse_double(s: &str) -> Result<f64> {
    match s {
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        other => parse_num::<f64>(other, "$numberDouble"),
    }
}

fn parse_subtype(digits: &str) -> Result<u8> {
    let padded;
    let digits = if digits.len() == 1 {
        padded = format!("0{}", digits);
        padded.as_str()
    } else {
        digits
    };
    let mut subtype = [0u8; 1];
    hex::decode_to_slice(digits, &mut subtype)
        .map_err(|e| Error::Serialization(format!("invalid binary subtype '{}': {}", digits, e)))?;
    Ok(subtype[0])
}

fn decode_base64(s: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|e| Error::Serialization(format!("invalid base64: {}", e)))
}

fn take_string(map: &mut Map<String, Json>, key: &str) -> Result<String> {
    match map.remove(key) {
        Some(Json::String(s)) => Ok(s),
        _ => Err(Error::Serialization(format!("{} must be a string", key))),
    }
}

fn invalid<T>(message: &str) -> Result<T> {
    Err(Error::Serialization(message.to_string()))
}

fn overflow(what: &str) -> Error {
    Error::Serialization(format!("{} out of range", what))
}

// ============================================================================
// Encoding (relaxed extended JSON)
// ============================================================================

/// Encode a value as relaxed extended JSON
pub fn encode(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => match Number::from_f64(*f) {
            Some(n) => Json::Number(n),
            None => wrap("$numberDouble", Json::String(non_finite_name(*f).to_string())),
        },
        Value::String(s) => Json::String(s.clone()),
        Value::Array(items) => Json::Array(items.iter().map(encode).collect()),
        Value::Document(doc) => encode_document(doc),
        Value::Binary { subtype, bytes } => {
            let mut inner = Map::new();
            inner.insert("base64".into(), Json::String(STANDARD.encode(bytes)));
            inner.insert("subType".into(), Json::String(hex::encode([*subtype])));
            wrap("$binary", Json::Object(inner))
        }
        Value::ObjectId(oid) => wrap("$oid", Json::String(oid.to_hex())),
        Value::DateTime(dt) => wrap(
            "$date",
            Json::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ),
        Value::Regex { pattern, options } => {
            let mut inner = Map::new();
            inner.insert("pattern".into(), Json::String(pattern.clone()));
            inner.insert("options".into(), Json::String(options.clone()));
            wrap("$regularExpression", Json::Object(inner))
        }
        Value::Timestamp { time, increment } => {
            let mut inner = Map::new();
            inner.insert("t".into(), Json::Number((*time).into()));
            inner.insert("i".into(), Json::Number((*increment).into()));
            wrap("$timestamp", Json::Object(inner))
        }
        Value::MinKey => wrap("$minKey", Json::Number(1.into())),
        Value::MaxKey => wrap("$maxKey", Json::Number(1.into())),
    }
}

/// Encode a document as relaxed extended JSON
pub fn encode_document(doc: &Document) -> Json {
    Json::Object(doc.iter().map(|(k, v)| (k.clone(), encode(v))).collect())
}

fn wrap(key: &str, inner: Json) -> Json {
    let mut map = Map::new();
    map.insert(key.to_string(), inner);
    Json::Object(map)
}

fn non_finite_name(f: f64) -> &'static str {
    if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}
