//! Filter matching
//!
//! Implements the subset of the query language the fixtures and their tests
//! need. This is not a query engine: no regex evaluation, no `$elemMatch`,
//! no projection.
//!
//! ## Supported
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{field: value}` | equality; an array field also matches if it contains `value`; a missing field matches `null` |
//! | `{"a.b.0": value}` | dotted paths through documents and arrays |
//! | `$eq`, `$ne` | (in)equality, same rules as above |
//! | `$gt`, `$gte`, `$lt`, `$lte` | ordering within one type bracket |
//! | `$in`, `$nin` | membership in an array of values |
//! | `$exists` | field presence |
//! | `$and`, `$or`, `$nor` | logical combinations of sub-filters |
//!
//! Anything else starting with `$` is `Error::NotImplemented`.

use std::cmp::Ordering;

use mockmongo_core::{Document, Error, Result, Value};

/// Test whether `doc` satisfies `filter`
pub fn matches(doc: &Document, filter: &Document) -> Result<bool> {
    for (key, condition) in filter.iter() {
        let ok = match key.as_str() {
            "$and" => sub_filters(key, condition)?
                .iter()
                .try_fold(true, |acc, f| Ok::<_, Error>(acc && matches(doc, f)?))?,
            "$or" => {
                let mut any = false;
                for f in sub_filters(key, condition)? {
                    if matches(doc, f)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            "$nor" => {
                let mut none = true;
                for f in sub_filters(key, condition)? {
                    if matches(doc, f)? {
                        none = false;
                        break;
                    }
                }
                none
            }
            op if op.starts_with('$') => {
                return Err(Error::not_implemented(
                    "filter",
                    format!("top-level operator {} is not supported", op),
                ))
            }
            path => matches_condition(&resolve_path(doc, path), condition)?,
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn sub_filters<'a>(op: &str, condition: &'a Value) -> Result<Vec<&'a Document>> {
    let items = condition.as_array().ok_or_else(|| {
        Error::InvalidOperation(format!("{} argument must be an array", op))
    })?;
    if items.is_empty() {
        return Err(Error::InvalidOperation(format!(
            "{} argument must be a non-empty array",
            op
        )));
    }
    items
        .iter()
        .map(|item| {
            item.as_document().ok_or_else(|| {
                Error::InvalidOperation(format!("{} entries must be documents", op))
            })
        })
        .collect()
}

/// Whether `condition` is an operator document (`{"$gt": 3, ...}`)
pub(crate) fn is_operator_document(condition: &Value) -> bool {
    match condition {
        Value::Document(d) => d.keys().next().map_or(false, |k| k.starts_with('$')),
        _ => false,
    }
}

fn matches_condition(candidates: &[&Value], condition: &Value) -> Result<bool> {
    let ops = match condition {
        Value::Document(d) if is_operator_document(condition) => d,
        _ => return Ok(equals_any(candidates, condition)),
    };
    for (op, arg) in ops.iter() {
        let ok = match op.as_str() {
            "$eq" => equals_any(candidates, arg),
            "$ne" => !equals_any(candidates, arg),
            "$gt" => compares_any(candidates, arg, |o| o == Ordering::Greater),
            "$gte" => compares_any(candidates, arg, |o| o != Ordering::Less),
            "$lt" => compares_any(candidates, arg, |o| o == Ordering::Less),
            "$lte" => compares_any(candidates, arg, |o| o != Ordering::Greater),
            "$in" => in_any(candidates, op, arg)?,
            "$nin" => !in_any(candidates, op, arg)?,
            "$exists" => {
                let wanted = match arg {
                    Value::Bool(b) => *b,
                    other => other.as_f64().map_or(!other.is_null(), |n| n != 0.0),
                };
                candidates.is_empty() != wanted
            }
            other if other.starts_with('$') => {
                return Err(Error::not_implemented(
                    "filter",
                    format!("operator {} is not supported", other),
                ))
            }
            other => {
                return Err(Error::InvalidOperation(format!(
                    "cannot mix operators and field {} in one condition",
                    other
                )))
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Equality with array containment; a missing field equals `null`
fn equals_any(candidates: &[&Value], wanted: &Value) -> bool {
    if candidates.is_empty() {
        return wanted.is_null();
    }
    candidates.iter().any(|c| {
        *c == wanted
            || match c {
                Value::Array(items) => items.iter().any(|item| item == wanted),
                _ => false,
            }
    })
}

fn compares_any(candidates: &[&Value], bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    let check = |v: &Value| v.compare(bound).map_or(false, &accept);
    candidates.iter().any(|c| match c {
        Value::Array(items) if !matches!(bound, Value::Array(_)) => items.iter().any(|v| check(v)),
        other => check(*other),
    })
}

fn in_any(candidates: &[&Value], op: &str, arg: &Value) -> Result<bool> {
    let values = arg
        .as_array()
        .ok_or_else(|| Error::InvalidOperation(format!("{} needs an array", op)))?;
    Ok(values.iter().any(|v| equals_any(candidates, v)))
}

/// Collect the values a dotted path reaches
///
/// A non-numeric segment applied to an array fans out over the array's
/// embedded documents, so `{"items.sku": "a"}` matches any item.
pub fn resolve_path<'a>(doc: &'a Document, path: &str) -> Vec<&'a Value> {
    let mut parts = path.split('.');
    let first = match parts.next().and_then(|p| doc.get(p)) {
        Some(v) => v,
        None => return Vec::new(),
    };
    let mut current = vec![first];
    for part in parts {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Document(d) => next.extend(d.get(part)),
                Value::Array(items) => match part.parse::<usize>() {
                    Ok(index) => next.extend(items.get(index)),
                    Err(_) => next.extend(
                        items
                            .iter()
                            .filter_map(Value::as_document)
                            .filter_map(|d| d.get(part)),
                    ),
                },
                _ => {}
            }
        }
        current = next;
    }
    current
}
