//! Update application for `update_one`
//!
//! An update document is either a set of operators (`$set`, `$unset`,
//! `$inc`) keyed by dotted paths, or a replacement document. Replacement
//! keeps the stored `_id`; trying to change it is an error, as is mixing
//! operators with plain fields.

use mockmongo_core::{Document, Error, Result, Value, ID_FIELD};

/// Most `null` elements a positional `$set` may append to reach its index
const MAX_ARRAY_PADDING: usize = 1_500_000;

/// Apply `update` to `doc` in place
///
/// Returns whether the document changed.
pub fn apply_update(doc: &mut Document, update: &Document) -> Result<bool> {
    let before = doc.clone();
    if is_operator_update(update)? {
        for (op, fields) in update.iter() {
            let fields = fields.as_document().ok_or_else(|| {
                Error::InvalidOperation(format!("{} argument must be a document", op))
            })?;
            for (path, arg) in fields.iter() {
                if path == ID_FIELD && op != "$inc" {
                    check_id_unchanged(doc, Some(arg))?;
                }
                match op.as_str() {
                    "$set" => set_path(doc, path, arg.clone())?,
                    "$unset" => {
                        if path == ID_FIELD {
                            return Err(Error::InvalidOperation(
                                "cannot $unset the _id field".to_string(),
                            ));
                        }
                        unset_path(doc, path);
                    }
                    "$inc" => inc_path(doc, path, arg)?,
                    other => {
                        return Err(Error::not_implemented(
                            "update",
                            format!("update operator {} is not supported", other),
                        ))
                    }
                }
            }
        }
    } else {
        check_id_unchanged(doc, update.id())?;
        let id = doc.id().cloned();
        let mut replacement = update.clone();
        if let Some(id) = id {
            replacement.insert_first(ID_FIELD, id);
        }
        *doc = replacement;
    }
    Ok(*doc != before)
}

/// Whether the update is an operator update
///
/// # Errors
/// `InvalidOperation` when operators and plain fields are mixed.
pub fn is_operator_update(update: &Document) -> Result<bool> {
    let operators = update.keys().filter(|k| k.starts_with('$')).count();
    if operators > 0 && operators != update.len() {
        return Err(Error::InvalidOperation(
            "update document mixes operators and plain fields".to_string(),
        ));
    }
    Ok(operators > 0)
}

fn check_id_unchanged(doc: &Document, new_id: Option<&Value>) -> Result<()> {
    match (doc.id(), new_id) {
        (Some(current), Some(new)) if current != new => Err(Error::InvalidOperation(
            "the _id field cannot be changed".to_string(),
        )),
        _ => Ok(()),
    }
}

fn set_path(doc: &mut Document, path: &str, value: Value) -> Result<()> {
    match path.split_once('.') {
        None => {
            doc.insert(path, value);
            Ok(())
        }
        Some((head, rest)) => {
            if doc.get(head).is_none() {
                doc.insert(head, Document::new());
            }
            match doc.get_mut(head) {
                Some(child) => set_in_value(child, rest, value),
                None => Ok(()),
            }
        }
    }
}

fn set_in_value(target: &mut Value, path: &str, value: Value) -> Result<()> {
    match target {
        Value::Document(doc) => set_path(doc, path, value),
        Value::Array(items) => {
            let (head, rest) = match path.split_once('.') {
                Some((h, r)) => (h, Some(r)),
                None => (path, None),
            };
            let index = head.parse::<usize>().map_err(|_| {
                Error::InvalidOperation(format!("cannot use '{}' to index an array", head))
            })?;
            if index >= items.len() {
                if index - items.len() > MAX_ARRAY_PADDING {
                    return Err(Error::InvalidOperation(format!(
                        "cannot pad array of length {} to index {}",
                        items.len(),
                        index
                    )));
                }
                items.resize(index + 1, Value::Null);
            }
            match rest {
                None => {
                    items[index] = value;
                    Ok(())
                }
                Some(rest) => {
                    if items[index].is_null() {
                        items[index] = Value::Document(Document::new());
                    }
                    set_in_value(&mut items[index], rest, value)
                }
            }
        }
        other => Err(Error::InvalidOperation(format!(
            "cannot create field in element of type {}",
            other.type_name()
        ))),
    }
}

fn unset_path(doc: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            doc.remove(path);
        }
        Some((head, rest)) => match doc.get_mut(head) {
            Some(Value::Document(child)) => unset_path(child, rest),
            Some(Value::Array(items)) => {
                let (index, tail) = match rest.split_once('.') {
                    Some((i, t)) => (i, Some(t)),
                    None => (rest, None),
                };
                if let Ok(i) = index.parse::<usize>() {
                    match (items.get_mut(i), tail) {
                        // unsetting an array element nulls it, arrays keep their length
                        (Some(slot), None) => *slot = Value::Null,
                        (Some(Value::Document(child)), Some(tail)) => unset_path(child, tail),
                        _ => {}
                    }
                }
            }
            _ => {}
        },
    }
}

fn inc_path(doc: &mut Document, path: &str, delta: &Value) -> Result<()> {
    if delta.as_f64().is_none() {
        return Err(Error::InvalidOperation(format!(
            "cannot increment with non-numeric argument of type {}",
            delta.type_name()
        )));
    }
    let current = doc.get_path(path).cloned();
    let updated = match (current, delta) {
        (None, d) => d.clone(),
        (Some(Value::Int(a)), Value::Int(b)) => Value::Int(a.checked_add(*b).ok_or_else(|| {
            Error::InvalidOperation(format!("integer overflow incrementing {}", path))
        })?),
        (Some(a), b) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Value::Float(x + y),
            _ => {
                return Err(Error::InvalidOperation(format!(
                    "cannot apply $inc to a value of type {}",
                    a.type_name()
                )))
            }
        },
    };
    set_path(doc, path, updated)
}
