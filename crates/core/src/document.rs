//! Document: an ordered mapping from field names to values
//!
//! Field order is preserved as inserted (the database keeps `_id` first and
//! returns fields in stored order), but equality ignores order: two documents
//! are equal when they hold the same fields with equal values.

use crate::value::Value;

/// Name of the identifier field
pub const ID_FIELD: &str = "_id";

/// Ordered field → value mapping
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get a mutable reference to a top-level field
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether a top-level field exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Set a field, keeping its position if it already exists
    ///
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Set a field at the front of the document
    ///
    /// Used to place a generated `_id` first, as the server does.
    pub fn insert_first(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.entries.retain(|(k, _)| *k != key);
        self.entries.insert(0, (key, value.into()));
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Iterate fields in stored order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterate field names in stored order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// The `_id` field, if present
    pub fn id(&self) -> Option<&Value> {
        self.get(ID_FIELD)
    }

    /// Resolve a dotted path (`a.b.0.c`) through embedded documents and arrays
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Document(doc) => doc.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Drop sub-millisecond precision from every datetime in the document
    pub fn truncate_datetimes(&mut self) {
        for (_, value) in self.entries.iter_mut() {
            value.truncate_datetimes();
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build a [`Document`] from `key => value` pairs
///
/// ```ignore
/// let d = doc! { "_id" => 1, "name" => "widget" };
/// ```
#[macro_export]
macro_rules! doc {
    () => { $crate::Document::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut document = $crate::Document::new();
        $( document.insert($key, $value); )+
        document
    }};
}
