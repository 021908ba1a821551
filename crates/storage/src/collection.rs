//! Collection: synchronous operations on one named collection
//!
//! A `Collection` is a cheap handle (names plus a shared database store).
//! The collection's document store is created on first insert, so merely
//! obtaining a handle does not make the collection appear in
//! `list_collection_names`.
//!
//! Every operation holds the collection lock for its whole duration and is
//! therefore atomic with respect to other operations.

use std::sync::Arc;

use mockmongo_core::{Document, Error, ObjectId, Result, StoreKey, Value, ID_FIELD};
use tracing::debug;

use crate::matcher::{is_operator_document, matches};
use crate::results::{InsertManyResult, InsertOneResult, UpdateResult};
use crate::store::DatabaseStore;
use crate::update::apply_update;

/// Handle to a named collection
#[derive(Debug, Clone)]
pub struct Collection {
    database: String,
    name: String,
    store: Arc<DatabaseStore>,
}

impl Collection {
    pub(crate) fn new(database: &str, name: &str, store: Arc<DatabaseStore>) -> Self {
        Self {
            database: database.to_string(),
            name: name.to_string(),
            store,
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning database
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// `<database>.<collection>`
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }

    /// Insert one document
    ///
    /// A missing `_id` is filled with a fresh `ObjectId`, placed first.
    /// Datetimes are truncated to millisecond precision.
    ///
    /// # Errors
    /// - `DuplicateKey` if a document with the same `_id` exists
    /// - `InvalidDocument` if `_id` is an array or a regex
    pub fn insert_one(&self, document: Document) -> Result<InsertOneResult> {
        let (key, document) = prepare_insert(document)?;
        let inserted_id = document.id().cloned().unwrap_or(Value::Null);

        let store = self.store.collection_or_create(&self.name);
        if !store.write().insert(key, document) {
            return Err(Error::DuplicateKey(format!(
                "E11000 duplicate key error collection: {} index: _id_ dup key: {{ _id: {:?} }}",
                self.full_name(),
                inserted_id
            )));
        }
        debug!(target: "mockmongo::storage", collection = %self.full_name(), "Document inserted");
        Ok(InsertOneResult { inserted_id })
    }

    /// Insert documents in order, stopping at the first failure
    pub fn insert_many(&self, documents: Vec<Document>) -> Result<InsertManyResult> {
        let mut inserted_ids = Vec::with_capacity(documents.len());
        for document in documents {
            inserted_ids.push(self.insert_one(document)?.inserted_id);
        }
        Ok(InsertManyResult { inserted_ids })
    }

    /// Find all documents matching `filter`, in insertion order
    pub fn find(&self, filter: Document) -> Result<Cursor> {
        let mut filter = filter;
        filter.truncate_datetimes();

        let store = match self.store.collection(&self.name) {
            Some(store) => store,
            None => return Ok(Cursor::empty()),
        };
        let guard = store.read();

        if let Some(key) = id_lookup(&filter) {
            return Ok(Cursor::new(guard.get(&key).cloned().into_iter().collect()));
        }

        let mut found = Vec::new();
        for (_, doc) in guard.iter() {
            if matches(doc, &filter)? {
                found.push(doc.clone());
            }
        }
        Ok(Cursor::new(found))
    }

    /// Count documents matching `filter`
    pub fn count_documents(&self, filter: Document) -> Result<u64> {
        Ok(self.find(filter)?.remaining() as u64)
    }

    /// Number of documents in the collection
    pub fn estimated_document_count(&self) -> u64 {
        self.store
            .collection(&self.name)
            .map_or(0, |store| store.read().len() as u64)
    }

    /// Update the first document matching `filter`
    ///
    /// With `upsert`, a missing match inserts a document built from the
    /// filter's equality fields with the update applied.
    pub fn update_one(&self, filter: Document, update: Document, upsert: bool) -> Result<UpdateResult> {
        let mut filter = filter;
        filter.truncate_datetimes();
        let mut update = update;
        update.truncate_datetimes();

        if let Some(store) = self.store.collection(&self.name) {
            let mut guard = store.write();
            let mut target = None;
            for (key, doc) in guard.iter() {
                if matches(doc, &filter)? {
                    target = Some((key.clone(), doc.clone()));
                    break;
                }
            }
            if let Some((key, mut doc)) = target {
                let modified = apply_update(&mut doc, &update)?;
                if modified {
                    guard.replace(&key, doc);
                }
                debug!(target: "mockmongo::storage", collection = %self.full_name(), modified, "Document updated");
                return Ok(UpdateResult {
                    matched_count: 1,
                    modified_count: u64::from(modified),
                    upserted_id: None,
                });
            }
        }

        if !upsert {
            return Ok(UpdateResult {
                matched_count: 0,
                modified_count: 0,
                upserted_id: None,
            });
        }

        let mut seed = Document::new();
        for (field, value) in filter.iter() {
            if !field.starts_with('$') && !field.contains('.') && !is_operator_document(value) {
                seed.insert(field.clone(), value.clone());
            }
        }
        apply_update(&mut seed, &update)?;
        let inserted = self.insert_one(seed)?;
        Ok(UpdateResult {
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(inserted.inserted_id),
        })
    }

    /// Remove one document from the store by key
    ///
    /// Low-level access for delete operations implemented by the facades.
    pub fn remove(&self, key: &StoreKey) -> Option<Document> {
        let store = self.store.collection(&self.name)?;
        let removed = store.write().remove(key);
        if removed.is_some() {
            debug!(target: "mockmongo::storage", collection = %self.full_name(), "Document removed");
        }
        removed
    }
}

/// Assign `_id` if missing, validate it, normalise datetimes
fn prepare_insert(mut document: Document) -> Result<(StoreKey, Document)> {
    match document.id() {
        None => document.insert_first(ID_FIELD, ObjectId::new()),
        Some(Value::Array(_)) => {
            return Err(Error::InvalidDocument(
                "can't use an array for _id".to_string(),
            ))
        }
        Some(Value::Regex { .. }) => {
            return Err(Error::InvalidDocument("can't use a regex for _id".to_string()))
        }
        Some(_) => {}
    }
    document.truncate_datetimes();
    let key = StoreKey::from_id(document.id().unwrap_or(&Value::Null));
    Ok((key, document))
}

/// `{_id: <plain value>}` filters can be answered from the store directly
fn id_lookup(filter: &Document) -> Option<StoreKey> {
    if filter.len() != 1 {
        return None;
    }
    match filter.id()? {
        id if is_operator_document(id) => None,
        Value::Array(_) => None,
        id => Some(StoreKey::from_id(id)),
    }
}

/// Result set of a `find`
#[derive(Debug)]
pub struct Cursor {
    documents: std::vec::IntoIter<Document>,
}

impl Cursor {
    /// Cursor over the given documents
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: documents.into_iter(),
        }
    }

    /// Cursor with no results
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of documents not yet consumed
    pub fn remaining(&self) -> usize {
        self.documents.len()
    }
}

impl Iterator for Cursor {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        self.documents.next()
    }
}
