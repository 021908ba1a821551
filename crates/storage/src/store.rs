//! In-memory stores backing clients, databases and collections
//!
//! Ownership is strictly hierarchical:
//!
//! ```text
//! ServerStore ── name → DatabaseStore ── name → CollectionStore ── StoreKey → Document
//! ```
//!
//! A collection store exists only once something has been inserted into it
//! and disappears when the collection is dropped; `list_collection_names`
//! reports exactly the collections that currently hold a store.
//!
//! All maps are guarded by `parking_lot::RwLock`. Operations take the lock
//! for their whole duration, so each one is atomic with respect to others.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockmongo_core::{Document, StoreKey};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Shared handle to a collection store
pub type SharedCollectionStore = Arc<RwLock<CollectionStore>>;

/// Documents of one collection, in insertion order
#[derive(Debug, Default)]
pub struct CollectionStore {
    /// StoreKey → (insertion sequence, document)
    docs: FxHashMap<StoreKey, (u64, Document)>,
    /// Insertion sequence → StoreKey, for ordered iteration
    order: BTreeMap<u64, StoreKey>,
    next_seq: u64,
}

impl CollectionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Whether a document with this key exists
    pub fn contains(&self, key: &StoreKey) -> bool {
        self.docs.contains_key(key)
    }

    /// Insert a new document
    ///
    /// Returns `false` (and stores nothing) if the key is already taken.
    pub fn insert(&mut self, key: StoreKey, document: Document) -> bool {
        if self.docs.contains_key(&key) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.clone());
        self.docs.insert(key, (seq, document));
        true
    }

    /// Replace the document stored under an existing key, keeping its position
    pub fn replace(&mut self, key: &StoreKey, document: Document) -> bool {
        match self.docs.get_mut(key) {
            Some(slot) => {
                slot.1 = document;
                true
            }
            None => false,
        }
    }

    /// Get a document by key
    pub fn get(&self, key: &StoreKey) -> Option<&Document> {
        self.docs.get(key).map(|(_, doc)| doc)
    }

    /// Remove a document by key
    pub fn remove(&mut self, key: &StoreKey) -> Option<Document> {
        let (seq, doc) = self.docs.remove(key)?;
        self.order.remove(&seq);
        Some(doc)
    }

    /// Iterate documents in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&StoreKey, &Document)> {
        self.order
            .values()
            .filter_map(move |key| self.docs.get(key).map(|(_, doc)| (key, doc)))
    }
}

/// Collections of one database
#[derive(Debug, Default)]
pub struct DatabaseStore {
    collections: RwLock<BTreeMap<String, SharedCollectionStore>>,
}

impl DatabaseStore {
    /// Create an empty database store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an existing collection store
    pub fn collection(&self, name: &str) -> Option<SharedCollectionStore> {
        self.collections.read().get(name).cloned()
    }

    /// Get a collection store, creating it if needed
    pub fn collection_or_create(&self, name: &str) -> SharedCollectionStore {
        if let Some(store) = self.collection(name) {
            return store;
        }
        let mut collections = self.collections.write();
        Arc::clone(
            collections
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(RwLock::new(CollectionStore::new()))),
        )
    }

    /// Names of existing collections, sorted
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }

    /// Remove a collection store
    ///
    /// Returns `true` if the collection existed.
    pub fn drop_collection(&self, name: &str) -> bool {
        self.collections.write().remove(name).is_some()
    }
}

/// Databases of one client
#[derive(Debug, Default)]
pub struct ServerStore {
    databases: RwLock<FxHashMap<String, Arc<DatabaseStore>>>,
}

impl ServerStore {
    /// Create an empty server store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a database store, creating it if needed
    pub fn database(&self, name: &str) -> Arc<DatabaseStore> {
        if let Some(db) = self.databases.read().get(name) {
            return Arc::clone(db);
        }
        let mut databases = self.databases.write();
        Arc::clone(
            databases
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(DatabaseStore::new())),
        )
    }

    /// Names of databases that have been accessed, sorted
    pub fn database_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.read().keys().cloned().collect();
        names.sort();
        names
    }
}
