//! Async database facade

use std::sync::Arc;

use mockmongo_storage::Database;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::collection::AsyncCollection;
use crate::deferred_ops;

/// Awaitable view of one database
///
/// Collection facades are created on first request and cached, so asking
/// for the same name twice returns the same `Arc`.
#[derive(Debug)]
pub struct AsyncDatabase {
    inner: Database,
    connection_id: u64,
    collections: Mutex<FxHashMap<String, Arc<AsyncCollection>>>,
}

impl AsyncDatabase {
    pub(crate) fn new(inner: Database, connection_id: u64) -> Self {
        Self {
            inner,
            connection_id,
            collections: Mutex::new(FxHashMap::default()),
        }
    }

    /// Database name
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// The collection facade for `name`, created on first use
    pub fn collection(&self, name: &str) -> Arc<AsyncCollection> {
        let mut collections = self.collections.lock();
        if let Some(existing) = collections.get(name) {
            return Arc::clone(existing);
        }
        let created = Arc::new(AsyncCollection::new(
            self.inner.collection(name),
            self.connection_id,
        ));
        collections.insert(name.to_string(), Arc::clone(&created));
        created
    }

    /// Names of collections that currently hold documents, sorted
    pub fn list_collection_names(&self) -> Vec<String> {
        self.inner.list_collection_names()
    }

    /// Drop a collection; returns whether it existed
    ///
    /// Cached facades stay valid and see an empty collection.
    pub fn drop_collection(&self, name: &str) -> bool {
        self.inner.drop_collection(name)
    }

    /// The synchronous database handle
    pub fn sync(&self) -> &Database {
        &self.inner
    }
}

deferred_ops! {
    impl AsyncDatabase {
        /// Awaitable form of `list_collection_names`
        pub fn collection_names(&self) -> Vec<String> => list_collection_names;
    }
}
