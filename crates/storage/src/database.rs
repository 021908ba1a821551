//! Database: synchronous access to the collections of one database

use std::sync::Arc;

use tracing::debug;

use crate::collection::Collection;
use crate::store::{DatabaseStore, ServerStore};

/// Handle to a named database
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    store: Arc<DatabaseStore>,
}

impl Database {
    /// Open (or create) the database `name` on a server store
    pub fn open(server: &ServerStore, name: &str) -> Self {
        Self {
            name: name.to_string(),
            store: server.database(name),
        }
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle to the collection `name`
    ///
    /// Does not create the collection; it appears on first insert.
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(&self.name, name, Arc::clone(&self.store))
    }

    /// Names of collections that currently exist, sorted
    pub fn list_collection_names(&self) -> Vec<String> {
        self.store.collection_names()
    }

    /// Drop a collection and all its documents
    ///
    /// Returns `true` if the collection existed.
    pub fn drop_collection(&self, name: &str) -> bool {
        let existed = self.store.drop_collection(name);
        debug!(target: "mockmongo::storage", database = %self.name, collection = name, existed, "Collection dropped");
        existed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockmongo_core::doc;

    #[test]
    fn test_collection_listed_after_first_insert() {
        let server = ServerStore::new();
        let db = Database::open(&server, "app");
        let widgets = db.collection("widgets");
        assert!(db.list_collection_names().is_empty());

        widgets.insert_one(doc! { "_id" => 1 }).unwrap();
        assert_eq!(db.list_collection_names(), vec!["widgets".to_string()]);
    }

    #[test]
    fn test_drop_collection_removes_documents() {
        let server = ServerStore::new();
        let db = Database::open(&server, "app");
        db.collection("a").insert_one(doc! { "_id" => 1 }).unwrap();
        db.collection("b").insert_one(doc! { "_id" => 1 }).unwrap();

        assert!(db.drop_collection("a"));
        assert_eq!(db.list_collection_names(), vec!["b".to_string()]);
        assert_eq!(db.collection("a").estimated_document_count(), 0);
    }

    #[test]
    fn test_handles_share_state() {
        let server = ServerStore::new();
        let first = Database::open(&server, "app");
        let second = Database::open(&server, "app");
        first.collection("c").insert_one(doc! { "_id" => 1 }).unwrap();
        assert_eq!(second.collection("c").estimated_document_count(), 1);
    }
}
