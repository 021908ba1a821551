//! Async client: entry point to an in-memory server

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mockmongo_storage::{Database, ServerStore};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::database::AsyncDatabase;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Client connected to its own in-memory server
///
/// Every client owns a fresh, empty server. Database facades are cached
/// per name.
#[derive(Debug)]
pub struct AsyncClient {
    connection_id: u64,
    server: ServerStore,
    databases: Mutex<FxHashMap<String, Arc<AsyncDatabase>>>,
}

impl AsyncClient {
    /// Connect to a new, empty server
    pub fn new() -> Self {
        let connection_id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
        debug!(target: "mockmongo::api", connection_id, "Client created");
        Self {
            connection_id,
            server: ServerStore::new(),
            databases: Mutex::new(FxHashMap::default()),
        }
    }

    /// Connection id reported in raw command results
    pub fn connection_id(&self) -> u64 {
        self.connection_id
    }

    /// The database facade for `name`, created on first use
    pub fn database(&self, name: &str) -> Arc<AsyncDatabase> {
        let mut databases = self.databases.lock();
        if let Some(existing) = databases.get(name) {
            return Arc::clone(existing);
        }
        let created = Arc::new(AsyncDatabase::new(
            Database::open(&self.server, name),
            self.connection_id,
        ));
        databases.insert(name.to_string(), Arc::clone(&created));
        created
    }

    /// Names of databases on the server, sorted
    pub fn database_names(&self) -> Vec<String> {
        self.server.database_names()
    }
}

impl Default for AsyncClient {
    fn default() -> Self {
        Self::new()
    }
}
