//! Shared test utilities for the integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use mockmongo::{
    doc, extjson, AsyncClient, AsyncCollection, AsyncDatabase, DeleteOptions, Document,
    Error, FixtureCache, FixtureConfig, FixtureError, Markers, MongoFixture, RuntimeOptions,
    Value, DATABASE_NAME,
};
use tempfile::TempDir;

// ============================================================================
// FixtureDir - temporary directory of fixture files
// ============================================================================

/// Temporary fixture directory, removed on drop.
pub struct FixtureDir {
    pub dir: TempDir,
}

impl FixtureDir {
    /// Create an empty fixture directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a fixture file and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    /// Write `documents` as an extended-JSON fixture file.
    pub fn write_json(&self, name: &str, documents: &[Document]) -> PathBuf {
        let array: Vec<serde_json::Value> =
            documents.iter().map(extjson::encode_document).collect();
        let content = serde_json::to_string_pretty(&array).expect("encode fixture");
        self.write(name, &content)
    }

    /// Fixture reading from this directory through a private cache.
    pub fn fixture(&self) -> MongoFixture {
        self.fixture_with_cache(Arc::new(FixtureCache::new()))
    }

    /// Fixture reading from this directory through `cache`.
    pub fn fixture_with_cache(&self, cache: Arc<FixtureCache>) -> MongoFixture {
        MongoFixture::new(
            FixtureConfig::default().with_fixture_dir(self.path()),
            RuntimeOptions::new(),
        )
        .with_cache(cache)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Three widgets with integer ids 1..=3.
pub const WIDGETS_JSON: &str = r#"[
    {"_id": 1, "name": "bolt", "qty": 10},
    {"_id": 2, "name": "nut", "qty": 25},
    {"_id": 3, "name": "washer", "qty": 5}
]"#;

/// A fresh `pytest` database on its own client.
pub fn fresh_db() -> Arc<AsyncDatabase> {
    AsyncClient::new().database(DATABASE_NAME)
}

/// Number of documents in a collection.
pub async fn count(db: &AsyncDatabase, collection: &str) -> u64 {
    db.collection(collection)
        .count_documents(())
        .await
        .expect("count documents")
}
