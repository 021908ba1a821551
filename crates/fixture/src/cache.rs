//! Parsed fixture cache
//!
//! Fixture files are parsed at most once per cache. Entries are keyed by
//! the canonical path of the file, never replaced and never invalidated:
//! editing a fixture file while tests run has no effect on later loads
//! that use the same cache. Each path a caller has used is remembered, so
//! asking again with that path touches no file, even if it has since been
//! removed.
//!
//! A process-wide cache is available through [`FixtureCache::global`]; an
//! owned cache gives a test suite its own view.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use mockmongo_core::Document;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{FixtureError, FixtureResult};

static GLOBAL_CACHE: Lazy<Arc<FixtureCache>> = Lazy::new(|| Arc::new(FixtureCache::new()));

/// Parsed fixture documents shared between loads
pub type CachedDocuments = Arc<Vec<Document>>;

/// Cache of parsed fixture files
#[derive(Debug, Default)]
pub struct FixtureCache {
    entries: DashMap<PathBuf, CachedDocuments>,
    aliases: DashMap<PathBuf, PathBuf>,
    misses: AtomicU64,
}

impl FixtureCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache
    pub fn global() -> Arc<FixtureCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    /// Cached documents for `path`, parsing with `load` on a miss
    ///
    /// `load` receives the canonical path. If two callers miss at the same
    /// time, both parse and the first to finish wins; both get its entry.
    ///
    /// # Errors
    /// `FixtureError::Io` if a path not seen before cannot be canonicalised,
    /// or whatever `load` returns. Failed loads are not cached.
    pub fn get_or_load<F>(&self, path: &Path, load: F) -> FixtureResult<CachedDocuments>
    where
        F: FnOnce(&Path) -> FixtureResult<Vec<Document>>,
    {
        if let Some(hit) = self.lookup_alias(path) {
            debug!(target: "mockmongo::fixture", ?path, "Fixture cache hit");
            return Ok(hit);
        }

        let key = canonical(path)?;
        self.aliases.insert(path.to_path_buf(), key.clone());
        if let Some(hit) = self.entries.get(&key) {
            debug!(target: "mockmongo::fixture", path = ?key, "Fixture cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        let documents = Arc::new(load(&key)?);
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(target: "mockmongo::fixture", path = ?key, count = documents.len(), "Fixture parsed");
        let entry = self.entries.entry(key).or_insert(documents);
        Ok(Arc::clone(entry.value()))
    }

    /// Cached documents for `path`, if present
    pub fn get(&self, path: &Path) -> Option<CachedDocuments> {
        if let Some(hit) = self.lookup_alias(path) {
            return Some(hit);
        }
        let key = canonical(path).ok()?;
        self.entries.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    fn lookup_alias(&self, path: &Path) -> Option<CachedDocuments> {
        let key = self.aliases.get(path)?.value().clone();
        self.entries.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether `path` has been parsed
    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// Number of cached files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful parses, i.e. cache misses that read a file
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

fn canonical(path: &Path) -> FixtureResult<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| FixtureError::io(path, e))
}
