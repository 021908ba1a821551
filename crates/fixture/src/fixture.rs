//! Per-test database setup
//!
//! `MongoFixture` turns a test's markers into a ready database:
//!
//! 1. connect a fresh client and open the `pytest` database
//! 2. drop every collection, unless the test is marked `not_drop_exists`
//! 3. load the fixtures for the requested collections
//!
//! ```ignore
//! let fixture = MongoFixture::from_env()?;
//! let db = fixture.setup(&Markers::new().collection("widgets")).await?;
//! assert!(db.collection("widgets").find_one(1).await?.is_some());
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use mockmongo_api::{AsyncClient, AsyncDatabase};
use tracing::info;

use crate::cache::FixtureCache;
use crate::config::{resolve_fixture_dir, startup_dir, FixtureConfig, RuntimeOptions};
use crate::error::FixtureResult;
use crate::loader::{clean_database, load_fixtures};
use crate::markers::Markers;

/// Name of the database handed to tests
pub const DATABASE_NAME: &str = "pytest";

/// Fixture settings plus the cache parsed files go through
#[derive(Debug, Clone)]
pub struct MongoFixture {
    config: FixtureConfig,
    options: RuntimeOptions,
    cache: Arc<FixtureCache>,
}

impl MongoFixture {
    /// Fixture using the process-wide cache
    pub fn new(config: FixtureConfig, options: RuntimeOptions) -> Self {
        Self {
            config,
            options,
            cache: FixtureCache::global(),
        }
    }

    /// Configuration from `mockmongo.toml` in the startup directory and
    /// overrides from the environment
    pub fn from_env() -> FixtureResult<Self> {
        let config = FixtureConfig::load(startup_dir())?;
        Ok(Self::new(config, RuntimeOptions::from_env()))
    }

    /// Use `cache` instead of the process-wide cache
    pub fn with_cache(mut self, cache: Arc<FixtureCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The cache fixture files are parsed through
    pub fn cache(&self) -> &Arc<FixtureCache> {
        &self.cache
    }

    /// The configuration
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Directory fixture files are read from
    pub fn fixture_dir(&self) -> PathBuf {
        resolve_fixture_dir(&self.config, &self.options)
    }

    /// Prepare a fresh database for a test
    ///
    /// Each call connects a new client, so databases from different calls
    /// share nothing except the fixture cache.
    pub async fn setup(&self, markers: &Markers) -> FixtureResult<Arc<AsyncDatabase>> {
        let client = AsyncClient::new();
        let db = client.database(DATABASE_NAME);
        self.setup_on(&db, markers).await?;
        Ok(db)
    }

    /// Clean (unless `not_drop_exists`) and seed an existing database
    pub async fn setup_on(&self, db: &AsyncDatabase, markers: &Markers) -> FixtureResult<()> {
        let dropped = if markers.keeps_existing() {
            0
        } else {
            clean_database(db).await
        };
        let dir = self.fixture_dir();
        let loaded = load_fixtures(db, &dir, markers.selection(), &self.cache).await?;
        info!(
            target: "mockmongo::fixture",
            database = db.name(),
            dir = ?dir,
            dropped,
            loaded,
            "Test database ready"
        );
        Ok(())
    }
}

/// Prepare a test database using the process-wide fixture cache
pub async fn async_mongodb(
    config: &FixtureConfig,
    options: &RuntimeOptions,
    markers: &Markers,
) -> FixtureResult<Arc<AsyncDatabase>> {
    MongoFixture::new(config.clone(), options.clone())
        .setup(markers)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockmongo_core::doc;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir) -> MongoFixture {
        MongoFixture::new(
            FixtureConfig::default().with_fixture_dir(dir.path()),
            RuntimeOptions::new(),
        )
        .with_cache(Arc::new(FixtureCache::new()))
    }

    #[tokio::test]
    async fn test_setup_returns_pytest_database() {
        let dir = TempDir::new().unwrap();
        let db = fixture(&dir).setup(&Markers::new()).await.unwrap();
        assert_eq!(db.name(), DATABASE_NAME);
        assert!(db.list_collection_names().is_empty());
    }

    #[tokio::test]
    async fn test_setup_on_cleans_then_loads() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("widgets.json"), r#"[{"_id": 1}, {"_id": 2}]"#).unwrap();
        let fixture = fixture(&dir);
        let db = AsyncClient::new().database(DATABASE_NAME);
        db.collection("widgets").insert_one(doc! { "_id" => 1 }).await.unwrap();
        db.collection("stale").insert_one(doc! { "_id" => 1 }).await.unwrap();

        fixture
            .setup_on(&db, &Markers::new().collection("widgets"))
            .await
            .unwrap();
        assert_eq!(db.list_collection_names(), vec!["widgets".to_string()]);
        assert_eq!(db.collection("widgets").count_documents(()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_not_drop_exists_keeps_collections() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("widgets.json"), r#"[{"_id": 1}, {"_id": 2}]"#).unwrap();
        let fixture = fixture(&dir);
        let db = AsyncClient::new().database(DATABASE_NAME);
        db.collection("widgets").insert_one(doc! { "_id" => 9 }).await.unwrap();

        let markers = Markers::new().collection("widgets").not_drop_exists();
        fixture.setup_on(&db, &markers).await.unwrap();
        assert_eq!(db.collection("widgets").count_documents(()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_runtime_dir_overrides_config() {
        let config_dir = TempDir::new().unwrap();
        let option_dir = TempDir::new().unwrap();
        std::fs::write(option_dir.path().join("widgets.yaml"), "- _id: 1\n").unwrap();

        let fixture = MongoFixture::new(
            FixtureConfig::default().with_fixture_dir(config_dir.path()),
            RuntimeOptions::new().with_fixture_dir(option_dir.path()),
        )
        .with_cache(Arc::new(FixtureCache::new()));
        let db = fixture
            .setup(&Markers::new().collections(["widgets"]))
            .await
            .unwrap();
        assert_eq!(db.collection("widgets").count_documents(()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_async_mongodb_free_function() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("solo.json"), r#"[{"_id": "only"}]"#).unwrap();
        let config = FixtureConfig::default().with_fixture_dir(dir.path());

        let db = async_mongodb(&config, &RuntimeOptions::new(), &Markers::new().collection("solo"))
            .await
            .unwrap();
        assert!(db.collection("solo").find_one("only").await.unwrap().is_some());
    }
}
