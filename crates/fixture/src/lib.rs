//! Test fixtures backed by the in-memory document store
//!
//! This crate turns fixture files on disk into a seeded, isolated database
//! for each test:
//! - config: `mockmongo.toml` plus the `ASYNC_MONGODB_FIXTURE_DIR` override
//! - markers: which collections a test wants, and whether to keep existing ones
//! - format: `json` (extended JSON) and `yaml` fixture parsing
//! - cache: parsed files, keyed by canonical path, shared between tests
//! - loader: directory discovery, cleaning and seeding
//! - fixture: `MongoFixture` / `async_mongodb`, the per-test entry points
//!
//! ## Fixture files
//!
//! `<collection>.json` holds an array of extended-JSON documents,
//! `<collection>.yaml` a sequence of mappings. The file stem is the
//! collection name.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mockmongo_fixture::{async_mongodb, FixtureConfig, Markers, RuntimeOptions};
//!
//! let config = FixtureConfig::default().with_fixture_dir("tests/fixtures");
//! let db = async_mongodb(&config, &RuntimeOptions::from_env(),
//!     &Markers::new().collections(["widgets"])).await?;
//! let widget = db.collection("widgets").find_one(1).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod error;
pub mod fixture;
pub mod format;
pub mod loader;
pub mod logging;
pub mod markers;

pub use cache::{CachedDocuments, FixtureCache};
pub use config::{
    resolve_fixture_dir, startup_dir, FixtureConfig, RuntimeOptions, CONFIG_FILE_NAME,
    FIXTURE_DIR_ENV,
};
pub use error::{FixtureError, FixtureResult};
pub use fixture::{async_mongodb, MongoFixture, DATABASE_NAME};
pub use format::FixtureFormat;
pub use loader::{clean_database, load_fixture, load_fixtures};
pub use logging::init_tracing;
pub use markers::{CollectionSelection, Markers};
