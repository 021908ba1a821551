//! mockmongo - In-memory async document database fixtures for tests
//!
//! mockmongo hands a test an isolated, awaitable document database seeded
//! from fixture files, without a database server.
//!
//! # Quick Start
//!
//! ```ignore
//! use mockmongo::{doc, MongoFixture, Markers};
//!
//! let fixture = MongoFixture::from_env()?;
//! let db = fixture.setup(&Markers::new().collections(["widgets"])).await?;
//!
//! let widgets = db.collection("widgets");
//! assert!(widgets.find_one(1).await?.is_some());
//! widgets.delete_one(doc! { "_id" => 1 }, ()).await?;
//! ```
//!
//! # Architecture
//!
//! - `mockmongo-core`: values, documents, ids, extended JSON
//! - `mockmongo-storage`: the synchronous in-memory engine
//! - `mockmongo-api`: awaitable client / database / collection facades
//! - `mockmongo-fixture`: fixture configuration, loading and setup
//!
//! Only the facades and the fixture entry points are re-exported here.

pub use mockmongo_api::{
    AsyncClient, AsyncCollection, AsyncDatabase, ClientSession, Cursor, DeleteOptions,
    DeleteResult, Filter, InsertOneResult, RawDeleteResult, UpdateResult,
};
pub use mockmongo_core::{doc, extjson, Document, Error, ObjectId, Result, Value};
pub use mockmongo_fixture::{
    async_mongodb, clean_database, init_tracing, load_fixture, load_fixtures,
    CollectionSelection, FixtureCache, FixtureConfig, FixtureError, FixtureFormat,
    FixtureResult, Markers, MongoFixture, RuntimeOptions, DATABASE_NAME,
};
