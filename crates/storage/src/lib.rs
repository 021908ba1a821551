//! Storage layer for mockmongo
//!
//! This crate implements the synchronous in-memory document engine the
//! async facades sit on:
//! - ServerStore / DatabaseStore / CollectionStore: `parking_lot::RwLock`
//!   guarded maps, collection stores keyed by `StoreKey`
//! - Database / Collection: cheap handles exposing insert, find, count,
//!   update, drop and collection listing
//! - matcher: the filter subset used by fixtures and their tests
//! - update: `$set` / `$unset` / `$inc` and replacement updates
//!
//! Nothing here is persisted; dropping the `ServerStore` drops all data.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod database;
pub mod matcher;
pub mod results;
pub mod store;
pub mod update;

pub use collection::{Collection, Cursor};
pub use database::Database;
pub use results::{InsertManyResult, InsertOneResult, UpdateResult};
pub use store::{CollectionStore, DatabaseStore, ServerStore};
