//! Async facade over the in-memory document store
//!
//! This crate provides the awaitable surface test code talks to:
//! - `AsyncClient`: owns a fresh in-memory server, caches databases
//! - `AsyncDatabase`: caches collections, lists and drops them
//! - `AsyncCollection`: `find_one`, `find`, `count_documents`,
//!   `insert_one`, `update_one`, `delete_one`, `delete_many`
//!
//! ## Execution Model
//!
//! There is no I/O and no thread pool. Every awaitable operation is a
//! [`Deferred`] future that runs the synchronous storage operation when it
//! is first polled and is ready immediately. Which operations are
//! awaitable is fixed per facade by a [`deferred_ops!`] table.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mockmongo_api::AsyncClient;
//! use mockmongo_core::doc;
//!
//! let client = AsyncClient::new();
//! let widgets = client.database("pytest").collection("widgets");
//! widgets.insert_one(doc! { "_id" => 1, "kind" => "bolt" }).await?;
//! assert!(widgets.find_one(1).await?.is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapt;
pub mod client;
pub mod collection;
pub mod database;
pub mod options;
pub mod results;

pub use adapt::{defer, Deferred};
pub use client::AsyncClient;
pub use collection::AsyncCollection;
pub use database::AsyncDatabase;
pub use options::{ClientSession, DeleteOptions, Filter};
pub use results::{DeleteResult, RawDeleteResult};

pub use mockmongo_storage::{Cursor, InsertOneResult, UpdateResult};
