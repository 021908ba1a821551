//! Fixture Lifecycle Tests
//!
//! End-to-end tests through the public `mockmongo` crate:
//! - facade: find_one / delete_one semantics and caching of handles
//! - loading: fixture discovery, cleaning, not_drop_exists, caching
//! - types: extended JSON values surviving the fixture path

#[path = "../common/mod.rs"]
mod common;

mod facade;
mod loading;
mod types;
