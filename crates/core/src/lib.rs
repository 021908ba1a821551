//! Core types for mockmongo
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: Unified value enum, including the extended (non-JSON) types
//! - Document: Ordered field → value mapping
//! - ObjectId: 12-byte identifier generated for documents without `_id`
//! - StoreKey: Hashable canonical form of an `_id`
//! - extjson: Extended JSON decoding/encoding used by JSON fixtures
//! - Error: Error type shared by storage and facades

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod extjson;
pub mod oid;
pub mod store_key;
pub mod value;

pub use document::{Document, ID_FIELD};
pub use error::{Error, Result};
pub use oid::ObjectId;
pub use store_key::StoreKey;
pub use value::Value;
