//! Result types returned by write operations

use mockmongo_core::Value;

/// Outcome of `insert_one`
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOneResult {
    /// `_id` of the inserted document (generated if the input had none)
    pub inserted_id: Value,
}

/// Outcome of `insert_many`
#[derive(Debug, Clone, PartialEq)]
pub struct InsertManyResult {
    /// `_id`s of the inserted documents, in input order
    pub inserted_ids: Vec<Value>,
}

/// Outcome of `update_one`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResult {
    /// Number of documents the filter matched (0 or 1)
    pub matched_count: u64,
    /// Number of documents actually changed (0 or 1)
    pub modified_count: u64,
    /// `_id` of the document created by an upsert
    pub upserted_id: Option<Value>,
}
