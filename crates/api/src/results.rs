//! Delete results
//!
//! Insert and update results come straight from the storage engine and are
//! re-exported from the crate root.

use mockmongo_core::{doc, Document, Value};
use serde::Serialize;

/// Server response to a delete command
///
/// Serialises with the wire field names:
/// `{"connectionId": .., "n": .., "ok": 1.0, "err": null}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawDeleteResult {
    /// Id of the client connection that ran the delete
    #[serde(rename = "connectionId")]
    pub connection_id: u64,
    /// Number of documents removed
    pub n: u64,
    /// Always `1.0` for a completed delete
    pub ok: f64,
    /// Always `None` for a completed delete
    pub err: Option<String>,
}

impl RawDeleteResult {
    pub(crate) fn completed(connection_id: u64, n: u64) -> Self {
        Self {
            connection_id,
            n,
            ok: 1.0,
            err: None,
        }
    }

    /// The response as a document
    pub fn to_document(&self) -> Document {
        doc! {
            "connectionId" => Value::Int(self.connection_id as i64),
            "n" => Value::Int(self.n as i64),
            "ok" => self.ok,
            "err" => self.err.clone(),
        }
    }
}

/// Outcome of `delete_one` / `delete_many`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteResult {
    raw_result: RawDeleteResult,
    acknowledged: bool,
}

impl DeleteResult {
    pub(crate) fn acknowledged(raw_result: RawDeleteResult) -> Self {
        Self {
            raw_result,
            acknowledged: true,
        }
    }

    /// Number of documents removed
    pub fn deleted_count(&self) -> u64 {
        self.raw_result.n
    }

    /// The raw server response
    pub fn raw_result(&self) -> &RawDeleteResult {
        &self.raw_result
    }

    /// Whether the write was acknowledged
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }
}
