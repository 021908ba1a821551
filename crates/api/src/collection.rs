//! Async collection facade

use mockmongo_core::{Document, Error, Result, StoreKey, Value};
use mockmongo_storage::{Collection, Cursor, InsertOneResult, UpdateResult};
use tracing::debug;

use crate::deferred_ops;
use crate::options::{DeleteOptions, Filter};
use crate::results::{DeleteResult, RawDeleteResult};

/// Awaitable view of one collection
///
/// Reads and writes are awaitable; `name` and `full_name` are plain
/// accessors.
#[derive(Debug)]
pub struct AsyncCollection {
    inner: Collection,
    connection_id: u64,
}

impl AsyncCollection {
    pub(crate) fn new(inner: Collection, connection_id: u64) -> Self {
        Self {
            inner,
            connection_id,
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// `<database>.<collection>`
    pub fn full_name(&self) -> String {
        self.inner.full_name()
    }

    /// The synchronous collection handle
    pub fn sync(&self) -> &Collection {
        &self.inner
    }

    /// Delete the first document matching `filter`
    ///
    /// # Errors
    /// `Error::NotImplemented` if `hint`, `collation` or `session` is set.
    /// Nothing is deleted in that case.
    pub async fn delete_one(
        &self,
        filter: impl Into<Filter>,
        options: impl Into<DeleteOptions>,
    ) -> Result<DeleteResult> {
        let raw = self.delete(filter, options, false).await?;
        Ok(DeleteResult::acknowledged(raw))
    }

    /// Delete every document matching `filter`
    ///
    /// Same option handling as [`delete_one`](Self::delete_one).
    pub async fn delete_many(
        &self,
        filter: impl Into<Filter>,
        options: impl Into<DeleteOptions>,
    ) -> Result<DeleteResult> {
        let raw = self.delete(filter, options, true).await?;
        Ok(DeleteResult::acknowledged(raw))
    }

    fn find_blocking(&self, filter: Filter) -> Result<Cursor> {
        self.inner.find(filter.into_document())
    }

    fn find_one_blocking(&self, filter: Filter) -> Result<Option<Document>> {
        Ok(self.find_blocking(filter)?.next())
    }

    fn count_blocking(&self, filter: Filter) -> Result<u64> {
        self.inner.count_documents(filter.into_document())
    }

    fn insert_one_blocking(&self, document: Document) -> Result<InsertOneResult> {
        self.inner.insert_one(document)
    }

    fn update_one_blocking(
        &self,
        filter: Filter,
        update: Document,
        upsert: bool,
    ) -> Result<UpdateResult> {
        self.inner.update_one(filter.into_document(), update, upsert)
    }

    fn delete_blocking(
        &self,
        filter: Filter,
        options: DeleteOptions,
        multi: bool,
    ) -> Result<RawDeleteResult> {
        if options.hint.is_some() {
            return Err(Error::not_implemented(
                "hint",
                "the hint argument of delete is valid but has not been implemented",
            ));
        }
        if options.collation.is_some() {
            return Err(Error::not_implemented(
                "collation",
                "the collation argument of delete is valid but has not been implemented",
            ));
        }
        if options.session.is_some() {
            return Err(Error::not_implemented(
                "session",
                "the session argument of delete is valid but has not been implemented",
            ));
        }

        let mut filter = filter.into_document();
        filter.truncate_datetimes();

        let mut removed = 0u64;
        for doc in self.inner.find(filter)? {
            let key = StoreKey::from_id(doc.id().unwrap_or(&Value::Null));
            if self.inner.remove(&key).is_some() {
                removed += 1;
            }
            if !multi {
                break;
            }
        }

        debug!(
            target: "mockmongo::api",
            collection = %self.inner.full_name(),
            multi,
            removed,
            "Delete completed"
        );
        Ok(RawDeleteResult::completed(self.connection_id, removed))
    }
}

deferred_ops! {
    impl AsyncCollection {
        /// Documents matching `filter`, in insertion order
        pub fn find(&self, filter: Filter) -> Result<Cursor> => find_blocking;

        /// First document matching `filter`, or `None`
        ///
        /// A bare value filters on `_id`: `find_one(7)` is
        /// `find_one(doc! {"_id" => 7})`.
        pub fn find_one(&self, filter: Filter) -> Result<Option<Document>> => find_one_blocking;

        /// Number of documents matching `filter`
        pub fn count_documents(&self, filter: Filter) -> Result<u64> => count_blocking;

        /// Alias of `count_documents`
        pub fn count(&self, filter: Filter) -> Result<u64> => count_blocking;

        /// Insert one document, assigning an `ObjectId` `_id` when missing
        pub fn insert_one(&self, document: Document) -> Result<InsertOneResult> => insert_one_blocking;

        /// Update the first document matching `filter`
        pub fn update_one(&self, filter: Filter, update: Document, upsert: bool) -> Result<UpdateResult> => update_one_blocking;

        /// Delete the first match, or every match with `multi`
        pub(crate) fn delete(&self, filter: Filter, options: DeleteOptions, multi: bool) -> Result<RawDeleteResult> => delete_blocking;
    }
}
