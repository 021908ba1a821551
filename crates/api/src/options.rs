//! Operation arguments: filters, delete options and sessions

use mockmongo_core::{doc, Document, ObjectId, Value, ID_FIELD};
use uuid::Uuid;

/// Query filter accepted by the collection facade
///
/// A filter is a document, nothing (match everything) or a bare value,
/// which is shorthand for matching on `_id`:
///
/// ```ignore
/// widgets.find_one(7).await?;            // same as {"_id": 7}
/// widgets.find_one(doc! {"_id" => 7}).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Match every document
    #[default]
    All,
    /// Match with a filter document
    Document(Document),
    /// Match the document whose `_id` equals the value
    Id(Value),
}

impl Filter {
    /// The equivalent filter document
    pub fn into_document(self) -> Document {
        match self {
            Filter::All => Document::new(),
            Filter::Document(doc) => doc,
            Filter::Id(id) => doc! { ID_FIELD => id },
        }
    }
}

impl From<Document> for Filter {
    fn from(doc: Document) -> Self {
        Filter::Document(doc)
    }
}

impl From<Value> for Filter {
    fn from(value: Value) -> Self {
        match value {
            Value::Document(doc) => Filter::Document(doc),
            other => Filter::Id(other),
        }
    }
}

impl From<Option<Document>> for Filter {
    fn from(doc: Option<Document>) -> Self {
        doc.map_or(Filter::All, Filter::Document)
    }
}

impl From<()> for Filter {
    fn from(_: ()) -> Self {
        Filter::All
    }
}

macro_rules! id_filter_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Filter {
                fn from(id: $ty) -> Self {
                    Filter::Id(Value::from(id))
                }
            }
        )+
    };
}

id_filter_from!(&str, String, i32, i64, ObjectId);

/// Handle for a client session
///
/// Sessions are not supported by the in-memory server. The type exists so
/// callers can pass one and get a clear `NotImplemented` error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSession {
    id: Uuid,
}

impl ClientSession {
    /// Start a new session
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for `delete_one` / `delete_many`
///
/// None of these are supported; setting any of them makes the delete fail
/// with `Error::NotImplemented` before anything is removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteOptions {
    /// Index hint
    pub hint: Option<Value>,
    /// Collation specification
    pub collation: Option<Document>,
    /// Session to run the delete in
    pub session: Option<ClientSession>,
}

impl DeleteOptions {
    /// No options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an index hint
    pub fn with_hint(mut self, hint: impl Into<Value>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Set a collation
    pub fn with_collation(mut self, collation: Document) -> Self {
        self.collation = Some(collation);
        self
    }

    /// Run in a session
    pub fn with_session(mut self, session: ClientSession) -> Self {
        self.session = Some(session);
        self
    }
}

impl From<Option<DeleteOptions>> for DeleteOptions {
    fn from(options: Option<DeleteOptions>) -> Self {
        options.unwrap_or_default()
    }
}

impl From<()> for DeleteOptions {
    fn from(_: ()) -> Self {
        Self::default()
    }
}
