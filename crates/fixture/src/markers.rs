//! Per-test markers
//!
//! A test declares which collections it wants seeded and whether existing
//! collections should survive setup:
//!
//! ```ignore
//! let markers = Markers::new().collections(["widgets", "gadgets"]);
//! let markers = Markers::new().collection("widgets").not_drop_exists();
//! ```

use std::collections::BTreeSet;

/// Collections a test asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionSelection {
    /// A list of names; duplicates collapsed
    Set(BTreeSet<String>),
    /// A single name
    Single(String),
}

impl CollectionSelection {
    /// Whether `name` was requested
    pub fn contains(&self, name: &str) -> bool {
        match self {
            CollectionSelection::Set(names) => names.contains(name),
            CollectionSelection::Single(single) => single == name,
        }
    }

    /// Whether nothing was requested
    pub fn is_empty(&self) -> bool {
        match self {
            CollectionSelection::Set(names) => names.is_empty(),
            CollectionSelection::Single(single) => single.is_empty(),
        }
    }
}

/// Markers attached to one test
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    collections: Option<CollectionSelection>,
    not_drop_exists: bool,
}

impl Markers {
    /// No markers: nothing loaded, database cleaned
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a list of collections
    pub fn collections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = Some(CollectionSelection::Set(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Request a single collection
    ///
    /// Matching is exact: `collection("widgets")` does not select `widget`.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collections = Some(CollectionSelection::Single(name.into()));
        self
    }

    /// Keep collections that already exist
    pub fn not_drop_exists(mut self) -> Self {
        self.not_drop_exists = true;
        self
    }

    /// The requested collections, if the test declared any
    pub fn selection(&self) -> Option<&CollectionSelection> {
        self.collections.as_ref()
    }

    /// Whether existing collections are kept
    pub fn keeps_existing(&self) -> bool {
        self.not_drop_exists
    }
}
