//! Document store seam.
//!
//! The inbox only needs a handful of calls against a realtime document
//! database: a live query (equality filter plus a single sort key), point
//! reads, partial field updates, inserts with server timestamps, and deletes.
//! [`DocumentStore`] captures exactly that surface so the workflow can run
//! against MongoDB in production and [`memory::MemoryStore`] in tests.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bson::{Bson, Document};
use futures::stream::BoxStream;

use crate::errors::Error;

/// A document together with its store-assigned identifier. `fields` never
/// contains the identifier itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

/// Point-in-time ordered result of a [`LiveQuery`].
pub type Snapshot = Vec<StoredDocument>;

/// Sequence of snapshots. The first item is the state at subscription time;
/// dropping the stream ends the subscription.
pub type SnapshotStream = BoxStream<'static, Result<Snapshot, Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveQuery {
    pub collection: String,
    pub filter_field: String,
    pub filter_value: Bson,
    pub order_by: String,
    pub direction: SortDirection,
}

impl LiveQuery {
    pub fn new(collection: &str, filter_field: &str, filter_value: impl Into<Bson>) -> Self {
        Self {
            collection: collection.to_string(),
            filter_field: filter_field.to_string(),
            filter_value: filter_value.into(),
            order_by: "_id".to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order_by = field.to_string();
        self.direction = direction;
        self
    }

    pub fn filter(&self) -> Document {
        let mut filter = Document::new();
        filter.insert(self.filter_field.clone(), self.filter_value.clone());
        filter
    }

    pub fn sort(&self) -> Document {
        let mut sort = Document::new();
        sort.insert(self.order_by.clone(), self.direction.as_i32());
        sort
    }
}

/// Document to insert. Fields listed in `server_timestamps` are set by the
/// store at write time, overriding any value supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub fields: Document,
    pub server_timestamps: Vec<String>,
}

impl NewDocument {
    pub fn new(fields: Document) -> Self {
        Self {
            fields,
            server_timestamps: Vec::new(),
        }
    }

    pub fn with_server_timestamp(mut self, field: &str) -> Self {
        self.server_timestamps.push(field.to_string());
        self
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// One-shot evaluation of `query`.
    async fn query(&self, query: &LiveQuery) -> Result<Snapshot, Error>;

    /// Live evaluation of `query`: a new snapshot after every change to the
    /// queried collection. No ordering guarantee relative to other callers'
    /// writes beyond eventual delivery.
    async fn watch(&self, query: LiveQuery) -> Result<SnapshotStream, Error>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, Error>;

    /// Partial update: only the given fields are replaced. Fails with
    /// `NotFound` when the document does not exist.
    async fn update_fields(&self, collection: &str, id: &str, fields: Document)
    -> Result<(), Error>;

    /// Inserts a document and returns its store-assigned identifier.
    async fn add(&self, collection: &str, document: NewDocument) -> Result<String, Error>;

    /// Removes a document. Removing a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), Error>;
}
