use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, DateTime, Document};
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{RwLock, broadcast};

use super::{
    DocumentStore, LiveQuery, NewDocument, Snapshot, SnapshotStream, SortDirection,
    StoredDocument,
};
use crate::errors::Error;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// In-process [`DocumentStore`]. Server timestamps are strictly increasing
/// across all writes of one store, so ordering by them is total.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    collections: RwLock<HashMap<String, HashMap<String, Document>>>,
    last_timestamp: Mutex<i64>,
    // Name of the collection touched by each write.
    changes: broadcast::Sender<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(MemoryInner {
                collections: RwLock::new(HashMap::new()),
                last_timestamp: Mutex::new(0),
                changes,
            }),
        }
    }

    /// Writes a document under a caller-chosen id, replacing any existing one.
    pub async fn put(&self, collection: &str, id: &str, fields: Document) {
        self.inner
            .collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        self.notify(collection);
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.inner
            .collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    fn notify(&self, collection: &str) {
        // No receivers simply means nobody is watching.
        let _ = self.inner.changes.send(collection.to_string());
    }

    fn next_timestamp(&self) -> DateTime {
        let mut last = self.inner.last_timestamp.lock();
        let now = DateTime::now().timestamp_millis();
        *last = if now > *last { now } else { *last + 1 };
        DateTime::from_millis(*last)
    }
}

fn present(value: Option<&Bson>) -> Option<&Bson> {
    value.filter(|value| !matches!(value, Bson::Null))
}

fn compare_bson(left: &Bson, right: &Bson) -> Ordering {
    match (left, right) {
        (Bson::DateTime(left), Bson::DateTime(right)) => {
            left.timestamp_millis().cmp(&right.timestamp_millis())
        }
        (Bson::String(left), Bson::String(right)) => left.cmp(right),
        (Bson::Int32(left), Bson::Int32(right)) => left.cmp(right),
        (Bson::Int64(left), Bson::Int64(right)) => left.cmp(right),
        (Bson::Double(left), Bson::Double(right)) => left.total_cmp(right),
        _ => Ordering::Equal,
    }
}

// Missing values sort lowest, as they do in MongoDB.
fn compare_field(left: Option<&Bson>, right: Option<&Bson>) -> Ordering {
    match (present(left), present(right)) {
        (Some(left), Some(right)) => compare_bson(left, right),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn evaluate(documents: Option<&HashMap<String, Document>>, query: &LiveQuery) -> Snapshot {
    let Some(documents) = documents else {
        return Vec::new();
    };

    let mut snapshot: Snapshot = documents
        .iter()
        .filter(|(_, fields)| fields.get(&query.filter_field) == Some(&query.filter_value))
        .map(|(id, fields)| StoredDocument {
            id: id.clone(),
            fields: fields.clone(),
        })
        .collect();

    snapshot.sort_by(|left, right| {
        let ordering = compare_field(
            left.fields.get(&query.order_by),
            right.fields.get(&query.order_by),
        );
        let ordering = match query.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        ordering.then_with(|| left.id.cmp(&right.id))
    });

    snapshot
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(&self, query: &LiveQuery) -> Result<Snapshot, Error> {
        let collections = self.inner.collections.read().await;
        Ok(evaluate(collections.get(&query.collection), query))
    }

    async fn watch(&self, query: LiveQuery) -> Result<SnapshotStream, Error> {
        let receiver = self.inner.changes.subscribe();
        let initial = self.query(&query).await?;

        let updates = stream::unfold(
            (self.clone(), receiver, query),
            |(store, mut receiver, query)| async move {
                loop {
                    match receiver.recv().await {
                        Ok(collection) if collection != query.collection => continue,
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => break,
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
                let snapshot = store.query(&query).await;
                Some((snapshot, (store, receiver, query)))
            },
        );

        Ok(stream::once(async move { Ok(initial) })
            .chain(updates)
            .boxed())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, Error> {
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|fields| StoredDocument {
                id: id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), Error> {
        {
            let mut collections = self.inner.collections.write().await;
            let document = collections
                .get_mut(collection)
                .and_then(|documents| documents.get_mut(id))
                .ok_or_else(|| Error::not_found(&format!("{collection}/{id}")))?;

            for (field, value) in fields {
                document.insert(field, value);
            }
        }

        self.notify(collection);
        Ok(())
    }

    async fn add(&self, collection: &str, document: NewDocument) -> Result<String, Error> {
        let id = ObjectId::new().to_hex();
        let mut fields = document.fields;
        if !document.server_timestamps.is_empty() {
            let now = self.next_timestamp();
            for field in document.server_timestamps {
                fields.insert(field, now);
            }
        }

        self.inner
            .collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);

        self.notify(collection);
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), Error> {
        let removed = self
            .inner
            .collections
            .write()
            .await
            .get_mut(collection)
            .and_then(|documents| documents.remove(id));

        if removed.is_some() {
            self.notify(collection);
        }
        Ok(())
    }
}
