//! Store wrapper for tests: records writes, injects failures and can hold
//! updates until released.

use std::sync::Arc;

use async_trait::async_trait;
use bson::Document;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::core::store::memory::MemoryStore;
use crate::core::store::{
    DocumentStore, LiveQuery, NewDocument, Snapshot, SnapshotStream, StoredDocument,
};
use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Get,
    Update,
    Add,
    Delete,
    Watch,
}

#[derive(Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    writes: Mutex<Vec<(Op, String, String)>>,
    failures: Mutex<Vec<(Op, String)>>,
    held_updates: Mutex<Option<(String, Arc<Notify>)>>,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Every later `op` on `collection` fails with an internal error. Live
    /// queries still deliver their first snapshot, then fail.
    pub fn fail(&self, op: Op, collection: &str) {
        self.failures.lock().push((op, collection.to_string()));
    }

    /// Updates to `collection` wait until the returned handle is notified.
    pub fn hold_updates(&self, collection: &str) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.held_updates.lock() = Some((collection.to_string(), release.clone()));
        release
    }

    pub fn writes(&self, op: Op, collection: &str) -> usize {
        self.writes
            .lock()
            .iter()
            .filter(|(recorded, recorded_collection, _)| {
                *recorded == op && recorded_collection == collection
            })
            .count()
    }

    pub fn total_writes(&self) -> usize {
        self.writes.lock().len()
    }

    fn check(&self, op: Op, collection: &str) -> Result<(), Error> {
        let failing = self
            .failures
            .lock()
            .iter()
            .any(|(failing_op, failing_collection)| {
                *failing_op == op && failing_collection == collection
            });
        if failing {
            return Err(Error::internal_err(&format!("injected {op:?} failure on {collection}")));
        }
        Ok(())
    }

    fn record(&self, op: Op, collection: &str, id: &str) {
        self.writes
            .lock()
            .push((op, collection.to_string(), id.to_string()));
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn query(&self, query: &LiveQuery) -> Result<Snapshot, Error> {
        self.inner.query(query).await
    }

    async fn watch(&self, query: LiveQuery) -> Result<SnapshotStream, Error> {
        let collection = query.collection.clone();
        let snapshots = self.inner.watch(query).await?;
        let Err(failure) = self.check(Op::Watch, &collection) else {
            return Ok(snapshots);
        };

        Ok(snapshots
            .take(1)
            .chain(stream::once(async move { Err(failure) }))
            .boxed())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, Error> {
        self.check(Op::Get, collection)?;
        self.inner.get(collection, id).await
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), Error> {
        let held = self.held_updates.lock().clone();
        if let Some((held_collection, release)) = held {
            if held_collection == collection {
                release.notified().await;
            }
        }

        self.check(Op::Update, collection)?;
        self.inner.update_fields(collection, id, fields).await?;
        self.record(Op::Update, collection, id);
        Ok(())
    }

    async fn add(&self, collection: &str, document: NewDocument) -> Result<String, Error> {
        self.check(Op::Add, collection)?;
        let id = self.inner.add(collection, document).await?;
        self.record(Op::Add, collection, &id);
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), Error> {
        self.check(Op::Delete, collection)?;
        self.inner.delete(collection, id).await?;
        self.record(Op::Delete, collection, id);
        Ok(())
    }
}
