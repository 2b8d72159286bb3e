use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, DateTime, Document, doc};
use futures::stream::{self, StreamExt, TryStreamExt};
use mongodb::{Collection, Database};

use super::{DocumentStore, LiveQuery, NewDocument, Snapshot, SnapshotStream, StoredDocument};
use crate::errors::Error;

/// [`DocumentStore`] backed by MongoDB. Live queries are driven by a change
/// stream on the queried collection, which requires a replica set.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

// Identifiers created by this service are ObjectIds; anything else is kept
// verbatim so documents imported with string keys stay addressable.
fn id_filter(id: &str) -> Document {
    match ObjectId::parse_str(id) {
        Ok(object_id) => doc! { "_id": object_id },
        Err(_) => doc! { "_id": id },
    }
}

fn id_to_string(id: Bson) -> Result<String, Error> {
    match id {
        Bson::ObjectId(object_id) => Ok(object_id.to_hex()),
        Bson::String(id) => Ok(id),
        other => Err(Error::ParseObjectID(other.to_string())),
    }
}

fn into_stored(mut document: Document) -> Result<StoredDocument, Error> {
    let id = document
        .remove("_id")
        .ok_or_else(|| Error::ParseObjectID("missing _id".to_string()))?;

    Ok(StoredDocument {
        id: id_to_string(id)?,
        fields: document,
    })
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn query(&self, query: &LiveQuery) -> Result<Snapshot, Error> {
        let documents: Vec<Document> = self
            .collection(&query.collection)
            .find(query.filter())
            .sort(query.sort())
            .await?
            .try_collect()
            .await?;

        documents.into_iter().map(into_stored).collect()
    }

    async fn watch(&self, query: LiveQuery) -> Result<SnapshotStream, Error> {
        // Open the change stream before the first read so nothing written in
        // between is missed.
        let changes = self.collection(&query.collection).watch().await?;
        let initial = self.query(&query).await?;

        let store = self.clone();
        let updates = changes.then(move |event| {
            let store = store.clone();
            let query = query.clone();
            async move {
                let event = event?;
                tracing::debug!(
                    "change {:?} on {}, re-running live query",
                    event.operation_type,
                    query.collection
                );
                store.query(&query).await
            }
        });

        Ok(stream::once(async move { Ok(initial) })
            .chain(updates)
            .boxed())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, Error> {
        self.collection(collection)
            .find_one(id_filter(id))
            .await?
            .map(into_stored)
            .transpose()
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), Error> {
        let result = self
            .collection(collection)
            .update_one(id_filter(id), doc! { "$set": fields })
            .await?;

        if result.matched_count == 0 {
            return Err(Error::not_found(&format!("{collection}/{id}")));
        }

        Ok(())
    }

    async fn add(&self, collection: &str, document: NewDocument) -> Result<String, Error> {
        let mut fields = document.fields;
        let now = DateTime::now();
        for field in document.server_timestamps {
            fields.insert(field, now);
        }

        let result = self.collection(collection).insert_one(fields).await?;
        id_to_string(result.inserted_id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), Error> {
        let result = self.collection(collection).delete_one(id_filter(id)).await?;
        if result.deleted_count == 0 {
            tracing::debug!("delete of {collection}/{id} matched nothing");
        }
        Ok(())
    }
}
