use futures::stream::{BoxStream, StreamExt};

use crate::constants::{COLLECTION_NOTIFICATIONS, FIELD_TIMESTAMP, FIELD_TO};
use crate::core::store::{DocumentStore, LiveQuery, Snapshot, SortDirection};
use crate::errors::Error;
use crate::models::notification::Notification;

pub type NotificationStream = BoxStream<'static, Result<Vec<Notification>, Error>>;

/// Notifications addressed to `user_id`, newest first.
pub fn inbox_query(user_id: &str) -> LiveQuery {
    LiveQuery::new(COLLECTION_NOTIFICATIONS, FIELD_TO, user_id)
        .order_by(FIELD_TIMESTAMP, SortDirection::Descending)
}

fn decode(snapshot: Snapshot) -> Result<Vec<Notification>, Error> {
    snapshot.into_iter().map(Notification::from_stored).collect()
}

pub async fn current(store: &dyn DocumentStore, user_id: &str) -> Result<Vec<Notification>, Error> {
    decode(store.query(&inbox_query(user_id)).await?)
}

/// Live inbox of `user_id`. Dropping the stream closes the subscription.
pub async fn subscribe(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<NotificationStream, Error> {
    let snapshots = store.watch(inbox_query(user_id)).await?;
    tracing::debug!("opened notification feed for user {user_id}");

    Ok(snapshots
        .map(|snapshot| snapshot.and_then(decode))
        .boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::memory::MemoryStore;
    use bson::{DateTime, doc};

    #[tokio::test]
    async fn feed_is_scoped_to_the_recipient_and_follows_writes() {
        let store = MemoryStore::new();
        store
            .put(
                COLLECTION_NOTIFICATIONS,
                "n1",
                doc! { "to": "owner", "bookingId": "b1", "type": "pending", "timestamp": DateTime::from_millis(10) },
            )
            .await;
        store
            .put(
                COLLECTION_NOTIFICATIONS,
                "n2",
                doc! { "to": "someone-else", "timestamp": DateTime::from_millis(20) },
            )
            .await;

        let mut feed = subscribe(&store, "owner").await.unwrap();
        let first = feed.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "n1");
        assert_eq!(first[0].booking_id.as_deref(), Some("b1"));

        store
            .put(
                COLLECTION_NOTIFICATIONS,
                "n3",
                doc! { "to": "owner", "timestamp": DateTime::from_millis(30) },
            )
            .await;

        let second = feed.next().await.unwrap().unwrap();
        let ids: Vec<&str> = second.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n3", "n1"]);
    }

    #[tokio::test]
    async fn deleted_notifications_leave_later_snapshots() {
        let store = MemoryStore::new();
        store
            .put(COLLECTION_NOTIFICATIONS, "n1", doc! { "to": "owner" })
            .await;

        store.delete(COLLECTION_NOTIFICATIONS, "n1").await.unwrap();

        assert!(current(&store, "owner").await.unwrap().is_empty());
    }
}
