use bson::Document;
use serde::Serialize;
use utoipa::ToSchema;

use crate::constants::{COLLECTION_NOTIFICATIONS, FIELD_STATUS};
use crate::core::store::DocumentStore;
use crate::enums::ReadStatus;
use crate::errors::Error;
use crate::models::notification::Notification;

/// Where a client goes after opening a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRoute {
    pub booking_id: String,
    pub path: String,
}

impl BookingRoute {
    pub fn for_booking(booking_id: &str) -> Self {
        Self {
            booking_id: booking_id.to_string(),
            path: format!("/api/v1/bookings/{booking_id}"),
        }
    }
}

/// Marks a booking notification read and routes to its booking. Items
/// without a booking are left untouched.
pub async fn open(
    store: &dyn DocumentStore,
    notification: &Notification,
) -> Result<Option<BookingRoute>, Error> {
    let Some(booking_id) = notification.booking_id.as_deref() else {
        return Ok(None);
    };

    let mut update = Document::new();
    update.insert(FIELD_STATUS, ReadStatus::Read.to_string());
    store
        .update_fields(COLLECTION_NOTIFICATIONS, &notification.id, update)
        .await?;

    Ok(Some(BookingRoute::for_booking(booking_id)))
}

pub async fn delete(store: &dyn DocumentStore, notification_id: &str) -> Result<(), Error> {
    store.delete(COLLECTION_NOTIFICATIONS, notification_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::subscriber::current;
    use crate::core::store::memory::MemoryStore;
    use crate::test_support::RecordingStore;
    use bson::doc;

    async fn store_with(fields: Document) -> RecordingStore {
        let memory = MemoryStore::new();
        memory.put(COLLECTION_NOTIFICATIONS, "n1", fields).await;
        RecordingStore::new(memory)
    }

    async fn load(store: &RecordingStore) -> Notification {
        let stored = store.inner.get(COLLECTION_NOTIFICATIONS, "n1").await.unwrap().unwrap();
        Notification::from_stored(stored).unwrap()
    }

    #[tokio::test]
    async fn opening_a_booking_notification_marks_it_read() {
        let store = store_with(doc! { "to": "owner", "bookingId": "b9", "status": "unread" }).await;
        let notification = load(&store).await;

        let route = open(&store, &notification).await.unwrap();

        assert_eq!(route, Some(BookingRoute::for_booking("b9")));
        assert_eq!(route.unwrap().path, "/api/v1/bookings/b9");
        assert!(!load(&store).await.is_unread());
    }

    #[tokio::test]
    async fn opening_without_a_booking_is_a_no_op() {
        let store = store_with(doc! { "to": "owner", "status": "unread" }).await;
        let notification = load(&store).await;

        assert_eq!(open(&store, &notification).await.unwrap(), None);
        assert_eq!(store.total_writes(), 0);
        assert!(load(&store).await.is_unread());
    }

    #[tokio::test]
    async fn deleted_notification_is_absent_from_the_next_snapshot() {
        let store = store_with(doc! { "to": "owner" }).await;
        assert_eq!(current(&store, "owner").await.unwrap().len(), 1);

        delete(&store, "n1").await.unwrap();

        assert!(current(&store, "owner").await.unwrap().is_empty());
    }
}
