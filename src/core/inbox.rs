use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::constants::{COLLECTION_BOOKINGS, COLLECTION_NOTIFICATIONS};
use crate::core::actions::{self, BookingRoute};
use crate::core::feed::screen_feed::ScreenFeed;
use crate::core::feed::subscriber;
use crate::core::notices::{Notice, NoticeBoard};
use crate::core::store::DocumentStore;
use crate::core::workflow::booking_decision::{BookingWorkflow, DecisionOutcome};
use crate::core::workflow::in_flight::InFlightBookings;
use crate::enums::Decision;
use crate::errors::Error;
use crate::models::booking::Booking;
use crate::models::notification::Notification;
use crate::presentation::view::{ScreenView, project};

#[derive(Debug, Clone)]
pub struct InboxSettings {
    pub step_timeout: Option<Duration>,
    pub notice_capacity: usize,
}

impl Default for InboxSettings {
    fn default() -> Self {
        Self {
            step_timeout: Some(Duration::from_secs(10)),
            notice_capacity: 16,
        }
    }
}

/// The station owner's inbox: every user-facing operation, with store
/// failures reported to the user as notices instead of being swallowed.
pub struct NotificationInbox {
    store: Arc<dyn DocumentStore>,
    workflow: BookingWorkflow,
    notices: NoticeBoard,
}

impl NotificationInbox {
    pub fn new(store: Arc<dyn DocumentStore>, settings: InboxSettings) -> Self {
        let in_flight = Arc::new(InFlightBookings::new());
        Self {
            workflow: BookingWorkflow::new(store.clone(), in_flight, settings.step_timeout),
            store,
            notices: NoticeBoard::new(settings.notice_capacity),
        }
    }

    pub fn in_flight(&self) -> &Arc<InFlightBookings> {
        self.workflow.in_flight()
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub async fn current_view(&self, user_id: &str) -> Result<ScreenView, Error> {
        let notifications = subscriber::current(self.store.as_ref(), user_id).await?;
        Ok(project(
            Some(user_id),
            Some(notifications.as_slice()),
            &self.in_flight().snapshot(),
            Utc::now(),
        ))
    }

    pub async fn screen_feed(&self, user_id: &str) -> Result<ScreenFeed, Error> {
        // Subscribe to notices first so nothing published while the live
        // query opens is lost.
        let notices = self.notices.subscribe(user_id);
        let notifications = subscriber::subscribe(self.store.as_ref(), user_id).await?;
        Ok(ScreenFeed::new(
            user_id,
            notifications,
            self.in_flight().clone(),
            notices,
        ))
    }

    pub async fn decide(
        &self,
        user_id: &str,
        booking_id: &str,
        decision: Decision,
        notification_id: &str,
    ) -> Result<DecisionOutcome, Error> {
        let notification = self.owned_notification(user_id, notification_id).await?;
        // The decision is only valid on the booking the notification refers to.
        if notification.booking_id.as_deref() != Some(booking_id) {
            return Err(Error::not_found(&format!(
                "Booking {booking_id} for notification {notification_id}"
            )));
        }

        let result = self
            .workflow
            .decide(booking_id, decision, notification_id)
            .await;

        match &result {
            Ok(_) => self
                .notices
                .publish(user_id, Notice::info(format!("Booking {decision} successfully"))),
            // A repeated tap while the first one runs is silently ignored.
            Err(Error::Conflict(_)) => {}
            Err(e) => self.notices.publish(user_id, Notice::error(format!("Error: {e}"))),
        }

        result
    }

    pub async fn open(
        &self,
        user_id: &str,
        notification_id: &str,
    ) -> Result<Option<BookingRoute>, Error> {
        let notification = self.owned_notification(user_id, notification_id).await?;

        actions::open(self.store.as_ref(), &notification)
            .await
            .inspect_err(|e| {
                self.notices
                    .publish(user_id, Notice::error(format!("Error: {e}")))
            })
    }

    pub async fn delete(&self, user_id: &str, notification_id: &str) -> Result<(), Error> {
        self.owned_notification(user_id, notification_id).await?;

        actions::delete(self.store.as_ref(), notification_id)
            .await
            .inspect_err(|e| {
                self.notices
                    .publish(user_id, Notice::error(format!("Error deleting: {e}")))
            })
    }

    pub async fn booking(&self, booking_id: &str) -> Result<Booking, Error> {
        self.store
            .get(COLLECTION_BOOKINGS, booking_id)
            .await?
            .map(Booking::from_stored)
            .transpose()?
            .ok_or_else(|| Error::not_found(&format!("Booking {booking_id}")))
    }

    // Other users' notifications are reported as missing.
    async fn owned_notification(
        &self,
        user_id: &str,
        notification_id: &str,
    ) -> Result<Notification, Error> {
        self.store
            .get(COLLECTION_NOTIFICATIONS, notification_id)
            .await?
            .map(Notification::from_stored)
            .transpose()?
            .filter(|notification| notification.is_addressed_to(user_id))
            .ok_or_else(|| Error::not_found(&format!("Notification {notification_id}")))
    }
}
