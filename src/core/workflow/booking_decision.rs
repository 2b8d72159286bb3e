use std::sync::Arc;
use std::time::Duration;

use bson::Document;
use strum_macros::Display;

use super::in_flight::InFlightBookings;
use crate::constants::{
    COLLECTION_BOOKINGS, COLLECTION_NOTIFICATIONS, COLLECTION_OUTBOUND_NOTIFICATIONS,
    FIELD_STATUS, FIELD_TYPE,
};
use crate::core::store::DocumentStore;
use crate::enums::{Decision, ReadStatus};
use crate::errors::Error;
use crate::models::booking::Booking;
use crate::models::outbound_notification::OutboundNotification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub booking_id: String,
    pub decision: Decision,
    /// Absent when the booking has no owning user to notify.
    pub outbound_notification_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
enum Step {
    BookingStatus,
    NotificationType,
    BookingOwner,
    OutboundNotification,
}

/// Applies an owner's accept/reject decision to a booking.
///
/// The writes are sequential and not atomic: a failure part-way leaves the
/// earlier writes in place and nothing is rolled back. At most one decision
/// per booking id runs at a time within the process.
pub struct BookingWorkflow {
    store: Arc<dyn DocumentStore>,
    in_flight: Arc<InFlightBookings>,
    step_timeout: Option<Duration>,
}

impl BookingWorkflow {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        in_flight: Arc<InFlightBookings>,
        step_timeout: Option<Duration>,
    ) -> Self {
        Self {
            store,
            in_flight,
            step_timeout,
        }
    }

    pub fn in_flight(&self) -> &Arc<InFlightBookings> {
        &self.in_flight
    }

    pub async fn decide(
        &self,
        booking_id: &str,
        decision: Decision,
        notification_id: &str,
    ) -> Result<DecisionOutcome, Error> {
        let Some(_guard) = self.in_flight.try_acquire(booking_id) else {
            tracing::debug!("booking {booking_id} already has a decision in flight");
            return Err(Error::conflict(&format!(
                "Booking {booking_id} is already being updated"
            )));
        };

        let mut completed = Vec::new();
        let result = self
            .apply(booking_id, decision, notification_id, &mut completed)
            .await;

        match &result {
            Ok(outcome) => tracing::info!(
                "booking {booking_id} {decision}, outbound notification: {:?}",
                outcome.outbound_notification_id
            ),
            Err(e) if completed.is_empty() => {
                tracing::warn!("booking {booking_id} {decision} failed before any write: {e}")
            }
            Err(e) => tracing::warn!(
                "booking {booking_id} {decision} failed after {}; earlier writes are kept: {e}",
                completed
                    .iter()
                    .map(Step::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }

        result
    }

    async fn apply(
        &self,
        booking_id: &str,
        decision: Decision,
        notification_id: &str,
        completed: &mut Vec<Step>,
    ) -> Result<DecisionOutcome, Error> {
        let mut booking_update = Document::new();
        booking_update.insert(FIELD_STATUS, decision.to_string());
        self.bounded(
            self.store
                .update_fields(COLLECTION_BOOKINGS, booking_id, booking_update),
        )
        .await?;
        completed.push(Step::BookingStatus);

        // Re-surface the item in the owner's own feed.
        let mut notification_update = Document::new();
        notification_update.insert(FIELD_TYPE, decision.to_string());
        notification_update.insert(FIELD_STATUS, ReadStatus::Unread.to_string());
        self.bounded(self.store.update_fields(
            COLLECTION_NOTIFICATIONS,
            notification_id,
            notification_update,
        ))
        .await?;
        completed.push(Step::NotificationType);

        let owner_id = self
            .bounded(self.store.get(COLLECTION_BOOKINGS, booking_id))
            .await?
            .map(Booking::from_stored)
            .transpose()?
            .and_then(|booking| booking.user_id);
        completed.push(Step::BookingOwner);

        let Some(owner_id) = owner_id else {
            tracing::debug!("booking {booking_id} has no owning user, nothing to send");
            return Ok(DecisionOutcome {
                booking_id: booking_id.to_string(),
                decision,
                outbound_notification_id: None,
            });
        };

        let outbound = OutboundNotification::for_decision(booking_id, &owner_id, decision)
            .into_new_document()?;
        let outbound_id = self
            .bounded(self.store.add(COLLECTION_OUTBOUND_NOTIFICATIONS, outbound))
            .await?;
        completed.push(Step::OutboundNotification);

        Ok(DecisionOutcome {
            booking_id: booking_id.to_string(),
            decision,
            outbound_notification_id: Some(outbound_id),
        })
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        match self.step_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| Error::Timeout(limit.as_millis() as u64))?,
            None => call.await,
        }
    }
}
