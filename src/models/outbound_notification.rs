use bson::DateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::FIELD_TIMESTAMP;
use crate::core::store::NewDocument;
use crate::enums::{Decision, ReadStatus};
use crate::errors::Error;

/// Message to a booking's owner, written to `notifications_to_send` when the
/// station owner decides on the booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OutboundNotification {
    #[validate(length(min = 1))]
    pub booking_id: String,
    #[validate(length(min = 1))]
    pub to: String,
    pub message: String,
    pub status: ReadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime>,
}

impl OutboundNotification {
    pub fn for_decision(booking_id: &str, owner_id: &str, decision: Decision) -> Self {
        Self {
            booking_id: booking_id.to_string(),
            to: owner_id.to_string(),
            message: decision.outbound_message().to_string(),
            status: ReadStatus::Unread,
            timestamp: None,
        }
    }

    /// Document ready for insertion; the store stamps `timestamp`.
    pub fn into_new_document(self) -> Result<NewDocument, Error> {
        self.validate()
            .map_err(|e| Error::bad_request(&format!("Validation db error: {e:?}")))?;

        Ok(NewDocument::new(bson::to_document(&self)?).with_server_timestamp(FIELD_TIMESTAMP))
    }
}
