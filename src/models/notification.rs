use bson::DateTime;
use chrono::{DateTime as ChronoDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::store::StoredDocument;
use crate::enums::{NotificationKind, ReadStatus};
use crate::errors::Error;

/// A booking event addressed to one user, as stored in `notifications`.
/// Every field except the id is optional in storage; accessors apply the
/// defaults the inbox relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(skip)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Notification {
    pub fn from_stored(document: StoredDocument) -> Result<Self, Error> {
        let mut notification: Notification = bson::from_document(document.fields)?;
        notification.id = document.id;
        Ok(notification)
    }

    pub fn kind(&self) -> NotificationKind {
        NotificationKind::from_type(self.r#type.as_deref())
    }

    /// Missing status counts as unread; any value other than `unread` does not.
    pub fn is_unread(&self) -> bool {
        match self.status.as_deref() {
            None => true,
            Some(status) => status == ReadStatus::Unread.to_string(),
        }
    }

    pub fn is_addressed_to(&self, user_id: &str) -> bool {
        self.to.as_deref() == Some(user_id)
    }

    /// Only still-pending items that reference a booking offer accept/reject.
    /// Unrecognised types are displayed as pending but do not get actions.
    pub fn awaits_decision(&self) -> bool {
        self.booking_id.is_some()
            && self
                .r#type
                .as_deref()
                .unwrap_or("pending")
                .eq_ignore_ascii_case(&NotificationKind::Pending.to_string())
    }

    pub fn created_at(&self) -> Option<ChronoDateTime<Utc>> {
        self.timestamp.map(|timestamp| timestamp.to_chrono())
    }
}
