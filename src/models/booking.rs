use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::store::StoredDocument;
use crate::errors::Error;

/// The slice of an externally owned booking this service reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(skip_deserializing)]
    pub id: String,
    /// Owning end user, the recipient of decision notifications.
    pub user_id: Option<String>,
    pub status: Option<String>,
}

impl Booking {
    pub fn from_stored(document: StoredDocument) -> Result<Self, Error> {
        let mut booking: Booking = bson::from_document(document.fields)?;
        booking.id = document.id;
        Ok(booking)
    }
}
