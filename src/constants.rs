//! Collection and field names as persisted in the document store.

pub const COLLECTION_NOTIFICATIONS: &str = "notifications";
pub const COLLECTION_BOOKINGS: &str = "bookings";
pub const COLLECTION_OUTBOUND_NOTIFICATIONS: &str = "notifications_to_send";

pub const FIELD_TO: &str = "to";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_TIMESTAMP: &str = "timestamp";
