use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, VariantNames};
use utoipa::ToSchema;

/// Owner decision on a pending booking. Also the value written to the
/// booking's `status` and the originating notification's `type`.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    EnumString,
    VariantNames,
    Display,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    /// Copy sent to the booking's owner.
    pub fn outbound_message(&self) -> &'static str {
        match self {
            Decision::Accepted => "Your booking request has been accepted",
            Decision::Rejected => "Your booking request has been rejected",
        }
    }
}

/// Closed set of notification types. Storage keeps a free-form string;
/// anything unrecognised reads as `Pending`.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    EnumString,
    VariantNames,
    Display,
    PartialEq,
    Eq,
    Hash,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationKind {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl NotificationKind {
    pub fn from_type(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    EnumString,
    VariantNames,
    Display,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReadStatus {
    Unread,
    Read,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing_is_case_insensitive_with_pending_fallback() {
        assert_eq!(NotificationKind::from_type(Some("ACCEPTED")), NotificationKind::Accepted);
        assert_eq!(NotificationKind::from_type(Some("Rejected")), NotificationKind::Rejected);
        assert_eq!(NotificationKind::from_type(Some("cancelled")), NotificationKind::Pending);
        assert_eq!(NotificationKind::from_type(Some("")), NotificationKind::Pending);
        assert_eq!(NotificationKind::from_type(None), NotificationKind::Pending);
    }

    #[test]
    fn decision_round_trips_through_storage_strings() {
        assert_eq!(Decision::Accepted.to_string(), "accepted");
        assert_eq!("rejected".parse::<Decision>().ok(), Some(Decision::Rejected));
        assert!("pending".parse::<Decision>().is_err());
        assert!(Decision::Rejected.outbound_message().contains("rejected"));
    }
}
