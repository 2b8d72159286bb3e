use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::mapper::{Accent, StatusIcon};
use super::time_ago::format_time_ago;
use crate::enums::NotificationKind;
use crate::models::notification::Notification;

pub const SIGNED_OUT_MESSAGE: &str = "User not logged in";
pub const EMPTY_TITLE: &str = "No notifications";
pub const EMPTY_HINT: &str = "You'll see updates about your bookings here";

/// Everything a client needs to draw the inbox, with no layout decisions.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum ScreenView {
    SignedOut { message: String },
    Loading,
    Empty { title: String, hint: String },
    Feed { cards: Vec<NotificationCard> },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCard {
    pub id: String,
    pub booking_id: Option<String>,
    pub kind: NotificationKind,
    pub accent: Accent,
    pub accent_color: String,
    pub icon: StatusIcon,
    pub message: String,
    pub time_ago: String,
    pub unread: bool,
    /// Present only for pending items that reference a booking.
    pub actions: Option<DecisionActions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionActions {
    /// False while a decision for the booking is in flight.
    pub enabled: bool,
}

pub fn project(
    user_id: Option<&str>,
    snapshot: Option<&[Notification]>,
    in_flight: &HashSet<String>,
    now: DateTime<Utc>,
) -> ScreenView {
    if user_id.is_none() {
        return ScreenView::SignedOut {
            message: SIGNED_OUT_MESSAGE.to_string(),
        };
    }

    match snapshot {
        None => ScreenView::Loading,
        Some([]) => ScreenView::Empty {
            title: EMPTY_TITLE.to_string(),
            hint: EMPTY_HINT.to_string(),
        },
        Some(notifications) => ScreenView::Feed {
            cards: notifications
                .iter()
                .map(|notification| card(notification, in_flight, now))
                .collect(),
        },
    }
}

fn card(
    notification: &Notification,
    in_flight: &HashSet<String>,
    now: DateTime<Utc>,
) -> NotificationCard {
    let kind = notification.kind();
    let actions = notification
        .awaits_decision()
        .then(|| DecisionActions {
            enabled: notification
                .booking_id
                .as_ref()
                .is_some_and(|booking_id| !in_flight.contains(booking_id)),
        });

    NotificationCard {
        id: notification.id.clone(),
        booking_id: notification.booking_id.clone(),
        kind,
        accent: kind.accent(),
        accent_color: kind.accent().color_hex().to_string(),
        icon: kind.icon(),
        message: kind.display_message().to_string(),
        time_ago: format_time_ago(notification.created_at(), now),
        unread: notification.is_unread(),
        actions,
    }
}
