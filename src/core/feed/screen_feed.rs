use std::sync::Arc;

use axum::response::sse::Event;
use chrono::Utc;
use futures::StreamExt;
use tokio::sync::{broadcast, watch};

use super::subscriber::NotificationStream;
use crate::core::notices::Notice;
use crate::core::workflow::in_flight::InFlightBookings;
use crate::errors::Error;
use crate::models::notification::Notification;
use crate::presentation::view::{ScreenView, project};

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenUpdate {
    View(ScreenView),
    Notice(Notice),
}

impl ScreenUpdate {
    pub fn into_event(self) -> Result<Event, axum::Error> {
        match self {
            ScreenUpdate::View(view) => Event::default().event("view").json_data(view),
            ScreenUpdate::Notice(notice) => Event::default().event("notice").json_data(notice),
        }
    }
}

enum Wake {
    Snapshot(Option<Result<Vec<Notification>, Error>>),
    InFlight,
    Notice(Result<Notice, broadcast::error::RecvError>),
}

/// Live inbox for one user: re-projects the view whenever a snapshot arrives
/// or the in-flight set changes, and forwards that user's notices.
pub struct ScreenFeed {
    user_id: String,
    notifications: NotificationStream,
    in_flight: Arc<InFlightBookings>,
    in_flight_changes: watch::Receiver<u64>,
    notices: broadcast::Receiver<Notice>,
    latest: Option<Vec<Notification>>,
    started: bool,
}

impl ScreenFeed {
    pub fn new(
        user_id: &str,
        notifications: NotificationStream,
        in_flight: Arc<InFlightBookings>,
        notices: broadcast::Receiver<Notice>,
    ) -> Self {
        let in_flight_changes = in_flight.subscribe();
        Self {
            user_id: user_id.to_string(),
            notifications,
            in_flight,
            in_flight_changes,
            notices,
            latest: None,
            started: false,
        }
    }

    pub fn render(&self) -> ScreenView {
        project(
            Some(self.user_id.as_str()),
            self.latest.as_deref(),
            &self.in_flight.snapshot(),
            Utc::now(),
        )
    }

    /// Next update, starting with a `Loading` view. `None` once the
    /// underlying subscription has ended.
    pub async fn next_update(&mut self) -> Option<Result<ScreenUpdate, Error>> {
        if !self.started {
            self.started = true;
            return Some(Ok(ScreenUpdate::View(self.render())));
        }

        loop {
            let wake = tokio::select! {
                snapshot = self.notifications.next() => Wake::Snapshot(snapshot),
                Ok(()) = self.in_flight_changes.changed() => Wake::InFlight,
                notice = self.notices.recv() => Wake::Notice(notice),
            };

            match wake {
                Wake::Snapshot(None) => return None,
                Wake::Snapshot(Some(Err(e))) => return Some(Err(e)),
                Wake::Snapshot(Some(Ok(notifications))) => {
                    self.latest = Some(notifications);
                    return Some(Ok(ScreenUpdate::View(self.render())));
                }
                // Nothing to redraw before the first snapshot.
                Wake::InFlight if self.latest.is_none() => continue,
                Wake::InFlight => return Some(Ok(ScreenUpdate::View(self.render()))),
                Wake::Notice(Ok(notice)) => return Some(Ok(ScreenUpdate::Notice(notice))),
                Wake::Notice(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    tracing::debug!("feed of {} skipped {skipped} notices", self.user_id);
                    continue;
                }
                Wake::Notice(Err(broadcast::error::RecvError::Closed)) => return None,
            }
        }
    }
}
