use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

/// Booking ids with a status update in progress.
///
/// Membership is held through [`InFlightGuard`], so an id leaves the set on
/// every exit path of the holder, including errors and cancellation.
/// Observers can await [`InFlightBookings::subscribe`] to re-render when the
/// set changes.
#[derive(Debug)]
pub struct InFlightBookings {
    bookings: Mutex<HashSet<String>>,
    revision: watch::Sender<u64>,
}

impl Default for InFlightBookings {
    fn default() -> Self {
        Self::new()
    }
}

impl InFlightBookings {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            bookings: Mutex::new(HashSet::new()),
            revision,
        }
    }

    /// Marks `booking_id` in-flight, or returns `None` if it already is.
    pub fn try_acquire(self: &Arc<Self>, booking_id: &str) -> Option<InFlightGuard> {
        if !self.bookings.lock().insert(booking_id.to_string()) {
            return None;
        }
        self.bump();

        Some(InFlightGuard {
            bookings: Arc::clone(self),
            booking_id: booking_id.to_string(),
        })
    }

    pub fn contains(&self, booking_id: &str) -> bool {
        self.bookings.lock().contains(booking_id)
    }

    pub fn snapshot(&self) -> HashSet<String> {
        self.bookings.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn release(&self, booking_id: &str) {
        if self.bookings.lock().remove(booking_id) {
            self.bump();
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    bookings: Arc<InFlightBookings>,
    booking_id: String,
}

impl InFlightGuard {
    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.bookings.release(&self.booking_id);
    }
}
