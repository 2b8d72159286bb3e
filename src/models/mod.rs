pub mod booking;
pub mod notification;
pub mod outbound_notification;
