//! Pure projection from notifications to what the inbox shows.

pub mod mapper;
pub mod time_ago;
pub mod view;
