pub mod screen_feed;
pub mod subscriber;
