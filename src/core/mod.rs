pub mod actions;
pub mod feed;
pub mod inbox;
pub mod jwt_auth;
pub mod middleware;
pub mod notices;
pub mod store;
pub mod workflow;
