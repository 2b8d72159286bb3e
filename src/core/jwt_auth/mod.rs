#[allow(clippy::module_inception)]
pub mod jwt_auth;
pub mod types;
