pub mod api_docs;
pub mod app;
pub mod app_state;
pub mod config;
pub mod constants;
pub mod core;
pub mod database;
pub mod enums;
pub mod errors;
pub mod models;
pub mod presentation;
pub mod routes;
pub mod utils;

#[cfg(test)]
mod test_support;
