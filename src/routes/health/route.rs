use utoipa_axum::{router::OpenApiRouter, routes};

use crate::app_state::AppState;

pub fn create_route() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

#[utoipa::path(
  get,
  path = "/",
  tag = "Health",
  description = "Liveness probe. Does not touch the document store.",
  responses(
      (status = 200, description = "Service is up", body = String, example = "OK"),
  )
)]
async fn health_check() -> &'static str {
    "OK"
}
