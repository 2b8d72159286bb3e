use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use validator::Validate;

use crate::app_state::AppState;
use crate::core::inbox::NotificationInbox;
use crate::core::jwt_auth::jwt_auth::JwtAuth;
use crate::errors::Error;
use crate::models::booking::Booking;
use crate::routes::booking::dto::{DecisionRequestDto, DecisionResponseDto};

pub fn create_route() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(decide_booking))
        .routes(routes!(get_booking))
}

#[utoipa::path(
    description = "Accepts or rejects a pending booking from one of the owner's notifications. A decision already running for the same booking is refused with 409.",
    summary = "Decide on a booking",
    post,
    request_body(
        content = DecisionRequestDto,
        content_type = "application/json",
    ),
    tag = "Booking APIs",
    path = "/bookings/{booking_id}/decision",
    params(
        ("booking_id" = String, Path, description = "Booking id"),
    ),
    responses(
        (status = 200, description = "Decision applied", body = DecisionResponseDto),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Decision already in progress"),
        (status = 500, description = "Internal Server Error"),
        (status = 504, description = "Store call timed out"),
    ),
    security(
    ("bearer_auth" = [])
    )
)]
pub async fn decide_booking(
    State(inbox): State<Arc<NotificationInbox>>,
    JwtAuth(claims): JwtAuth,
    Path(booking_id): Path<String>,
    Json(request): Json<DecisionRequestDto>,
) -> Result<Json<DecisionResponseDto>, Error> {
    request
        .validate()
        .map_err(|e| Error::bad_request(&format!("Invalid decision request: {e}")))?;

    let outcome = inbox
        .decide(
            &claims.user_id,
            &booking_id,
            request.decision,
            &request.notification_id,
        )
        .await?;

    Ok(Json(outcome.into()))
}

#[utoipa::path(
    summary = "Get booking",
    get,
    tag = "Booking APIs",
    path = "/bookings/{booking_id}",
    params(
        ("booking_id" = String, Path, description = "Booking id"),
    ),
    responses(
        (status = 200, description = "Booking detail", body = Booking),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Server Error"),
    ),
    security(
    ("bearer_auth" = [])
    )
)]
pub async fn get_booking(
    State(inbox): State<Arc<NotificationInbox>>,
    JwtAuth(_claims): JwtAuth,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, Error> {
    Ok(Json(inbox.booking(&booking_id).await?))
}
