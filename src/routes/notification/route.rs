use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::app_state::AppState;
use crate::core::feed::screen_feed::ScreenFeed;
use crate::core::inbox::NotificationInbox;
use crate::core::jwt_auth::jwt_auth::JwtAuth;
use crate::errors::Error;
use crate::presentation::view::ScreenView;
use crate::routes::notification::dto::OpenNotificationResponseDto;

pub fn create_route() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_notifications))
        .routes(routes!(stream_notifications))
        .routes(routes!(open_notification))
        .routes(routes!(delete_notification))
}

#[utoipa::path(
    description = "Current inbox of the signed-in station owner, newest first.",
    summary = "Get notification inbox",
    get,
    tag = "Notification APIs",
    path = "/notifications",
    responses(
        (status = 200, description = "Projected inbox view", body = ScreenView),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Server Error"),
    ),
    security(
    ("bearer_auth" = [])
    )
)]
pub async fn list_notifications(
    State(inbox): State<Arc<NotificationInbox>>,
    JwtAuth(claims): JwtAuth,
) -> Result<Json<ScreenView>, Error> {
    let view = inbox.current_view(&claims.user_id).await?;
    Ok(Json(view))
}

#[utoipa::path(
    description = "Server-sent events carrying `view` updates of the inbox and transient `notice` messages. The first event is always the loading view.",
    summary = "Stream notification inbox",
    get,
    tag = "Notification APIs",
    path = "/notifications/stream",
    responses(
        (status = 200, description = "Event stream", body = String, content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal Server Error"),
    ),
    security(
    ("bearer_auth" = [])
    )
)]
pub async fn stream_notifications(
    State(inbox): State<Arc<NotificationInbox>>,
    JwtAuth(claims): JwtAuth,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let feed = inbox.screen_feed(&claims.user_id).await?;
    Ok(Sse::new(feed_events(feed)).keep_alive(KeepAlive::default()))
}

// A failed subscription is reported once as an `error` event, then the
// stream ends and the client reconnects.
fn feed_events(feed: ScreenFeed) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(Some(feed), |feed| async move {
        let mut feed = feed?;
        let event = match feed.next_update().await? {
            Ok(update) => match update.into_event() {
                Ok(event) => return Some((Ok(event), Some(feed))),
                Err(e) => Event::default().event("error").data(e.to_string()),
            },
            Err(e) => {
                tracing::warn!("notification feed failed: {e}");
                Event::default().event("error").data(e.to_string())
            }
        };
        Some((Ok(event), None))
    })
}

#[utoipa::path(
    description = "Marks a booking notification read and returns the booking it routes to. Notifications without a booking are left untouched.",
    summary = "Open notification",
    post,
    tag = "Notification APIs",
    path = "/notifications/{notification_id}/open",
    params(
        ("notification_id" = String, Path, description = "Notification id"),
    ),
    responses(
        (status = 200, description = "Notification opened", body = OpenNotificationResponseDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Server Error"),
    ),
    security(
    ("bearer_auth" = [])
    )
)]
pub async fn open_notification(
    State(inbox): State<Arc<NotificationInbox>>,
    JwtAuth(claims): JwtAuth,
    Path(notification_id): Path<String>,
) -> Result<Json<OpenNotificationResponseDto>, Error> {
    let route = inbox.open(&claims.user_id, &notification_id).await?;
    Ok(Json(OpenNotificationResponseDto {
        notification_id,
        route,
    }))
}

#[utoipa::path(
    summary = "Delete notification",
    delete,
    tag = "Notification APIs",
    path = "/notifications/{notification_id}",
    params(
        ("notification_id" = String, Path, description = "Notification id"),
    ),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Internal Server Error"),
    ),
    security(
    ("bearer_auth" = [])
    )
)]
pub async fn delete_notification(
    State(inbox): State<Arc<NotificationInbox>>,
    JwtAuth(claims): JwtAuth,
    Path(notification_id): Path<String>,
) -> Result<StatusCode, Error> {
    inbox.delete(&claims.user_id, &notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
