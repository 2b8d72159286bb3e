use crate::app_state::AppState;
use crate::config::APP_CONFIG;
use crate::routes;
use crate::api_docs::ApiDoc;
use crate::core::middleware::http_logger::{HttpLoggerState, http_logger};
use axum::{Router, middleware};
use http::header;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::MakeRequestUuid;
use tower_http::{ServiceBuilderExt, cors::CorsLayer, propagate_header::PropagateHeaderLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

/// Routes and OpenAPI docs over `app_state`, without the HTTP middleware.
pub fn create_router(app_state: AppState, swagger_enabled: bool) -> Router {
    let (mut router, api) = OpenApiRouter::<AppState>::with_openapi(ApiDoc::openapi())
        .nest("/health", routes::health::route::create_route())
        .nest(
            "/api/v1",
            OpenApiRouter::new()
                .merge(routes::notification::route::create_route())
                .merge(routes::booking::route::create_route()),
        )
        .with_state(app_state)
        .split_for_parts();

    if swagger_enabled {
        let config = utoipa_swagger_ui::Config::new(["/"]).display_request_duration(true);
        let swagger_ui = SwaggerUi::new("/swagger-ui").url("/", api).config(config);
        router = router.merge(swagger_ui);
    }

    router
}

pub async fn create_app() -> eyre::Result<Router> {
    let app_state = AppState::init().await?;
    let logger_state = HttpLoggerState {
        jwt_secret: app_state.jwt_secret.clone(),
        app_env: APP_CONFIG.app_env.clone(),
    };
    let router = create_router(app_state, APP_CONFIG.swagger_enabled);

    let cors_layer = if let Some(whitelist) = &APP_CONFIG.cors_origin_whitelist {
        let origins = whitelist
            .iter()
            .map(|origin| origin.parse::<http::HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_headers(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .expose_headers(tower_http::cors::Any)
            .allow_origin(origins)
    } else {
        CorsLayer::permissive()
    };

    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(
            "x-request-id",
        )))
        .sensitive_request_headers(sensitive_headers.clone())
        .layer(middleware::from_fn_with_state(logger_state, http_logger))
        .sensitive_response_headers(sensitive_headers)
        .compression()
        .layer(cors_layer);

    let router = Router::new().merge(router).layer(middleware);
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COLLECTION_BOOKINGS, COLLECTION_NOTIFICATIONS};
    use crate::core::inbox::InboxSettings;
    use crate::core::jwt_auth::jwt_auth::{JwtSecret, generate_jwt};
    use crate::core::notices::Notice;
    use crate::core::store::memory::MemoryStore;
    use crate::test_support::{Op, RecordingStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bson::doc;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tokio::sync::broadcast::error::TryRecvError;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    async fn harness() -> (Router, Arc<RecordingStore>, AppState) {
        let store = MemoryStore::new();
        store
            .put(COLLECTION_BOOKINGS, "b1", doc! { "userId": "driver-7", "status": "pending" })
            .await;
        store
            .put(
                COLLECTION_NOTIFICATIONS,
                "n1",
                doc! { "to": "owner", "bookingId": "b1", "type": "pending", "status": "unread" },
            )
            .await;
        let store = Arc::new(RecordingStore::new(store));
        let state = AppState::new(
            store.clone(),
            InboxSettings::default(),
            JwtSecret::new(SECRET),
        );
        (create_router(state.clone(), false), store, state)
    }

    async fn router() -> Router {
        harness().await.0
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let token = generate_jwt("owner", &JwtSecret::new(SECRET), 3600).unwrap();
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn requests_without_a_token_are_signed_out() {
        let app = router().await;
        let request = Request::builder()
            .uri("/api/v1/notifications")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 40004);
        assert_eq!(body["message"], "Unauthorized error: User not logged in");
    }

    #[tokio::test]
    async fn health_check_answers_ok() {
        let app = router().await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn inbox_lists_pending_cards_with_enabled_actions() {
        let app = router().await;

        let (status, body) = send(&app, request("GET", "/api/v1/notifications", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "feed");
        let card = &body["cards"][0];
        assert_eq!(card["id"], "n1");
        assert_eq!(card["message"], "Customer booking is pending approval");
        assert_eq!(card["accentColor"], "#FF9800");
        assert_eq!(card["actions"]["enabled"], true);
    }

    #[tokio::test]
    async fn deciding_updates_the_booking_and_the_card() {
        let app = router().await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/v1/bookings/b1/decision",
                Some(json!({ "decision": "accepted", "notificationId": "n1" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "accepted");
        assert_eq!(body["notice"], "Booking accepted successfully");
        assert!(body["outboundNotificationId"].is_string());

        let (_, booking) = send(&app, request("GET", "/api/v1/bookings/b1", None)).await;
        assert_eq!(booking["status"], "accepted");

        let (_, view) = send(&app, request("GET", "/api/v1/notifications", None)).await;
        assert_eq!(view["cards"][0]["kind"], "accepted");
        assert!(view["cards"][0]["actions"].is_null());
    }

    #[tokio::test]
    async fn decision_requires_a_notification_id() {
        let app = router().await;

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/api/v1/bookings/b1/decision",
                Some(json!({ "decision": "rejected", "notificationId": "" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn opening_routes_to_the_booking_and_marks_read() {
        let app = router().await;

        let (status, body) =
            send(&app, request("POST", "/api/v1/notifications/n1/open", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"]["path"], "/api/v1/bookings/b1");
        let (_, view) = send(&app, request("GET", "/api/v1/notifications", None)).await;
        assert_eq!(view["cards"][0]["unread"], false);
    }

    #[tokio::test]
    async fn deleting_the_last_notification_leaves_the_empty_state() {
        let app = router().await;

        let response = app
            .clone()
            .oneshot(request("DELETE", "/api/v1/notifications/n1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let (_, view) = send(&app, request("GET", "/api/v1/notifications", None)).await;
        assert_eq!(view["view"], "empty");
        assert_eq!(view["title"], "No notifications");
    }

    #[tokio::test]
    async fn unknown_notifications_are_not_found() {
        let app = router().await;
        let (status, _) = send(&app, request("DELETE", "/api/v1/notifications/nope", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn second_decision_while_one_runs_conflicts_without_a_notice() {
        let (app, store, state) = harness().await;
        let release = store.hold_updates(COLLECTION_BOOKINGS);
        let mut notices = state.inbox.notices().subscribe("owner");
        let decision = json!({ "decision": "accepted", "notificationId": "n1" });

        let first = tokio::spawn({
            let app = app.clone();
            let pending = request(
                "POST",
                "/api/v1/bookings/b1/decision",
                Some(decision.clone()),
            );
            async move { app.oneshot(pending).await.unwrap().status() }
        });
        while !state.inbox.in_flight().contains("b1") {
            tokio::task::yield_now().await;
        }

        let (status, body) = send(
            &app,
            request("POST", "/api/v1/bookings/b1/decision", Some(decision)),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 40006);
        assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));

        release.notify_one();
        assert_eq!(first.await.unwrap(), StatusCode::OK);
        assert_eq!(
            notices.recv().await.unwrap(),
            Notice::info("Booking accepted successfully")
        );
        assert_eq!(store.writes(Op::Update, COLLECTION_BOOKINGS), 1);
    }

    #[tokio::test]
    async fn stream_opens_with_the_loading_view() {
        let app = router().await;

        let response = app
            .oneshot(request("GET", "/api/v1/notifications/stream", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        let frame = response
            .into_body()
            .frame()
            .await
            .unwrap()
            .unwrap()
            .into_data()
            .unwrap();
        let text = String::from_utf8_lossy(&frame);
        assert!(text.starts_with("event: view\n"), "{text}");
        assert!(text.contains(r#""view":"loading""#), "{text}");
    }

    #[tokio::test]
    async fn failed_live_query_ends_the_stream_with_an_error_event() {
        let (app, store, _state) = harness().await;
        store.fail(Op::Watch, COLLECTION_NOTIFICATIONS);

        let response = app
            .oneshot(request("GET", "/api/v1/notifications/stream", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Collecting completes only once the event stream has ended.
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8_lossy(&bytes);
        let events: Vec<&str> = text.trim_end().split("\n\n").collect();

        assert_eq!(events.len(), 3, "{text}");
        assert!(events[0].contains(r#""view":"loading""#));
        assert!(events[1].contains(r#""view":"feed""#));
        assert!(events[2].starts_with("event: error\n"));
        assert!(events[2].contains("injected Watch failure"));
    }
}
