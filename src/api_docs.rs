use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::HttpAuthScheme;
use utoipa::openapi::security::HttpBuilder;
use utoipa::openapi::security::SecurityScheme;

use crate::core::actions::BookingRoute;
use crate::core::notices::{Notice, NoticeLevel};
use crate::enums::{Decision, NotificationKind};
use crate::models::booking::Booking;
use crate::presentation::mapper::{Accent, StatusIcon};
use crate::presentation::view::{DecisionActions, NotificationCard, ScreenView};
use crate::routes::booking::dto::{DecisionRequestDto, DecisionResponseDto};
use crate::routes::notification::dto::OpenNotificationResponseDto;

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityModifier),
    servers(
        (url = "/"),
    ),
    components(
        schemas(
            // Inbox view
            ScreenView,
            NotificationCard,
            DecisionActions,
            NotificationKind,
            Accent,
            StatusIcon,
            Notice,
            NoticeLevel,

            // Notification DTOs
            OpenNotificationResponseDto,
            BookingRoute,

            // Booking DTOs
            Booking,
            Decision,
            DecisionRequestDto,
            DecisionResponseDto,
        )
    ),
    tags(
        (name = "Notification APIs", description = "Station owner notification inbox"),
        (name = "Booking APIs", description = "Booking decisions and detail"),
        (name = "Health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

struct SecurityModifier;
impl Modify for SecurityModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
