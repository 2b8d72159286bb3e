use serde::Serialize;
use utoipa::ToSchema;

use crate::core::actions::BookingRoute;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenNotificationResponseDto {
    pub notification_id: String,
    /// Absent for notifications that do not reference a booking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<BookingRoute>,
}
