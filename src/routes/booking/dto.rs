use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::workflow::booking_decision::DecisionOutcome;
use crate::enums::Decision;

#[derive(Debug, Deserialize, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequestDto {
    pub decision: Decision,
    /// The pending notification the decision was taken from.
    #[validate(length(min = 1))]
    pub notification_id: String,
}

#[derive(Debug, Serialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponseDto {
    pub booking_id: String,
    pub status: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_notification_id: Option<String>,
    pub notice: String,
}

impl From<DecisionOutcome> for DecisionResponseDto {
    fn from(outcome: DecisionOutcome) -> Self {
        Self {
            notice: format!("Booking {} successfully", outcome.decision),
            booking_id: outcome.booking_id,
            status: outcome.decision,
            outbound_notification_id: outcome.outbound_notification_id,
        }
    }
}
