//! Type-to-display lookups. Raw stored types go through
//! [`NotificationKind::from_type`], which falls back to the pending
//! treatment for anything it does not recognise.

use serde::Serialize;
use utoipa::ToSchema;

use crate::enums::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Positive,
    Negative,
    Neutral,
}

impl Accent {
    pub fn color_hex(&self) -> &'static str {
        match self {
            Accent::Positive => "#4CAF50",
            Accent::Negative => "#F44336",
            Accent::Neutral => "#FF9800",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    CheckCircle,
    Cancel,
    HourglassBottom,
}

impl NotificationKind {
    pub fn accent(&self) -> Accent {
        match self {
            NotificationKind::Accepted => Accent::Positive,
            NotificationKind::Rejected => Accent::Negative,
            NotificationKind::Pending => Accent::Neutral,
        }
    }

    pub fn icon(&self) -> StatusIcon {
        match self {
            NotificationKind::Accepted => StatusIcon::CheckCircle,
            NotificationKind::Rejected => StatusIcon::Cancel,
            NotificationKind::Pending => StatusIcon::HourglassBottom,
        }
    }

    pub fn display_message(&self) -> &'static str {
        match self {
            NotificationKind::Accepted => "Customer booking has been accepted",
            NotificationKind::Rejected => "Customer booking has been rejected",
            NotificationKind::Pending => "Customer booking is pending approval",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_map_case_insensitively() {
        let accepted = NotificationKind::from_type(Some("ACCEPTED"));
        assert_eq!(accepted.accent(), Accent::Positive);
        assert_eq!(accepted.icon(), StatusIcon::CheckCircle);
        assert_eq!(accepted.display_message(), "Customer booking has been accepted");

        let rejected = NotificationKind::from_type(Some("Rejected"));
        assert_eq!(rejected.accent(), Accent::Negative);
        assert_eq!(rejected.icon(), StatusIcon::Cancel);
        assert_eq!(rejected.display_message(), "Customer booking has been rejected");
    }

    #[test]
    fn everything_else_gets_the_pending_treatment() {
        for raw in [None, Some("pending"), Some(""), Some("cancelled"), Some(" accepted")] {
            let kind = NotificationKind::from_type(raw);
            assert_eq!(kind.accent(), Accent::Neutral, "{raw:?}");
            assert_eq!(kind.icon(), StatusIcon::HourglassBottom, "{raw:?}");
            assert_eq!(
                kind.display_message(),
                "Customer booking is pending approval",
                "{raw:?}"
            );
        }
    }

    #[test]
    fn accents_have_distinct_colors() {
        assert_eq!(Accent::Positive.color_hex(), "#4CAF50");
        assert_eq!(Accent::Negative.color_hex(), "#F44336");
        assert_eq!(Accent::Neutral.color_hex(), "#FF9800");
    }
}
