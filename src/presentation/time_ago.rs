use chrono::{DateTime, Utc};

/// Relative age label: whole minutes, hours or days, truncated.
pub fn format_time_ago(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp else {
        return String::new();
    };

    let age = now.signed_duration_since(timestamp);
    if age.num_minutes() < 1 {
        return "Just now".to_string();
    }
    if age.num_minutes() < 60 {
        return format!("{} min ago", age.num_minutes());
    }
    if age.num_hours() < 24 {
        return format!("{} hrs ago", age.num_hours());
    }

    let days = age.num_days();
    format!("{days} day{} ago", if days > 1 { "s" } else { "" })
}
