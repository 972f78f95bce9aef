//! "How long ago" labels for alert timestamps.

use serde::{Deserialize, Serialize};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Language of user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

/// Label for the time elapsed from `event_millis` to `now_millis` in the
/// default locale.
pub fn relative_time(now_millis: i64, event_millis: i64) -> String {
    relative_time_in(Locale::default(), now_millis, event_millis)
}

/// Bucketed label for the elapsed time. Events in the future read as "now".
pub fn relative_time_in(locale: Locale, now_millis: i64, event_millis: i64) -> String {
    let secs = now_millis.saturating_sub(event_millis).max(0) / 1000;

    match locale {
        Locale::Vi => match secs {
            s if s < 5 => "Ngay bây giờ".to_string(),
            s if s < MINUTE => format!("{} giây trước", s),
            s if s < 2 * MINUTE => "1 phút trước".to_string(),
            s if s < HOUR => format!("{} phút trước", s / MINUTE),
            s if s < 2 * HOUR => "1 giờ trước".to_string(),
            s if s < DAY => format!("{} giờ trước", s / HOUR),
            s => format!("{} ngày trước", s / DAY),
        },
        Locale::En => match secs {
            s if s < 5 => "now".to_string(),
            s if s < MINUTE => format!("{} seconds ago", s),
            s if s < 2 * MINUTE => "1 minute ago".to_string(),
            s if s < HOUR => format!("{} minutes ago", s / MINUTE),
            s if s < 2 * HOUR => "1 hour ago".to_string(),
            s if s < DAY => format!("{} hours ago", s / HOUR),
            s => format!("{} days ago", s / DAY),
        },
    }
}
