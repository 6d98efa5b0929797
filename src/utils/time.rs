use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Human-readable schedule timestamp used in conflict and progression
/// messages shown verbatim to employers.
pub fn format_schedule(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}
