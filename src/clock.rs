use chrono::{DateTime, Utc};

pub fn format_utc_time(now: DateTime<Utc>) -> String {
    now.format("%H:%M:%S UTC").to_string()
}

pub fn utc_now_label() -> String {
    format_utc_time(Utc::now())
}
