use chrono::{DateTime, Utc};

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

pub fn to_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

/// Whole seconds elapsed between `since` and `now`, never negative.
pub fn age_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - since).num_seconds().max(0) as u64
}
