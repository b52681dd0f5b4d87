use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use serde_json::{Map, Value};

use crate::utils::time::{age_secs, now_utc, to_rfc3339};

/// A fetched value together with the moment it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSnapshot {
    pub value: Map<String, Value>,
    pub fetched_at: DateTime<Utc>,
}

impl CachedSnapshot {
    pub fn new(value: Map<String, Value>, fetched_at: DateTime<Utc>) -> Self {
        Self { value, fetched_at }
    }

    /// The cached fields plus `cached_at` and `age_seconds` as of `now`.
    pub fn to_payload(&self, now: DateTime<Utc>) -> Map<String, Value> {
        let mut payload = self.value.clone();
        payload.insert("cached_at".to_string(), Value::from(to_rfc3339(self.fetched_at)));
        payload.insert(
            "age_seconds".to_string(),
            Value::from(age_secs(self.fetched_at, now)),
        );
        payload
    }
}

/// Bounded TTL cache for location and weather snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    cache: Cache<String, CachedSnapshot>,
}

impl SnapshotCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let max_capacity = max_entries.max(1);
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub fn get(&self, key: &str) -> Option<CachedSnapshot> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: &str, value: Map<String, Value>) -> CachedSnapshot {
        let snapshot = CachedSnapshot::new(value, now_utc());
        self.cache.insert(key.to_string(), snapshot.clone());
        snapshot
    }

    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn payload_carries_timestamp_and_age() {
        let fetched_at = now_utc();
        let snapshot = CachedSnapshot::new(fields(json!({"city": "Lisbon"})), fetched_at);
        let payload = snapshot.to_payload(fetched_at + ChronoDuration::seconds(90));

        assert_eq!(payload["city"], json!("Lisbon"));
        assert_eq!(payload["age_seconds"], json!(90));
        assert_eq!(payload["cached_at"], json!(fetched_at.to_rfc3339()));
    }

    #[test]
    fn insert_then_get_and_invalidate() {
        let cache = SnapshotCache::new(4, Duration::from_secs(600));
        cache.insert("location", fields(json!({"city": "Lisbon"})));
        let hit = cache.get("location").unwrap();
        assert_eq!(hit.value["city"], json!("Lisbon"));

        cache.invalidate("location");
        assert!(cache.get("location").is_none());
    }
}
