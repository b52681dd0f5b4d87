use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::utils::time::now_utc;

use super::cache::SnapshotCache;
use super::connectivity::Connectivity;
use super::http::JsonFetch;
use super::OFFLINE_MESSAGE;

pub const IP_LOCATION_URL: &str = "https://ipapi.co/json/";
const CACHE_KEY: &str = "location";

/// City-level location from public IP geolocation.
pub struct LocationService {
    fetch: Arc<dyn JsonFetch>,
    connectivity: Arc<dyn Connectivity>,
    cache: SnapshotCache,
}

impl LocationService {
    pub fn new(
        fetch: Arc<dyn JsonFetch>,
        connectivity: Arc<dyn Connectivity>,
        cache: SnapshotCache,
    ) -> Self {
        Self {
            fetch,
            connectivity,
            cache,
        }
    }

    /// Current location, served from cache while fresh.
    ///
    /// The payload carries `latitude`, `longitude`, `city`, `region`,
    /// `country`, `postal`, `accuracy`, `cached_at` and `age_seconds`.
    pub fn current(&self) -> CoreResult<Map<String, Value>> {
        if let Some(snapshot) = self.cache.get(CACHE_KEY) {
            return Ok(snapshot.to_payload(now_utc()));
        }
        if !self.connectivity.is_online() {
            return Err(CoreError::Action(OFFLINE_MESSAGE.to_string()));
        }
        let body = self.fetch.get_json(IP_LOCATION_URL).map_err(|error| {
            tracing::warn!(%error, "ip geolocation lookup failed");
            CoreError::Action("Could not determine location".to_string())
        })?;
        let fields = parse_ip_location(&body)
            .ok_or_else(|| CoreError::Action("Could not determine location".to_string()))?;
        let snapshot = self.cache.insert(CACHE_KEY, fields);
        Ok(snapshot.to_payload(now_utc()))
    }

    pub fn coordinates(&self) -> CoreResult<(f64, f64)> {
        let payload = self.current()?;
        match (
            payload.get("latitude").and_then(Value::as_f64),
            payload.get("longitude").and_then(Value::as_f64),
        ) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(CoreError::Action("Could not determine location".to_string())),
        }
    }
}

fn parse_ip_location(body: &Value) -> Option<Map<String, Value>> {
    let latitude = body.get("latitude").and_then(Value::as_f64)?;
    let longitude = body.get("longitude").and_then(Value::as_f64)?;
    let text = |key: &str| body.get(key).cloned().unwrap_or(Value::Null);

    let mut fields = Map::new();
    fields.insert("latitude".to_string(), Value::from(latitude));
    fields.insert("longitude".to_string(), Value::from(longitude));
    fields.insert("city".to_string(), text("city"));
    fields.insert("region".to_string(), text("region"));
    fields.insert("country".to_string(), text("country_name"));
    fields.insert("postal".to_string(), text("postal"));
    fields.insert("accuracy".to_string(), Value::from("city-level"));
    Some(fields)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::connectivity::FixedConnectivity;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Serves canned JSON by URL prefix and counts requests.
    #[derive(Default)]
    pub(crate) struct CannedFetch {
        pub responses: HashMap<String, Value>,
        pub calls: Mutex<Vec<String>>,
    }

    impl CannedFetch {
        pub fn with(mut self, prefix: &str, body: Value) -> Self {
            self.responses.insert(prefix.to_string(), body);
            self
        }
    }

    impl JsonFetch for CannedFetch {
        fn get_json(&self, url: &str) -> CoreResult<Value> {
            self.calls.lock().push(url.to_string());
            self.responses
                .iter()
                .find(|(prefix, _)| url.starts_with(prefix.as_str()))
                .map(|(_, body)| body.clone())
                .ok_or_else(|| CoreError::Action(format!("no canned response for {url}")))
        }
    }

    pub(crate) fn lisbon() -> Value {
        json!({
            "latitude": 38.72,
            "longitude": -9.14,
            "city": "Lisbon",
            "region": "Lisbon",
            "country_name": "Portugal",
            "postal": "1000-001"
        })
    }

    fn service(fetch: Arc<CannedFetch>, online: bool) -> LocationService {
        LocationService::new(
            fetch,
            Arc::new(FixedConnectivity(online)),
            SnapshotCache::new(8, Duration::from_secs(600)),
        )
    }

    #[test]
    fn fetches_and_caches_location() {
        let fetch = Arc::new(CannedFetch::default().with(IP_LOCATION_URL, lisbon()));
        let location = service(fetch.clone(), true);

        let first = location.current().unwrap();
        assert_eq!(first["city"], json!("Lisbon"));
        assert_eq!(first["country"], json!("Portugal"));
        assert_eq!(first["accuracy"], json!("city-level"));
        assert!(first.contains_key("cached_at"));

        location.current().unwrap();
        assert_eq!(fetch.calls.lock().len(), 1);
    }

    #[test]
    fn offline_fails_fast() {
        let fetch = Arc::new(CannedFetch::default().with(IP_LOCATION_URL, lisbon()));
        let err = service(fetch.clone(), false).current().unwrap_err();
        assert_eq!(err.to_string(), "You appear to be offline");
        assert!(fetch.calls.lock().is_empty());
    }

    #[test]
    fn missing_coordinates_cannot_determine_location() {
        let fetch = Arc::new(CannedFetch::default().with(IP_LOCATION_URL, json!({"error": true})));
        let err = service(fetch, true).current().unwrap_err();
        assert_eq!(err.to_string(), "Could not determine location");
    }
}
