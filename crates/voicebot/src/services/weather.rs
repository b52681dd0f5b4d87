use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::platform::parse::decode_weather_code;
use crate::utils::time::now_utc;

use super::cache::SnapshotCache;
use super::connectivity::Connectivity;
use super::http::JsonFetch;
use super::location::LocationService;
use super::OFFLINE_MESSAGE;

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const CACHE_KEY: &str = "weather";
const WEATHER_UNAVAILABLE: &str = "Could not fetch weather data";

/// Current conditions from Open-Meteo at the IP-derived location.
pub struct WeatherService {
    fetch: Arc<dyn JsonFetch>,
    connectivity: Arc<dyn Connectivity>,
    location: Arc<LocationService>,
    cache: SnapshotCache,
}

impl WeatherService {
    pub fn new(
        fetch: Arc<dyn JsonFetch>,
        connectivity: Arc<dyn Connectivity>,
        location: Arc<LocationService>,
        cache: SnapshotCache,
    ) -> Self {
        Self {
            fetch,
            connectivity,
            location,
            cache,
        }
    }

    pub fn current(&self) -> CoreResult<Map<String, Value>> {
        if let Some(snapshot) = self.cache.get(CACHE_KEY) {
            return Ok(snapshot.to_payload(now_utc()));
        }
        if !self.connectivity.is_online() {
            return Err(CoreError::Action(OFFLINE_MESSAGE.to_string()));
        }
        let place = self.location.current().map_err(|error| {
            tracing::warn!(%error, "weather lookup without location");
            CoreError::Action("Cannot fetch weather without location".to_string())
        })?;
        let (Some(lat), Some(lon)) = (
            place.get("latitude").and_then(Value::as_f64),
            place.get("longitude").and_then(Value::as_f64),
        ) else {
            return Err(CoreError::Action(
                "Cannot fetch weather without location".to_string(),
            ));
        };

        let url = format!(
            "{FORECAST_URL}?latitude={lat}&longitude={lon}&current=temperature_2m,weather_code,wind_speed_10m,relative_humidity_2m"
        );
        let body = self.fetch.get_json(&url).map_err(|error| {
            tracing::warn!(%error, "weather lookup failed");
            CoreError::Action(WEATHER_UNAVAILABLE.to_string())
        })?;
        let current = body
            .get("current")
            .and_then(Value::as_object)
            .ok_or_else(|| CoreError::Action(WEATHER_UNAVAILABLE.to_string()))?;

        let mut fields = Map::new();
        let copy = |key: &str| current.get(key).cloned().unwrap_or(Value::Null);
        fields.insert("temperature".to_string(), copy("temperature_2m"));
        fields.insert(
            "condition".to_string(),
            Value::from(decode_weather_code(
                current.get("weather_code").and_then(Value::as_i64),
            )),
        );
        fields.insert("wind_speed".to_string(), copy("wind_speed_10m"));
        fields.insert("humidity".to_string(), copy("relative_humidity_2m"));
        let city = place
            .get("city")
            .filter(|value| !value.is_null())
            .cloned()
            .unwrap_or_else(|| Value::from("Your location"));
        fields.insert("location".to_string(), city);

        let snapshot = self.cache.insert(CACHE_KEY, fields);
        Ok(snapshot.to_payload(now_utc()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::connectivity::FixedConnectivity;
    use crate::services::location::tests::{lisbon, CannedFetch};
    use crate::services::location::IP_LOCATION_URL;
    use serde_json::json;
    use std::time::Duration;

    fn weather(fetch: Arc<CannedFetch>) -> WeatherService {
        let connectivity = Arc::new(FixedConnectivity(true));
        let location = Arc::new(LocationService::new(
            fetch.clone(),
            connectivity.clone(),
            SnapshotCache::new(8, Duration::from_secs(600)),
        ));
        WeatherService::new(
            fetch,
            connectivity,
            location,
            SnapshotCache::new(8, Duration::from_secs(600)),
        )
    }

    #[test]
    fn decodes_current_conditions() {
        let fetch = Arc::new(
            CannedFetch::default()
                .with(IP_LOCATION_URL, lisbon())
                .with(
                    FORECAST_URL,
                    json!({"current": {
                        "temperature_2m": 21.5,
                        "weather_code": 2,
                        "wind_speed_10m": 12.0,
                        "relative_humidity_2m": 60
                    }}),
                ),
        );
        let payload = weather(fetch.clone()).current().unwrap();

        assert_eq!(payload["temperature"], json!(21.5));
        assert_eq!(payload["condition"], json!("Partly cloudy"));
        assert_eq!(payload["location"], json!("Lisbon"));
        assert_eq!(payload["humidity"], json!(60));

        let calls = fetch.calls.lock();
        assert!(calls[1].contains("latitude=38.72&longitude=-9.14"));
    }

    #[test]
    fn no_location_means_no_weather() {
        let fetch = Arc::new(CannedFetch::default());
        let err = weather(fetch).current().unwrap_err();
        assert_eq!(err.to_string(), "Cannot fetch weather without location");
    }

    #[test]
    fn forecast_failure_hides_request_details() {
        let fetch = Arc::new(CannedFetch::default().with(IP_LOCATION_URL, lisbon()));
        let err = weather(fetch).current().unwrap_err();
        assert_eq!(err.to_string(), "Could not fetch weather data");
    }
}
