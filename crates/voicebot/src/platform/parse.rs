//! Parsers for the raw reports produced by platform commands.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

use super::types::{BatteryReading, DiskUsage};

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)%").expect("valid percent regex"));

/// Reads the charge level and state from a `pmset -g batt` style report.
pub fn parse_battery(report: &str) -> BatteryReading {
    let percentage = PERCENT
        .captures(report)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok())
        .map(|value| value.min(100) as u8);
    let lowered = report.to_lowercase();
    // "discharging" and "not charging" both contain "charging".
    let status = if lowered.contains("discharging") {
        "discharging"
    } else if lowered.contains("not charging") {
        "not charging"
    } else if lowered.contains("charging") {
        "charging"
    } else if lowered.contains("charged") {
        "charged"
    } else {
        "unknown"
    };
    BatteryReading {
        percentage,
        status: status.to_string(),
    }
}

/// Reads the first data row of a `df -h` report.
pub fn parse_df(report: &str) -> CoreResult<DiskUsage> {
    let row = report
        .lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| CoreError::Action("Could not parse disk usage".to_string()))?;
    let parts: Vec<&str> = row.split_whitespace().collect();
    if parts.len() < 5 {
        return Err(CoreError::Action("Could not parse disk usage".to_string()));
    }
    Ok(DiskUsage {
        total: parts[1].to_string(),
        used: parts[2].to_string(),
        available: parts[3].to_string(),
        percentage: parts[4].to_string(),
    })
}

/// Splits `key: value` lines on the first colon. Lines without one are skipped.
pub fn parse_key_values(report: &str) -> Map<String, Value> {
    report
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), Value::String(value.trim().to_string())))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Splits the comma separated list returned by System Events.
pub fn parse_app_list(output: &str) -> Vec<String> {
    output
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Describes a WMO weather interpretation code.
pub fn decode_weather_code(code: Option<i64>) -> String {
    let Some(code) = code else {
        return "unknown conditions".to_string();
    };
    let label = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Foggy with frost",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Thunderstorm with large hail",
        other => return format!("Weather code {other}"),
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PMSET: &str = "Now drawing from 'Battery Power'\n -InternalBattery-0 (id=1234)\t72%; discharging; 4:10 remaining present: true";

    #[test]
    fn battery_discharging_is_not_reported_as_charging() {
        let reading = parse_battery(PMSET);
        assert_eq!(reading.percentage, Some(72));
        assert_eq!(reading.status, "discharging");
    }

    #[test]
    fn battery_states() {
        assert_eq!(parse_battery("100%; charged;").status, "charged");
        assert_eq!(parse_battery("55%; charging;").status, "charging");
        assert_eq!(parse_battery("80%; AC attached; not charging").status, "not charging");
        let empty = parse_battery("");
        assert_eq!(empty.percentage, None);
        assert_eq!(empty.status, "unknown");
    }

    #[test]
    fn df_reads_second_line() {
        let report = "Filesystem     Size   Used  Avail Capacity  Mounted on\n/dev/disk3s1  460Gi  210Gi  230Gi    48%    /\n";
        let usage = parse_df(report).unwrap();
        assert_eq!(usage.total, "460Gi");
        assert_eq!(usage.used, "210Gi");
        assert_eq!(usage.available, "230Gi");
        assert_eq!(usage.percentage, "48%");
    }

    #[test]
    fn df_without_rows_is_an_error() {
        let err = parse_df("Filesystem Size Used Avail\n").unwrap_err();
        assert_eq!(err.to_string(), "Could not parse disk usage");
    }

    #[test]
    fn key_values_split_on_first_colon() {
        let map = parse_key_values("IP address: 10.0.0.4\nRouter: 10.0.0.1\nnoise\nWi-Fi ID: aa:bb:cc");
        assert_eq!(map.get("IP address"), Some(&Value::String("10.0.0.4".into())));
        assert_eq!(map.get("Wi-Fi ID"), Some(&Value::String("aa:bb:cc".into())));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn app_list_trims_names() {
        assert_eq!(parse_app_list("Finder, Safari,  Mail\n"), vec!["Finder", "Safari", "Mail"]);
        assert!(parse_app_list("").is_empty());
    }

    #[test]
    fn weather_codes() {
        assert_eq!(decode_weather_code(Some(0)), "Clear sky");
        assert_eq!(decode_weather_code(Some(63)), "Moderate rain");
        assert_eq!(decode_weather_code(Some(42)), "Weather code 42");
        assert_eq!(decode_weather_code(None), "unknown conditions");
    }
}
