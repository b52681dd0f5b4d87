//! Built-in system actions backed by the platform adapter and network services.

use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};

use crate::error::{CoreError, CoreResult};
use crate::platform::parse::{parse_battery, parse_df, parse_key_values};
use crate::platform::SharedPlatform;
use crate::services::{LocationService, WeatherService};

use super::registry::{ActionDefinition, ActionRegistry};
use super::result::{ActionParam, ActionResult};

/// The collaborators every built-in action draws on.
pub struct SystemActions {
    platform: SharedPlatform,
    location: Arc<LocationService>,
    weather: Arc<WeatherService>,
}

impl SystemActions {
    pub fn new(
        platform: SharedPlatform,
        location: Arc<LocationService>,
        weather: Arc<WeatherService>,
    ) -> Self {
        Self {
            platform,
            location,
            weather,
        }
    }

    pub fn platform_id(&self) -> &str {
        self.platform.id()
    }

    pub fn get_location(&self) -> CoreResult<ActionResult> {
        Ok(ActionResult::ok(Value::Object(self.location.current()?)))
    }

    pub fn get_weather(&self) -> CoreResult<ActionResult> {
        Ok(ActionResult::ok(Value::Object(self.weather.current()?)))
    }

    pub fn find_restaurants_nearby(&self) -> CoreResult<ActionResult> {
        self.search_maps("restaurants")
    }

    pub fn find_coffee_shops(&self) -> CoreResult<ActionResult> {
        self.search_maps("coffee shops")
    }

    fn search_maps(&self, query: &str) -> CoreResult<ActionResult> {
        let place = self.location.current()?;
        let (lat, lon) = match (
            place.get("latitude").and_then(Value::as_f64),
            place.get("longitude").and_then(Value::as_f64),
        ) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Ok(ActionResult::failed(format!("Cannot find {query} without location"))),
        };
        let url = format!(
            "https://maps.apple.com/?q={}&sll={lat},{lon}",
            urlencoding::encode(query)
        );
        self.platform.open_url(&url)?;
        Ok(ActionResult::ok(json!({
            "status": "success",
            "message": format!("Opening Maps to search for {query} near you"),
            "url": url,
            "location": Value::Object(place),
        })))
    }

    pub fn get_system_info(&self) -> CoreResult<ActionResult> {
        let info = self.platform.system_info()?;
        let payload = serde_json::to_value(info)
            .map_err(|e| CoreError::Internal(format!("failed to serialize system info: {e}")))?;
        Ok(ActionResult::ok(payload))
    }

    pub fn get_battery_status(&self) -> CoreResult<ActionResult> {
        let reading = parse_battery(&self.platform.battery_report()?);
        Ok(ActionResult::ok(json!({
            "percentage": reading.percentage,
            "status": reading.status,
        })))
    }

    pub fn get_disk_usage(&self) -> CoreResult<ActionResult> {
        let usage = parse_df(&self.platform.disk_report()?)?;
        let payload = serde_json::to_value(usage)
            .map_err(|e| CoreError::Internal(format!("failed to serialize disk usage: {e}")))?;
        Ok(ActionResult::ok(payload))
    }

    pub fn get_network_status(&self) -> CoreResult<ActionResult> {
        let mut info = parse_key_values(&self.platform.wifi_report()?);
        if !info.contains_key("SSID") {
            if let Some(name) = info.get("Wi-Fi Network").or_else(|| info.get("Network")).cloned() {
                info.insert("SSID".to_string(), name);
            }
        }
        Ok(ActionResult::ok(Value::Object(info)))
    }

    pub fn get_brightness(&self) -> CoreResult<ActionResult> {
        let level = self.platform.brightness()?;
        Ok(ActionResult::ok(json!({
            "level": level,
            "message": format!("Brightness is at {level}%"),
        })))
    }

    /// Set brightness to the requested level, or one step up when none was given.
    pub fn set_brightness(&self, param: Option<ActionParam>) -> CoreResult<ActionResult> {
        let level = match percent_param(param.as_ref()) {
            Some(level) => level,
            None => step_up(self.platform.brightness()?),
        };
        self.platform.set_brightness(level)?;
        Ok(ActionResult::message(format!("Brightness set to {level}%")))
    }

    pub fn decrease_brightness(&self) -> CoreResult<ActionResult> {
        let level = step_down(self.platform.brightness()?);
        self.platform.set_brightness(level)?;
        Ok(ActionResult::message(format!("Brightness set to {level}%")))
    }

    pub fn get_volume(&self) -> CoreResult<ActionResult> {
        let level = self.platform.volume()?;
        Ok(ActionResult::ok(json!({
            "level": level,
            "message": format!("Volume is at {level}%"),
        })))
    }

    /// Set volume to the requested level, or one step up when none was given.
    pub fn set_volume(&self, param: Option<ActionParam>) -> CoreResult<ActionResult> {
        let level = match percent_param(param.as_ref()) {
            Some(level) => level,
            None => step_up(self.platform.volume()?),
        };
        self.platform.set_volume(level)?;
        Ok(ActionResult::message(format!("Volume set to {level}%")))
    }

    pub fn decrease_volume(&self) -> CoreResult<ActionResult> {
        let level = step_down(self.platform.volume()?);
        self.platform.set_volume(level)?;
        Ok(ActionResult::message(format!("Volume set to {level}%")))
    }

    pub fn mute_volume(&self) -> CoreResult<ActionResult> {
        self.platform.set_muted(true)?;
        Ok(ActionResult::message("Volume muted"))
    }

    pub fn unmute_volume(&self) -> CoreResult<ActionResult> {
        self.platform.set_muted(false)?;
        Ok(ActionResult::message("Volume unmuted"))
    }

    pub fn open_application(&self, param: Option<ActionParam>) -> CoreResult<ActionResult> {
        let Some(name) = text_param(param.as_ref()) else {
            return Ok(ActionResult::failed("Which application should I open?"));
        };
        self.platform
            .open_application(&name)
            .map_err(|e| CoreError::Action(format!("Could not open {name}: {e}")))?;
        Ok(ActionResult::message(format!("Opening {name}")))
    }

    pub fn quit_application(&self, param: Option<ActionParam>) -> CoreResult<ActionResult> {
        let Some(name) = text_param(param.as_ref()) else {
            return Ok(ActionResult::failed("Which application should I close?"));
        };
        self.platform
            .quit_application(&name)
            .map_err(|e| CoreError::Action(format!("Could not close {name}: {e}")))?;
        Ok(ActionResult::message(format!("{name} closed")))
    }

    pub fn list_open_applications(&self) -> CoreResult<ActionResult> {
        let apps = self.platform.list_open_apps()?;
        Ok(ActionResult::ok(json!({
            "status": "success",
            "count": apps.len(),
            "applications": apps,
        })))
    }

    pub fn open_url(&self, param: Option<ActionParam>) -> CoreResult<ActionResult> {
        let Some(raw) = text_param(param.as_ref()) else {
            return Ok(ActionResult::failed("Which website should I open?"));
        };
        let url = if raw.starts_with("http") {
            raw
        } else {
            format!("https://{raw}")
        };
        self.platform.open_url(&url)?;
        Ok(ActionResult::message(format!("Opening {url}")))
    }

    pub fn search_web(&self, param: Option<ActionParam>) -> CoreResult<ActionResult> {
        let Some(query) = text_param(param.as_ref()) else {
            return Ok(ActionResult::failed("What should I search for?"));
        };
        let url = format!("https://www.google.com/search?q={}", urlencoding::encode(&query));
        self.platform.open_url(&url)?;
        Ok(ActionResult::message(format!("Searching for {query}")))
    }

    pub fn sleep_system(&self) -> CoreResult<ActionResult> {
        self.platform.sleep()?;
        Ok(ActionResult::message("Going to sleep"))
    }

    pub fn lock_screen(&self) -> CoreResult<ActionResult> {
        self.platform.lock_screen()?;
        Ok(ActionResult::message("Screen locked"))
    }

    pub fn current_time(&self) -> CoreResult<ActionResult> {
        let now = Local::now();
        Ok(ActionResult::ok(json!({
            "time": now.format("%H:%M:%S").to_string(),
            "message": format!("The current time is {}", now.format("%H:%M:%S")),
        })))
    }

    pub fn current_date(&self) -> CoreResult<ActionResult> {
        let today = Local::now();
        Ok(ActionResult::ok(json!({
            "date": today.format("%Y-%m-%d").to_string(),
            "message": format!("Today is {}", today.format("%A, %B %d, %Y")),
        })))
    }
}

/// An integer parameter clamped to a 0–100 percentage.
fn percent_param(param: Option<&ActionParam>) -> Option<u8> {
    param
        .and_then(ActionParam::as_i64)
        .map(|level| level.clamp(0, 100) as u8)
}

/// Relative change applied by "volume up", "dim the screen" and friends.
const LEVEL_STEP: u8 = 10;

fn step_up(current: u8) -> u8 {
    current.saturating_add(LEVEL_STEP).min(100)
}

fn step_down(current: u8) -> u8 {
    current.min(100).saturating_sub(LEVEL_STEP)
}

fn text_param(param: Option<&ActionParam>) -> Option<String> {
    param
        .and_then(ActionParam::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Register every built-in action against `actions`.
pub fn register_system_actions(registry: &mut ActionRegistry, actions: Arc<SystemActions>) {
    macro_rules! bind {
        ($id:literal, $description:literal, $method:ident) => {{
            let actions = actions.clone();
            registry.register(ActionDefinition::new($id, $description, move |_param| {
                actions.$method()
            }));
        }};
        ($id:literal, $description:literal, $method:ident, param) => {{
            let actions = actions.clone();
            registry.register(ActionDefinition::new($id, $description, move |param| {
                actions.$method(param)
            }));
        }};
    }

    bind!("get_location", "Approximate location from the public IP", get_location);
    bind!("get_weather", "Current weather at your location", get_weather);
    bind!("find_restaurants_nearby", "Search Maps for restaurants nearby", find_restaurants_nearby);
    bind!("find_coffee_shops", "Search Maps for coffee shops nearby", find_coffee_shops);
    bind!("get_system_info", "Operating system and host details", get_system_info);
    bind!("get_battery_status", "Battery charge and charging state", get_battery_status);
    bind!("get_disk_usage", "Disk usage of the root volume", get_disk_usage);
    bind!("get_network_status", "Wi-Fi connection details", get_network_status);
    bind!("get_brightness", "Current display brightness", get_brightness);
    bind!("set_brightness", "Set display brightness (0-100)", set_brightness, param);
    bind!("decrease_brightness", "Lower display brightness one step", decrease_brightness);
    bind!("get_volume", "Current output volume", get_volume);
    bind!("set_volume", "Set output volume (0-100)", set_volume, param);
    bind!("decrease_volume", "Lower output volume one step", decrease_volume);
    bind!("mute_volume", "Mute output", mute_volume);
    bind!("unmute_volume", "Unmute output", unmute_volume);
    bind!("open_application", "Open an application by name", open_application, param);
    bind!("quit_application", "Quit an application by name", quit_application, param);
    bind!("list_open_applications", "List running applications", list_open_applications);
    bind!("open_url", "Open a website in the default browser", open_url, param);
    bind!("search_web", "Search the web", search_web, param);
    bind!("sleep_system", "Put the computer to sleep", sleep_system);
    bind!("lock_screen", "Lock the screen", lock_screen);
    bind!("current_time", "Current local time", current_time);
    bind!("current_date", "Current local date", current_date);
}
