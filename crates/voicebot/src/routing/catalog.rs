//! The ordered intent catalog: built-in defaults, file loading and binding.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actions::ActionRegistry;
use crate::error::{CoreError, CoreResult};

use super::intent::{Extractor, Intent, IntentSpec};

/// On-disk shape of an intent catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentFile {
    pub intents: Vec<IntentSpec>,
}

/// Compiled intents in match order. First match wins.
#[derive(Debug, Clone, Default)]
pub struct IntentCatalog {
    intents: Vec<Intent>,
}

impl IntentCatalog {
    /// Compile and validate `specs`, then bind each to its registered action.
    ///
    /// Intents whose action is not registered stay in the catalog unbound so
    /// they still shadow later intents; dispatching them reports the gap.
    pub fn compile(specs: Vec<IntentSpec>, registry: &ActionRegistry) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        let mut intents = Vec::with_capacity(specs.len());
        for spec in specs {
            if !seen.insert(spec.id.clone()) {
                return Err(CoreError::Config(format!("duplicate intent id: {}", spec.id)));
            }
            let mut intent = Intent::compile(spec)?;
            intent.handler = registry.handler(&intent.spec.action);
            if intent.handler.is_none() {
                tracing::warn!(
                    intent = intent.id(),
                    action = %intent.spec.action,
                    "intent action is not registered"
                );
            }
            intents.push(intent);
        }
        Ok(Self { intents })
    }

    pub fn builtin(registry: &ActionRegistry) -> CoreResult<Self> {
        Self::compile(builtin_specs(), registry)
    }

    /// Load the catalog at `path`, or the built-in one when no path is given.
    ///
    /// A missing or invalid file falls back to the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>, registry: &ActionRegistry) -> CoreResult<Self> {
        let Some(path) = path else {
            return Self::builtin(registry);
        };
        match load_specs(path).and_then(|specs| Self::compile(specs, registry)) {
            Ok(catalog) => {
                tracing::info!(path = %path.display(), intents = catalog.len(), "loaded intent catalog");
                Ok(catalog)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "using built-in intent catalog");
                Self::builtin(registry)
            }
        }
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn get(&self, id: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.id() == id)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

pub fn load_specs(path: &Path) -> CoreResult<Vec<IntentSpec>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("failed to read {}: {e}", path.display())))?;
    let file: IntentFile = serde_json::from_str(&data)
        .map_err(|e| CoreError::Config(format!("failed to parse {}: {e}", path.display())))?;
    Ok(file.intents)
}

struct Builder {
    spec: IntentSpec,
}

impl Builder {
    fn new(id: &str, category: &str, action: &str, description: &str, rules: &[&str]) -> Self {
        Self {
            spec: IntentSpec {
                id: id.to_string(),
                rules: rules.iter().map(|rule| rule.to_string()).collect(),
                action: action.to_string(),
                extractor: Extractor::None,
                keywords: Vec::new(),
                category: category.to_string(),
                description: description.to_string(),
                examples: Vec::new(),
                template: None,
            },
        }
    }

    fn extract(mut self, extractor: Extractor, keywords: &[&str]) -> Self {
        self.spec.extractor = extractor;
        self.spec.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    fn examples(mut self, examples: &[&str]) -> Self {
        self.spec.examples = examples.iter().map(|e| e.to_string()).collect();
        self
    }

    fn template(mut self, template: &str) -> Self {
        self.spec.template = Some(template.to_string());
        self
    }

    fn build(self) -> IntentSpec {
        self.spec
    }
}

const LOCATION: &str = "Location & Maps";
const WEATHER: &str = "Weather";
const SYSTEM_INFO: &str = "System Info";
const CONTROLS: &str = "Controls";
const APPLICATIONS: &str = "Applications";
const WEB: &str = "Web";
const SYSTEM: &str = "System";
const CLOCK: &str = "Time & Date";

/// Built-in intents, most specific first.
pub fn builtin_specs() -> Vec<IntentSpec> {
    vec![
        Builder::new("location", LOCATION, "get_location", "Get your current location", &[
            r"where am i",
            r"current location",
            r"my location",
            r"what is my location",
        ])
        .examples(&["where am i", "what is my location"])
        .template("You are in {city|unknown}, {region|unknown}. Coordinates: {latitude|N/A}, {longitude|N/A}")
        .build(),
        Builder::new("restaurants", LOCATION, "find_restaurants_nearby", "Find nearby restaurants", &[
            r"find (me )?nearby restaurants",
            r"restaurants near( by| here)?",
            r"find (me )?a restaurant",
            r"where are (the )?restaurants",
            r"any restaurants nearby",
        ])
        .examples(&["find nearby restaurants", "restaurants near here"])
        .build(),
        Builder::new("coffee", LOCATION, "find_coffee_shops", "Find nearby coffee shops", &[
            r"find (me )?(some )?coffee",
            r"coffee shops?",
            r"where is.*coffee",
            r"nearest coffee",
        ])
        .examples(&["coffee shops", "find coffee"])
        .build(),
        Builder::new("weather", WEATHER, "get_weather", "Get current weather", &[
            r"what(?:'s| is) the weather",
            r"weather (here|today|outside|like)",
            r"current weather",
            r"is it raining",
            r"temperature outside",
            r"how is the weather",
        ])
        .examples(&["what's the weather", "is it raining"])
        .template("In {location|your area}, it's {temperature}°C and {condition}. Wind speed: {wind_speed} km/h. Humidity: {humidity}%")
        .build(),
        Builder::new("system_info", SYSTEM_INFO, "get_system_info", "Get system information", &[
            r"system (information|info|details)",
            r"tell me about (my )?system",
            r"system status",
            r"computer info",
        ])
        .examples(&["system information", "tell me about my system"])
        .template("Running {os} {version} on {machine} ({hostname})")
        .build(),
        Builder::new("battery", SYSTEM_INFO, "get_battery_status", "Check battery status", &[
            r"battery (status|level|percentage)",
            r"how much battery",
            r"battery (left|remaining)",
        ])
        .examples(&["battery status", "how much battery"])
        .template("Battery: {percentage}%, Status: {status}")
        .build(),
        Builder::new("disk", SYSTEM_INFO, "get_disk_usage", "Check disk usage", &[
            r"disk (usage|space|information)",
            r"how much storage",
            r"storage (used|available|left)",
        ])
        .examples(&["disk usage", "how much storage"])
        .template("Disk usage - Used: {used}, Available: {available}, Total: {total}")
        .build(),
        Builder::new("network", SYSTEM_INFO, "get_network_status", "Check network status", &[
            r"network (status|information|info)",
            r"internet (status|connection)",
            r"wi-?fi (status|connection)",
        ])
        .examples(&["network status", "wifi status"])
        .template("Network status: Connected to {SSID|unknown network}")
        .build(),
        Builder::new("set_brightness", CONTROLS, "set_brightness", "Set brightness level", &[
            r"(set|change|adjust) (the )?brightness (to )?(\d+)",
            r"brightness (to )?(\d+)",
            r"(brighten|dim) (to )?(\d+)",
            r"^brighten\b",
            r"\bbrightness up\b",
            r"\bincrease (?:the )?brightness",
        ])
        .extract(Extractor::TrailingNumber, &[])
        .examples(&["set brightness to 70", "brightness 40", "brightness up"])
        .build(),
        Builder::new("brightness_down", CONTROLS, "decrease_brightness", "Dim the screen", &[
            r"^dim\b",
            r"\bdim the (?:screen|display)\b",
            r"\bbrightness down\b",
            r"\bdecrease (?:the )?brightness",
            r"\blower (?:the )?brightness",
            r"\bdarker\b",
        ])
        .examples(&["dim the screen", "brightness down"])
        .build(),
        Builder::new("brightness", CONTROLS, "get_brightness", "Get brightness level", &[
            r"(get|check|what is) (the )?brightness",
            r"how (bright|dim)",
            r"current brightness",
        ])
        .examples(&["what is the brightness", "current brightness"])
        .build(),
        Builder::new("set_volume", CONTROLS, "set_volume", "Set volume level", &[
            r"(set|change|adjust) (the )?volume (to )?(\d+)",
            r"volume (?:to )?(\d+)",
            r"\blouder\b",
            r"\bincrease (?:the )?volume",
            r"\bturn (?:the )?volume up\b",
            r"\bvolume up\b",
        ])
        .extract(Extractor::TrailingNumber, &[])
        .examples(&["set volume to 50", "volume 30", "volume up"])
        .build(),
        Builder::new("volume_down", CONTROLS, "decrease_volume", "Turn the volume down", &[
            r"\bquieter\b",
            r"\bdecrease (?:the )?volume",
            r"\blower (?:the )?volume",
            r"\bturn (?:the )?volume down\b",
            r"\bvolume down\b",
        ])
        .examples(&["volume down", "turn the volume down"])
        .build(),
        Builder::new("volume", CONTROLS, "get_volume", "Get volume level", &[
            r"(get|check|what is) (the )?volume",
            r"volume level",
            r"current volume",
        ])
        .examples(&["what is the volume", "volume level"])
        .build(),
        Builder::new("unmute", CONTROLS, "unmute_volume", "Unmute volume", &[
            r"\bunmute\b",
        ])
        .examples(&["unmute", "unmute the sound"])
        .build(),
        Builder::new("mute", CONTROLS, "mute_volume", "Mute volume", &[
            r"\b(mute|silence)\b",
        ])
        .examples(&["mute", "mute the sound"])
        .build(),
        Builder::new("list_apps", APPLICATIONS, "list_open_applications", "List open applications", &[
            r"(list|show|what are) (the )?(open )?applications",
            r"(list|show) (the )?running (apps|applications)",
            r"what apps are (open|running)",
        ])
        .examples(&["list open applications", "what apps are open"])
        .template("You have {count|0} applications open")
        .build(),
        Builder::new("open_url", WEB, "open_url", "Open a website", &[
            r"https?://\S+",
            r"\b(open|go to|visit) (?:the )?(\S+\.\S+)",
        ])
        .extract(Extractor::UrlLike, &[])
        .examples(&["open github.com", "go to wikipedia.org"])
        .build(),
        Builder::new("open_app", APPLICATIONS, "open_application", "Open an application", &[
            r"\b(open|launch|start) (?:the )?(\w+)",
        ])
        .extract(Extractor::NamedToken, &["open", "launch", "start", "application", "app", "the"])
        .examples(&["open chrome", "launch safari", "open the terminal"])
        .build(),
        Builder::new("close_app", APPLICATIONS, "quit_application", "Close an application", &[
            r"\b(close|quit|exit) (?:the )?(\w+)",
        ])
        .extract(Extractor::NamedToken, &["close", "quit", "exit", "application", "app", "the"])
        .examples(&["close safari", "quit music", "close the calendar"])
        .build(),
        Builder::new("search", WEB, "search_web", "Search the web", &[
            r"\b(search for|search|google) (.+)",
            r"\b(look for|look up) (.+)",
        ])
        .extract(Extractor::FreeTextQuery, &[
            "search for", "search", "google", "look for", "look up", "on google",
        ])
        .examples(&["search for python programming", "look up rust lifetimes"])
        .build(),
        Builder::new("sleep", SYSTEM, "sleep_system", "Put the computer to sleep", &[
            r"\bgo to sleep\b",
            r"\bput (the )?(mac|computer) to sleep\b",
            r"^sleep$",
        ])
        .examples(&["go to sleep", "put the computer to sleep"])
        .build(),
        Builder::new("lock", SYSTEM, "lock_screen", "Lock the screen", &[
            r"\block (the )?screen\b",
            r"\block (the )?(mac|computer)\b",
            r"^lock$",
        ])
        .examples(&["lock screen", "lock the computer"])
        .build(),
        Builder::new("time", CLOCK, "current_time", "Tell the current time", &[
            r"\bwhat time\b",
            r"\bcurrent time\b",
            r"\btime is it\b",
        ])
        .examples(&["what time is it", "current time"])
        .build(),
        Builder::new("date", CLOCK, "current_date", "Tell today's date", &[
            r"\bwhat(?:'s| is) the date\b",
            r"\bwhat day is (it|today)\b",
            r"\btoday'?s date\b",
        ])
        .examples(&["what is the date", "what day is it"])
        .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionDefinition, ActionResult};
    use std::io::Write;

    fn registry_for(actions: &[&str]) -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        for action in actions {
            registry.register(ActionDefinition::new(*action, "test", |_| {
                Ok(ActionResult::message("ok"))
            }));
        }
        registry
    }

    #[test]
    fn builtin_catalog_compiles_in_declared_order() {
        let catalog = IntentCatalog::builtin(&ActionRegistry::new()).unwrap();
        let ids: Vec<&str> = catalog.intents().iter().map(|i| i.id()).collect();
        let position = |id: &str| ids.iter().position(|x| *x == id).unwrap();

        assert_eq!(ids.len(), 25);
        assert!(position("unmute") < position("mute"));
        assert!(position("open_url") < position("open_app"));
        assert!(position("list_apps") < position("open_app"));
        assert!(position("set_volume") < position("volume"));
        assert!(position("set_brightness") < position("brightness"));
        assert!(position("brightness_down") < position("brightness"));
        assert!(position("volume_down") < position("volume"));
    }

    #[test]
    fn builtin_examples_route_to_their_own_intent() {
        let catalog = IntentCatalog::builtin(&ActionRegistry::new()).unwrap();
        for intent in catalog.intents() {
            for example in &intent.spec.examples {
                let winner = catalog
                    .intents()
                    .iter()
                    .find(|candidate| candidate.first_match(example).is_some())
                    .map(|candidate| candidate.id());
                assert_eq!(winner, Some(intent.id()), "example {example:?}");
            }
        }
    }

    #[test]
    fn binds_registered_actions_and_keeps_unbound_intents() {
        let catalog = IntentCatalog::builtin(&registry_for(&["get_battery_status"])).unwrap();
        assert!(catalog.get("battery").unwrap().is_bound());
        assert!(!catalog.get("location").unwrap().is_bound());
        assert_eq!(catalog.len(), 25);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut specs = builtin_specs();
        specs.push(specs[0].clone());
        let err = IntentCatalog::compile(specs, &ActionRegistry::new()).unwrap_err();
        assert_eq!(err.to_string(), "configuration error: duplicate intent id: location");
    }

    #[test]
    fn loads_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"intents":[{{"id":"ping","rules":["^ping$"],"action":"pong","description":"Ping"}}]}}"#
        )
        .unwrap();
        let catalog =
            IntentCatalog::load_or_builtin(Some(file.path()), &registry_for(&["pong"])).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("ping").unwrap().is_bound());
    }

    #[test]
    fn invalid_file_falls_back_to_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"intents":[{{"id":"bad","rules":["(oops"],"action":"x"}}]}}"#).unwrap();
        let catalog = IntentCatalog::load_or_builtin(Some(file.path()), &ActionRegistry::new()).unwrap();
        assert_eq!(catalog.len(), builtin_specs().len());

        let missing = IntentCatalog::load_or_builtin(
            Some(Path::new("/nonexistent/intents.json")),
            &ActionRegistry::new(),
        )
        .unwrap();
        assert!(missing.get("battery").is_some());
    }
}
