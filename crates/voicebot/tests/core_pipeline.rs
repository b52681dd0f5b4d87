use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::tempdir;

use voicebot::config::VoicebotConfig;
use voicebot::platform::Platform;
use voicebot::services::{FixedConnectivity, JsonFetch};
use voicebot::{Core, CoreError, CoreResponse, CoreResult, RouteStatus};

#[derive(Default)]
struct FakeMac {
    opened: Mutex<Vec<String>>,
    volume: Mutex<Option<u8>>,
}

impl Platform for FakeMac {
    fn id(&self) -> &str {
        "fake"
    }

    fn battery_report(&self) -> CoreResult<String> {
        Ok("Now drawing from 'Battery Power'\n -InternalBattery-0\t72%; discharging; 5:01 remaining".to_string())
    }

    fn disk_report(&self) -> CoreResult<String> {
        Ok("Filesystem Size Used Avail Capacity Mounted\n/dev/disk3s1 460Gi 210Gi 230Gi 48% /".to_string())
    }

    fn volume(&self) -> CoreResult<u8> {
        Ok(self.volume.lock().unwrap_or(30))
    }

    fn set_volume(&self, level: u8) -> CoreResult<()> {
        *self.volume.lock() = Some(level);
        Ok(())
    }

    fn open_application(&self, name: &str) -> CoreResult<()> {
        self.opened.lock().push(name.to_string());
        Ok(())
    }

    fn open_url(&self, url: &str) -> CoreResult<()> {
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}

struct FakeWeb;

impl JsonFetch for FakeWeb {
    fn get_json(&self, url: &str) -> CoreResult<Value> {
        if url.starts_with("https://ipapi.co/") {
            return Ok(json!({
                "latitude": 52.52, "longitude": 13.41,
                "city": "Berlin", "region": "Berlin", "country_name": "Germany"
            }));
        }
        if url.starts_with("https://api.open-meteo.com/") {
            return Ok(json!({"current": {
                "temperature_2m": 18.0, "weather_code": 61,
                "wind_speed_10m": 9.5, "relative_humidity_2m": 70
            }}));
        }
        Err(CoreError::Action(format!("unexpected url {url}")))
    }
}

fn core_with(platform: Arc<FakeMac>, online: bool) -> (Core, tempfile::TempDir) {
    let dir = tempdir().expect("tempdir");
    let responses = dir.path().join("responses.json");
    std::fs::write(
        &responses,
        r#"{"buckets":[
            {"id":"greeting","triggers":["hello bot","good morning"],"replies":["Hello!"]},
            {"id":"default","replies":["Could you rephrase that?"]}
        ]}"#,
    )
    .expect("write responses");

    let mut config = VoicebotConfig::default_new();
    config.conversation.responses_path = Some(responses);
    config.conversation.seed = Some(11);

    let core = Core::with_collaborators(
        &config,
        platform,
        Arc::new(FakeWeb),
        Arc::new(FixedConnectivity(online)),
    )
    .expect("core");
    (core, dir)
}

fn command(response: CoreResponse) -> voicebot::RouteOutcome {
    match response {
        CoreResponse::Command(outcome) => outcome,
        other => panic!("expected a command response, got {other:?}"),
    }
}

#[tokio::test]
async fn battery_status_end_to_end() {
    let (core, _dir) = core_with(Arc::default(), true);
    let outcome = command(core.handle("Battery status").await);
    assert_eq!(outcome.status, RouteStatus::Matched);
    assert_eq!(outcome.reply, "Battery: 72%, Status: discharging");
}

#[tokio::test]
async fn location_and_weather_use_network_services() {
    let (core, _dir) = core_with(Arc::default(), true);

    let location = command(core.handle("where am i").await);
    assert_eq!(
        location.reply,
        "You are in Berlin, Berlin. Coordinates: 52.52, 13.41"
    );
    let payload = location.payload.expect("payload");
    assert!(payload.contains_key("cached_at"));
    assert!(payload.contains_key("age_seconds"));

    let weather = command(core.handle("what's the weather").await);
    assert_eq!(
        weather.reply,
        "In Berlin, it's 18.0°C and Slight rain. Wind speed: 9.5 km/h. Humidity: 70%"
    );
}

#[tokio::test]
async fn offline_network_actions_fail_gracefully() {
    let (core, _dir) = core_with(Arc::default(), false);
    let outcome = command(core.handle("what's the weather").await);
    assert_eq!(outcome.status, RouteStatus::MatchedWithError);
    assert_eq!(outcome.reply, "Error executing command: You appear to be offline");
}

#[tokio::test]
async fn controls_reach_the_platform() {
    let platform = Arc::new(FakeMac::default());
    let (core, _dir) = core_with(platform.clone(), true);

    assert_eq!(command(core.handle("set volume to 50").await).reply, "Volume set to 50%");
    assert_eq!(*platform.volume.lock(), Some(50));

    let up = command(core.handle("volume up").await);
    assert_eq!(up.status, RouteStatus::Matched);
    assert_eq!(up.reply, "Volume set to 60%");
    assert_eq!(*platform.volume.lock(), Some(60));

    command(core.handle("turn the volume down").await);
    assert_eq!(*platform.volume.lock(), Some(50));

    assert_eq!(command(core.handle("open the chrome").await).reply, "Opening chrome");

    assert_eq!(command(core.handle("open chrome").await).reply, "Opening chrome");
    command(core.handle("search for python programming").await);
    assert_eq!(
        platform.opened.lock().as_slice(),
        [
            "chrome".to_string(),
            "chrome".to_string(),
            "https://www.google.com/search?q=python%20programming".to_string()
        ]
    );
}

#[tokio::test]
async fn unsupported_operation_is_reported() {
    let (core, _dir) = core_with(Arc::default(), true);
    let outcome = command(core.handle("lock screen").await);
    assert_eq!(outcome.status, RouteStatus::MatchedWithError);
    assert_eq!(outcome.reply, "Error executing command: That isn't supported on this computer");
}

#[tokio::test]
async fn unmatched_input_falls_back_to_conversation() {
    let (core, _dir) = core_with(Arc::default(), true);
    match core.handle("hello there").await {
        CoreResponse::Conversation(scored) => {
            assert_eq!(scored.reply, "Hello!");
            assert_eq!(scored.confidence, 0.7);
        }
        other => panic!("expected conversation, got {other:?}"),
    }
    match core.handle("zzz").await {
        CoreResponse::Conversation(scored) => {
            assert_eq!(scored.reply, "Could you rephrase that?");
            assert_eq!(scored.confidence, 0.1);
        }
        other => panic!("expected conversation, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_input_skips_fallback() {
    let (core, _dir) = core_with(Arc::default(), true);
    match core.handle("  ").await {
        CoreResponse::Empty(outcome) => assert_eq!(outcome.status, RouteStatus::Unmatched),
        other => panic!("expected empty, got {other:?}"),
    }
}

#[tokio::test]
async fn reload_picks_up_new_conversation_file() {
    let (core, dir) = core_with(Arc::default(), true);
    std::fs::write(
        dir.path().join("responses.json"),
        r#"{"buckets":[{"id":"greeting","triggers":["hello bot"],"replies":["Howdy!"]}]}"#,
    )
    .expect("rewrite responses");

    let summary = core.reload();
    assert_eq!(summary.buckets, 1);
    assert_eq!(summary.intents, 25);
    assert_eq!(core.handle("hello bot").await.reply(), "Howdy!");
}

#[tokio::test]
async fn default_config_uses_bundled_conversation_catalog() {
    let mut config = VoicebotConfig::default_new();
    config.conversation.seed = Some(3);
    let core = Core::with_collaborators(
        &config,
        Arc::new(FakeMac::default()),
        Arc::new(FakeWeb),
        Arc::new(FixedConnectivity(true)),
    )
    .expect("core");

    match core.handle("hi there").await {
        CoreResponse::Conversation(scored) => {
            assert_eq!(scored.confidence, 0.9);
            assert!(scored.reply.starts_with("H"), "{}", scored.reply);
        }
        other => panic!("expected conversation, got {other:?}"),
    }
}
