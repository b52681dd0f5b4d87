use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::conversation::SimilarityWeights;
use crate::error::{CoreError, CoreResult};

pub const VOICEBOT_CONFIG_FILENAME: &str = "voicebot.json";
pub const VOICEBOT_CONFIG_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoicebotConfig {
    pub version: String,
    pub router: RouterPreferences,
    pub conversation: ConversationPreferences,
    pub services: ServicePreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterPreferences {
    pub action_timeout_ms: u64,
    /// Replaces the built-in intent catalog when set.
    pub intents_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationPreferences {
    /// Replaces the bundled conversation catalog when set.
    pub responses_path: Option<PathBuf>,
    pub weights: SimilarityWeights,
    /// Fixed seed for reply selection; random when unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePreferences {
    pub cache_ttl_seconds: u64,
    pub cache_capacity: u64,
    pub http_timeout_ms: u64,
    pub probe_address: String,
    pub probe_timeout_ms: u64,
    /// Adapter id (`macos`, `portable`); the native adapter when unset.
    pub platform: Option<String>,
}

impl VoicebotConfig {
    pub fn default_new() -> Self {
        Self {
            version: VOICEBOT_CONFIG_VERSION.to_string(),
            router: RouterPreferences::default(),
            conversation: ConversationPreferences::default(),
            services: ServicePreferences::default(),
        }
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.router.action_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.services.cache_ttl_seconds)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.services.http_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.services.probe_timeout_ms)
    }
}

impl Default for VoicebotConfig {
    fn default() -> Self {
        Self::default_new()
    }
}

impl Default for RouterPreferences {
    fn default() -> Self {
        Self {
            action_timeout_ms: 5_000,
            intents_path: None,
        }
    }
}

impl Default for ConversationPreferences {
    fn default() -> Self {
        Self {
            responses_path: None,
            weights: SimilarityWeights::default(),
            seed: None,
        }
    }
}

impl Default for ServicePreferences {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 600,
            cache_capacity: 16,
            http_timeout_ms: 5_000,
            probe_address: "8.8.8.8:53".to_string(),
            probe_timeout_ms: 2_000,
            platform: None,
        }
    }
}

pub fn load_config(path: &Path) -> CoreResult<VoicebotConfig> {
    let data = std::fs::read_to_string(path).map_err(|error| {
        CoreError::Config(format!("failed to read {}: {error}", path.display()))
    })?;
    serde_json::from_str(&data).map_err(|error| {
        CoreError::Config(format!("failed to parse {}: {error}", path.display()))
    })
}

/// Load `path`, falling back to defaults when it is missing or malformed.
pub fn load_or_default(path: &Path) -> VoicebotConfig {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return VoicebotConfig::default_new();
    }
    match load_config(path) {
        Ok(config) => {
            if config.version != VOICEBOT_CONFIG_VERSION {
                tracing::warn!(
                    path = %path.display(),
                    version = %config.version,
                    "unexpected config version"
                );
            }
            config
        }
        Err(error) => {
            tracing::warn!(%error, "using default configuration");
            VoicebotConfig::default_new()
        }
    }
}

pub fn write_config(path: &Path, config: &VoicebotConfig) -> CoreResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| {
        CoreError::Internal(format!("failed to serialize config {}: {error}", path.display()))
    })?;
    std::fs::write(path, data).map_err(|error| {
        CoreError::Config(format!("failed to write {}: {error}", path.display()))
    })
}
