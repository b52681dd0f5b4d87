use std::path::PathBuf;
use std::sync::Arc;

use crate::actions::{register_system_actions, ActionRegistry, SystemActions};
use crate::command;
use crate::config::VoicebotConfig;
use crate::conversation::FallbackEngine;
use crate::error::CoreResult;
use crate::platform::{select_platform, SharedPlatform};
use crate::routing::catalog::load_specs;
use crate::routing::{IntentCatalog, Router};
use crate::services::{
    Connectivity, JsonFetch, LocationService, ReqwestFetch, SnapshotCache, TcpProbe,
    WeatherService,
};
use crate::types::{CoreResponse, RouteStatus};

/// Counts after a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSummary {
    pub intents: usize,
    pub buckets: usize,
}

/// Primary facade: routes each utterance and falls back to conversation.
pub struct Core {
    router: Router,
    fallback: FallbackEngine,
    intents_path: Option<PathBuf>,
}

impl Core {
    pub fn new(router: Router, fallback: FallbackEngine) -> Self {
        Self {
            router,
            fallback,
            intents_path: None,
        }
    }

    /// Wire the real platform, network services and catalogs from `config`.
    pub fn from_config(config: &VoicebotConfig) -> CoreResult<Self> {
        let fetch: Arc<dyn JsonFetch> = Arc::new(ReqwestFetch::new(config.http_timeout()));
        let connectivity: Arc<dyn Connectivity> = Arc::new(TcpProbe::new(
            config.services.probe_address.clone(),
            config.probe_timeout(),
        ));
        let platform = select_platform(config.services.platform.as_deref());
        Self::with_collaborators(config, platform, fetch, connectivity)
    }

    pub fn with_collaborators(
        config: &VoicebotConfig,
        platform: SharedPlatform,
        fetch: Arc<dyn JsonFetch>,
        connectivity: Arc<dyn Connectivity>,
    ) -> CoreResult<Self> {
        let cache = SnapshotCache::new(config.services.cache_capacity, config.cache_ttl());
        let location = Arc::new(LocationService::new(
            fetch.clone(),
            connectivity.clone(),
            cache.clone(),
        ));
        let weather = Arc::new(WeatherService::new(fetch, connectivity, location.clone(), cache));
        let actions = Arc::new(SystemActions::new(platform, location, weather));
        tracing::info!(platform = actions.platform_id(), "system actions ready");

        let mut registry = ActionRegistry::new();
        register_system_actions(&mut registry, actions);
        let registry = Arc::new(registry);

        let intents_path = config.router.intents_path.clone();
        let catalog = IntentCatalog::load_or_builtin(intents_path.as_deref(), &registry)?;
        let router = Router::new(catalog, registry).with_action_timeout(config.action_timeout());
        let conversation = &config.conversation;
        let fallback = match &conversation.responses_path {
            Some(path) => FallbackEngine::from_path(path, conversation.weights, conversation.seed),
            None => FallbackEngine::builtin(conversation.weights, conversation.seed),
        };

        Ok(Self {
            router,
            fallback,
            intents_path,
        })
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn fallback(&self) -> &FallbackEngine {
        &self.fallback
    }

    /// Handle one utterance. Empty input never reaches the fallback engine.
    pub async fn handle(&self, text: &str) -> CoreResponse {
        if command::parse(text).is_empty() {
            return CoreResponse::Empty(self.router.resolve(text).await);
        }
        let outcome = self.router.resolve(text).await;
        if outcome.status == RouteStatus::Unmatched {
            return CoreResponse::Conversation(self.fallback.respond(text));
        }
        CoreResponse::Command(outcome)
    }

    pub fn help(&self) -> String {
        self.router.help()
    }

    /// Re-read the intent file (if configured) and the conversation file.
    ///
    /// An intent file that fails to load leaves the current intents in place.
    pub fn reload(&self) -> ReloadSummary {
        if let Some(path) = &self.intents_path {
            if let Err(error) = load_specs(path).and_then(|specs| self.router.reload_specs(specs)) {
                tracing::warn!(path = %path.display(), %error, "keeping current intent catalog");
            }
        }
        let buckets = self.fallback.reload();
        ReloadSummary {
            intents: self.router.catalog().len(),
            buckets,
        }
    }
}
