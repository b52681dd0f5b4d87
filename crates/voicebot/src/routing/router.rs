use std::sync::Arc;
use std::time::Duration;

use crate::actions::{invoke_action, ActionParam, ActionRegistry, DEFAULT_ACTION_TIMEOUT};
use crate::command;
use crate::error::CoreResult;
use crate::types::RouteOutcome;
use crate::utils::SnapshotCell;

use super::catalog::IntentCatalog;
use super::extract::extract;
use super::format::format_reply;
use super::intent::{Intent, IntentSpec};
use super::lint;

pub const NO_MATCH_REPLY: &str = "I did not recognize that command. Try asking about location, weather, battery, or system information.";
pub const EMPTY_INPUT_REPLY: &str = "I didn't catch that. Please say a command.";

const SUGGESTIONS: [&str; 5] = [
    "Where am I?",
    "What is the weather?",
    "Check battery status",
    "System information",
    "Find nearby restaurants",
];

/// Resolves utterances against the intent catalog and dispatches the winner.
///
/// The catalog sits behind a snapshot cell: a reload swaps it wholesale and
/// calls already in flight finish against the catalog they started with.
pub struct Router {
    catalog: SnapshotCell<IntentCatalog>,
    registry: Arc<ActionRegistry>,
    action_timeout: Duration,
}

impl Router {
    pub fn new(catalog: IntentCatalog, registry: Arc<ActionRegistry>) -> Self {
        lint::warn_shadowing(&catalog);
        Self {
            catalog: SnapshotCell::new(catalog),
            registry,
            action_timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }

    /// Router over the built-in catalog.
    pub fn builtin(registry: Arc<ActionRegistry>) -> CoreResult<Self> {
        let catalog = IntentCatalog::builtin(&registry)?;
        Ok(Self::new(catalog, registry))
    }

    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> Arc<IntentCatalog> {
        self.catalog.load()
    }

    pub fn registry(&self) -> &Arc<ActionRegistry> {
        &self.registry
    }

    /// Swap in a new catalog, returning the previous one.
    pub fn replace_catalog(&self, catalog: IntentCatalog) -> Arc<IntentCatalog> {
        lint::warn_shadowing(&catalog);
        tracing::info!(intents = catalog.len(), "intent catalog replaced");
        self.catalog.replace(catalog)
    }

    /// Compile `specs` against this router's actions and swap them in.
    /// On error the current catalog stays in place.
    pub fn reload_specs(&self, specs: Vec<IntentSpec>) -> CoreResult<()> {
        let catalog = IntentCatalog::compile(specs, &self.registry)?;
        self.replace_catalog(catalog);
        Ok(())
    }

    /// Route one utterance. Never fails: action errors surface as
    /// `matched_with_error` outcomes.
    pub async fn resolve(&self, text: &str) -> RouteOutcome {
        let command = command::parse(text);
        if command.is_empty() {
            return RouteOutcome::unmatched(EMPTY_INPUT_REPLY, suggestions());
        }

        let catalog = self.catalog.load();
        let matched = catalog.intents().iter().find_map(|intent| {
            let (_, captures) = intent.first_match(&command.normalized_text)?;
            Some((intent, extract(&intent.spec, &command, &captures)))
        });
        let Some((intent, param)) = matched else {
            tracing::debug!(input = %command.normalized_text, "no intent matched");
            return RouteOutcome::unmatched(NO_MATCH_REPLY, suggestions());
        };

        tracing::debug!(intent = intent.id(), param = ?param, "intent matched");
        self.dispatch(intent, param).await
    }

    /// Id of the intent `text` would dispatch to, without running it.
    pub fn matching_intent(&self, text: &str) -> Option<String> {
        let command = command::parse(text);
        if command.is_empty() {
            return None;
        }
        self.catalog
            .load()
            .intents()
            .iter()
            .find(|intent| intent.first_match(&command.normalized_text).is_some())
            .map(|intent| intent.id().to_string())
    }

    async fn dispatch(&self, intent: &Intent, param: Option<ActionParam>) -> RouteOutcome {
        let action = intent.spec.action.as_str();
        let Some(handler) = intent.handler.clone() else {
            tracing::warn!(intent = intent.id(), action, "dispatch to unbound action");
            return RouteOutcome::matched_with_error(
                intent.id(),
                format!("Command {action} not implemented"),
                None,
            );
        };

        match invoke_action(action, handler, param, self.action_timeout).await {
            Ok(result) => {
                let reply = format_reply(intent.spec.template.as_deref(), &result);
                if result.succeeded {
                    RouteOutcome::matched(intent.id(), reply, result.payload)
                } else {
                    RouteOutcome::matched_with_error(intent.id(), reply, Some(result.payload))
                }
            }
            Err(error) => {
                tracing::warn!(intent = intent.id(), action, %error, "action failed");
                RouteOutcome::matched_with_error(
                    intent.id(),
                    format!("Error executing command: {}", error.user_message()),
                    None,
                )
            }
        }
    }

    /// Categorized list of what the router understands.
    pub fn help(&self) -> String {
        let catalog = self.catalog.load();
        let mut categories: Vec<(&str, Vec<&str>)> = Vec::new();
        for intent in catalog.intents() {
            let category = if intent.spec.category.is_empty() {
                "Other"
            } else {
                intent.spec.category.as_str()
            };
            let description = if intent.spec.description.is_empty() {
                intent.id()
            } else {
                intent.spec.description.as_str()
            };
            match categories.iter_mut().find(|(name, _)| *name == category) {
                Some((_, entries)) => entries.push(description),
                None => categories.push((category, vec![description])),
            }
        }

        let mut text = String::from("Available commands:\n");
        for (category, entries) in categories {
            text.push_str(&format!("\n{category}:\n"));
            for entry in entries {
                text.push_str(&format!("  • {entry}\n"));
            }
        }
        text
    }
}

fn suggestions() -> Vec<String> {
    SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}
