//! Registry of named action handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::CoreResult;

use super::result::{ActionParam, ActionResult};

/// A blocking action implementation. Receives the extracted parameter, if any.
pub type ActionHandler =
    Arc<dyn Fn(Option<ActionParam>) -> CoreResult<ActionResult> + Send + Sync>;

/// A named capability exposed to the intent catalog.
#[derive(Clone)]
pub struct ActionDefinition {
    pub action_id: String,
    pub description: String,
    pub handler: ActionHandler,
}

impl ActionDefinition {
    pub fn new<F>(action_id: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Option<ActionParam>) -> CoreResult<ActionResult> + Send + Sync + 'static,
    {
        Self {
            action_id: action_id.into(),
            description: description.into(),
            handler: Arc::new(handler),
        }
    }
}

impl std::fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("action_id", &self.action_id)
            .field("description", &self.description)
            .finish()
    }
}

/// Name → handler map consulted once, when an intent catalog is bound.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionDefinition>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register an action. Panics if an action with the same ID already exists.
    pub fn register(&mut self, action: ActionDefinition) {
        if self.actions.contains_key(&action.action_id) {
            panic!("duplicate action: {}", action.action_id);
        }
        self.actions.insert(action.action_id.clone(), action);
    }

    /// Register an action, replacing any existing one with the same ID.
    pub fn replace(&mut self, action: ActionDefinition) -> Option<ActionDefinition> {
        self.actions.insert(action.action_id.clone(), action)
    }

    pub fn lookup(&self, action_id: &str) -> Option<&ActionDefinition> {
        self.actions.get(action_id)
    }

    pub fn handler(&self, action_id: &str) -> Option<ActionHandler> {
        self.actions.get(action_id).map(|action| action.handler.clone())
    }

    /// Sorted list of registered action IDs.
    pub fn action_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.actions.keys().map(|s| s.as_str()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_action(id: &str) -> ActionDefinition {
        ActionDefinition::new(id, "test action", |_param| Ok(ActionResult::ok(json!({"ok": true}))))
    }

    #[test]
    fn empty_registry() {
        let reg = ActionRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.lookup("any").is_none());
        assert!(reg.action_ids().is_empty());
    }

    #[test]
    fn register_and_lookup() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("get_battery_status"));

        let action = reg.lookup("get_battery_status").unwrap();
        assert_eq!(action.action_id, "get_battery_status");
        let result = (action.handler)(None).unwrap();
        assert_eq!(result.field("ok"), Some(&json!(true)));
    }

    #[test]
    fn action_ids_are_sorted() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("set_volume"));
        reg.register(make_action("get_location"));
        reg.register(make_action("lock_screen"));

        assert_eq!(reg.action_ids(), vec!["get_location", "lock_screen", "set_volume"]);
    }

    #[test]
    fn replace_overrides_existing_handler() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("get_weather"));
        let previous = reg.replace(ActionDefinition::new("get_weather", "mock", |_| {
            Ok(ActionResult::failed("offline"))
        }));

        assert!(previous.is_some());
        let result = (reg.handler("get_weather").unwrap())(None).unwrap();
        assert!(!result.succeeded);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    #[should_panic(expected = "duplicate action")]
    fn duplicate_action_panics() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("dup"));
        reg.register(make_action("dup"));
    }
}
