//! Action collaborator: named side-effecting capabilities that intents dispatch to.

pub mod dispatch;
pub mod registry;
pub mod result;
pub mod system;

pub use dispatch::{invoke_action, DEFAULT_ACTION_TIMEOUT};
pub use registry::{ActionDefinition, ActionHandler, ActionRegistry};
pub use result::{ActionParam, ActionResult};
pub use system::{register_system_actions, SystemActions};
