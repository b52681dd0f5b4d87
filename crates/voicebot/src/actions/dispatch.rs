//! Bounded-time execution of blocking action handlers.

use std::time::{Duration, Instant};

use crate::error::{CoreError, CoreResult};

use super::registry::ActionHandler;
use super::result::{ActionParam, ActionResult};

/// Per-call budget used when the configuration does not set one.
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `handler` on the blocking pool and wait at most `timeout` for it.
///
/// A handler that overruns keeps running in the background; its result is
/// discarded. Panics are reported as internal errors.
pub async fn invoke_action(
    action_id: &str,
    handler: ActionHandler,
    param: Option<ActionParam>,
    timeout: Duration,
) -> CoreResult<ActionResult> {
    let started_at = Instant::now();
    let task = tokio::task::spawn_blocking(move || handler(param));

    let outcome = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) if join_error.is_panic() => {
            Err(CoreError::Internal(format!("action {action_id} panicked")))
        }
        Ok(Err(join_error)) => Err(CoreError::Internal(format!(
            "action {action_id} was cancelled: {join_error}"
        ))),
        Err(_) => Err(CoreError::Timeout {
            action: action_id.to_string(),
            after: timeout,
        }),
    };

    tracing::debug!(
        action = action_id,
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        ok = outcome.is_ok(),
        "action finished"
    );
    outcome
}
