use std::time::Duration;

/// Unified error type for the voicebot crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// The running platform has no implementation for the requested operation.
    #[error("not implemented")]
    NotImplemented,
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A catalog or configuration file is missing, malformed or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
    /// An action collaborator failed. The message is shown to the user as-is.
    #[error("{0}")]
    Action(String),
    /// An action did not finish within its time budget.
    #[error("{action} timed out after {} ms", .after.as_millis())]
    Timeout { action: String, after: Duration },
    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Sentence shown to the user. `Display` keeps the detail for logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotImplemented => "That isn't supported on this computer".to_string(),
            Self::Timeout { .. } => "The request took too long".to_string(),
            Self::Internal(_) => "Something went wrong".to_string(),
            Self::Action(message) => message.clone(),
            Self::InvalidInput(_) | Self::Config(_) => self.to_string(),
        }
    }
}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_errors_display_without_prefix() {
        let err = CoreError::Action("Could not determine location".to_string());
        assert_eq!(err.to_string(), "Could not determine location");
    }

    #[test]
    fn timeout_names_action_and_budget() {
        let err = CoreError::Timeout {
            action: "get_weather".to_string(),
            after: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "get_weather timed out after 1500 ms");
    }

    #[test]
    fn user_message_hides_internal_detail() {
        let timeout = CoreError::Timeout {
            action: "lock_screen".to_string(),
            after: Duration::from_millis(20),
        };
        assert_eq!(timeout.user_message(), "The request took too long");
        assert_eq!(
            CoreError::NotImplemented.user_message(),
            "That isn't supported on this computer"
        );
        assert_eq!(
            CoreError::Internal("action sleep_system panicked".to_string()).user_message(),
            "Something went wrong"
        );
        assert_eq!(
            CoreError::Action("You appear to be offline".to_string()).user_message(),
            "You appear to be offline"
        );
    }
}
