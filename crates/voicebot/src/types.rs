use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the router handled an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Matched,
    MatchedWithError,
    Unmatched,
}

/// Result of routing one utterance. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOutcome {
    /// The matched intent, or `unknown`.
    pub intent_id: String,
    pub status: RouteStatus,
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    /// Sample commands, only populated when unmatched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl RouteOutcome {
    pub const UNKNOWN_INTENT: &'static str = "unknown";

    pub fn matched(intent_id: &str, reply: String, payload: Map<String, Value>) -> Self {
        Self {
            intent_id: intent_id.to_string(),
            status: RouteStatus::Matched,
            reply,
            payload: Some(payload),
            suggestions: Vec::new(),
        }
    }

    pub fn matched_with_error(
        intent_id: &str,
        reply: String,
        payload: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            intent_id: intent_id.to_string(),
            status: RouteStatus::MatchedWithError,
            reply,
            payload,
            suggestions: Vec::new(),
        }
    }

    pub fn unmatched(reply: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            intent_id: Self::UNKNOWN_INTENT.to_string(),
            status: RouteStatus::Unmatched,
            reply: reply.into(),
            payload: None,
            suggestions,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.status != RouteStatus::Unmatched
    }
}

/// A conversational reply and how confident the fallback engine is in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReply {
    pub reply: String,
    /// In `[0, 1]`.
    pub confidence: f64,
}

/// What the facade hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoreResponse {
    /// The router matched an intent.
    Command(RouteOutcome),
    /// No intent matched; the fallback engine replied.
    Conversation(ScoredReply),
    /// Input was empty.
    Empty(RouteOutcome),
}

impl CoreResponse {
    pub fn reply(&self) -> &str {
        match self {
            Self::Command(outcome) | Self::Empty(outcome) => &outcome.reply,
            Self::Conversation(scored) => &scored.reply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_outcome_uses_unknown_intent() {
        let outcome = RouteOutcome::unmatched("nope", vec!["Where am I?".into()]);
        assert_eq!(outcome.intent_id, "unknown");
        assert!(!outcome.is_matched());
        assert!(outcome.payload.is_none());
    }

    #[test]
    fn response_serializes_with_kind_tag() {
        let response = CoreResponse::Conversation(ScoredReply {
            reply: "Hi!".into(),
            confidence: 0.9,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "conversation");
        assert_eq!(response.reply(), "Hi!");
    }
}
