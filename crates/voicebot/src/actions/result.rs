use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome reported by an action collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub succeeded: bool,
    /// Action-specific fields, consumed by reply templates.
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ActionResult {
    /// A successful result. Objects become the payload; any other value is
    /// stored under `value`.
    pub fn ok(payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Self {
            succeeded: true,
            payload,
            error_message: None,
        }
    }

    /// A successful result whose only content is a sentence for the user.
    pub fn message(message: impl Into<String>) -> Self {
        let mut payload = Map::new();
        payload.insert("status".to_string(), Value::from("success"));
        payload.insert("message".to_string(), Value::from(message.into()));
        Self {
            succeeded: true,
            payload,
            error_message: None,
        }
    }

    /// A failed result. The message should read as a plain sentence.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            payload: Map::new(),
            error_message: Some(message.into()),
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

/// The single parameter an extractor hands to an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionParam {
    pub name: String,
    pub value: Value,
}

impl ActionParam {
    pub const LEVEL: &'static str = "level";
    pub const APP_NAME: &'static str = "app_name";
    pub const URL: &'static str = "url";
    pub const QUERY: &'static str = "query";

    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn level(level: i64) -> Self {
        Self::new(Self::LEVEL, level)
    }

    pub fn app_name(name: impl Into<String>) -> Self {
        Self::new(Self::APP_NAME, name.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::new(Self::URL, url.into())
    }

    pub fn query(query: impl Into<String>) -> Self {
        Self::new(Self::QUERY, query.into())
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}
