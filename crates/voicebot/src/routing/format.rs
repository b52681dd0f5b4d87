//! Reply rendering for action results.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::actions::ActionResult;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_ -]+?)(?:\|([^}]*))?\}").expect("valid placeholder regex"));

/// Render `{field}` and `{field|default}` placeholders from `payload`.
///
/// Missing or null fields render as the default, or `unknown` without one.
pub fn render_template(template: &str, payload: &Map<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let field = caps[1].trim();
            match payload.get(field) {
                Some(value) if !value.is_null() => display_value(value),
                _ => caps
                    .get(2)
                    .map(|default| default.as_str().to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            }
        })
        .into_owned()
}

/// Turn an action result into the sentence spoken back to the user.
pub fn format_reply(template: Option<&str>, result: &ActionResult) -> String {
    if !result.succeeded {
        return result
            .error_message
            .clone()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| "The command failed".to_string());
    }
    if let Some(template) = template {
        return render_template(template, &result.payload);
    }
    if let Some(message) = result.payload.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    if result.payload.is_empty() {
        return "Command executed successfully".to_string();
    }
    result
        .payload
        .iter()
        .map(|(key, value)| format!("{key}: {}", display_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "unknown".to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
