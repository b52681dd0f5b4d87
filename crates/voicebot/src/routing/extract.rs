//! Parameter extraction for matched intents.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::actions::ActionParam;
use crate::command::ParsedCommand;

use super::intent::{Extractor, IntentSpec};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit regex"));
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|[\w.-]+\.\w{2,}").expect("valid url regex"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Pull the intent's parameter from the command, if it has one.
pub fn extract(
    spec: &IntentSpec,
    command: &ParsedCommand,
    captures: &Captures<'_>,
) -> Option<ActionParam> {
    match spec.extractor {
        Extractor::None => None,
        Extractor::TrailingNumber => trailing_number(&command.raw_text).map(ActionParam::level),
        Extractor::NamedToken => named_token(captures, &spec.keywords).map(ActionParam::app_name),
        Extractor::UrlLike => url_like(&command.raw_text).map(ActionParam::url),
        Extractor::FreeTextQuery => Some(ActionParam::query(free_text_query(
            &command.normalized_text,
            &command.raw_text,
            &spec.keywords,
        ))),
    }
}

/// The last run of digits, saturating at `i64::MAX`.
pub fn trailing_number(text: &str) -> Option<i64> {
    let digits = DIGITS.find_iter(text).last()?.as_str();
    Some(digits.parse::<i64>().unwrap_or(i64::MAX))
}

/// The first non-empty capture group that is not a command keyword.
pub fn named_token(captures: &Captures<'_>, keywords: &[String]) -> Option<String> {
    captures
        .iter()
        .skip(1)
        .flatten()
        .map(|group| group.as_str().trim())
        .find(|group| {
            !group.is_empty() && !keywords.iter().any(|keyword| keyword.eq_ignore_ascii_case(group))
        })
        .map(str::to_string)
}

pub fn url_like(text: &str) -> Option<String> {
    URL.find(text).map(|m| m.as_str().to_string())
}

/// Strip keyword phrases from `normalized`, longest first, on word boundaries.
///
/// Falls back to `original` when nothing is left.
pub fn free_text_query(normalized: &str, original: &str, keywords: &[String]) -> String {
    let mut phrases: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut query = normalized.to_string();
    for phrase in phrases {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase));
        if let Ok(re) = Regex::new(&pattern) {
            query = re.replace_all(&query, " ").into_owned();
        }
    }
    let query = SPACES.replace_all(&query, " ").trim().to_string();
    if query.is_empty() {
        original.to_string()
    } else {
        query
    }
}
