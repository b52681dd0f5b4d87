use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::actions::ActionHandler;
use crate::error::{CoreError, CoreResult};

/// How an intent pulls its single parameter out of the utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extractor {
    #[default]
    None,
    TrailingNumber,
    NamedToken,
    UrlLike,
    FreeTextQuery,
}

/// Declarative description of an intent, as written in a catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSpec {
    pub id: String,
    /// Regex sources, tried in order.
    pub rules: Vec<String>,
    pub action: String,
    #[serde(default)]
    pub extractor: Extractor,
    /// Literal command words: skipped by `named_token`, stripped by `free_text_query`.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// A compiled, case-insensitive match rule.
#[derive(Debug, Clone)]
pub struct MatchRule {
    pub source: String,
    pub regex: Regex,
}

impl MatchRule {
    pub fn compile(source: &str) -> CoreResult<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(|e| CoreError::Config(format!("invalid rule {source:?}: {e}")))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Number of explicit capture groups.
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }
}

/// An intent ready for routing: compiled rules plus its bound handler.
#[derive(Clone)]
pub struct Intent {
    pub spec: IntentSpec,
    pub rules: Vec<MatchRule>,
    /// `None` when no registered action carries the intent's action name.
    pub handler: Option<ActionHandler>,
}

impl Intent {
    pub fn compile(spec: IntentSpec) -> CoreResult<Self> {
        if spec.id.trim().is_empty() {
            return Err(CoreError::Config("intent with empty id".to_string()));
        }
        if spec.rules.is_empty() {
            return Err(CoreError::Config(format!("intent {} has no rules", spec.id)));
        }
        let rules = spec
            .rules
            .iter()
            .map(|source| MatchRule::compile(source))
            .collect::<CoreResult<Vec<_>>>()
            .map_err(|e| CoreError::Config(format!("intent {}: {e}", spec.id)))?;
        Ok(Self {
            spec,
            rules,
            handler: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// The first rule that finds a match anywhere in `text`, with its captures.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<(&MatchRule, regex::Captures<'t>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.regex.captures(text).map(|caps| (rule, caps)))
    }

    pub fn is_bound(&self) -> bool {
        self.handler.is_some()
    }
}

impl std::fmt::Debug for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intent")
            .field("id", &self.spec.id)
            .field("action", &self.spec.action)
            .field("rules", &self.spec.rules)
            .field("bound", &self.is_bound())
            .finish()
    }
}
