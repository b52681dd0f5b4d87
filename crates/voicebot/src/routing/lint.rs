//! Startup checks for intents that are likely shadowed by earlier ones.

use std::collections::BTreeSet;

use super::catalog::IntentCatalog;
use super::intent::MatchRule;

const NUMBER_TOKEN: &str = "#number";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShadowWarning {
    /// An earlier intent matches one of a later intent's example phrases.
    ExampleCaptured {
        earlier: String,
        later: String,
        example: String,
    },
    /// Two rules take the same number of captures and the earlier rule's
    /// literal words all appear in the later one.
    OverlappingRules {
        earlier: String,
        earlier_rule: String,
        later: String,
        later_rule: String,
    },
}

impl std::fmt::Display for ShadowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExampleCaptured {
                earlier,
                later,
                example,
            } => write!(f, "intent {earlier} captures example {example:?} of later intent {later}"),
            Self::OverlappingRules {
                earlier,
                earlier_rule,
                later,
                later_rule,
            } => write!(
                f,
                "rule {earlier_rule:?} of {earlier} overlaps rule {later_rule:?} of later intent {later}"
            ),
        }
    }
}

/// Inspect the catalog for probable shadowing. Findings are advisory.
pub fn lint_catalog(catalog: &IntentCatalog) -> Vec<ShadowWarning> {
    let intents = catalog.intents();
    let mut warnings = Vec::new();

    for (index, later) in intents.iter().enumerate() {
        for example in &later.spec.examples {
            let example = example.trim().to_lowercase();
            if let Some(earlier) = intents[..index]
                .iter()
                .find(|earlier| earlier.first_match(&example).is_some())
            {
                warnings.push(ShadowWarning::ExampleCaptured {
                    earlier: earlier.id().to_string(),
                    later: later.id().to_string(),
                    example,
                });
            }
        }
    }

    for (index, earlier) in intents.iter().enumerate() {
        for later in &intents[index + 1..] {
            for earlier_rule in &earlier.rules {
                let earlier_words = literal_words(earlier_rule);
                if earlier_words.is_empty() {
                    continue;
                }
                for later_rule in &later.rules {
                    if earlier_rule.capture_count() == later_rule.capture_count()
                        && earlier_words.is_subset(&literal_words(later_rule))
                    {
                        warnings.push(ShadowWarning::OverlappingRules {
                            earlier: earlier.id().to_string(),
                            earlier_rule: earlier_rule.source.clone(),
                            later: later.id().to_string(),
                            later_rule: later_rule.source.clone(),
                        });
                    }
                }
            }
        }
    }

    warnings
}

/// Log every finding as a warning and return how many there were.
pub fn warn_shadowing(catalog: &IntentCatalog) -> usize {
    let warnings = lint_catalog(catalog);
    for warning in &warnings {
        tracing::warn!("possible intent shadowing: {warning}");
    }
    warnings.len()
}

/// Words a rule requires outside any group, plus a marker when it needs a number.
fn literal_words(rule: &MatchRule) -> BTreeSet<String> {
    let mut words = BTreeSet::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_class = false;
    let mut chars = rule.source.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next() == Some('d') {
                    words.insert(NUMBER_TOKEN.to_string());
                }
                flush(&mut current, &mut words);
            }
            '[' if !in_class => {
                in_class = true;
                flush(&mut current, &mut words);
            }
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                depth += 1;
                flush(&mut current, &mut words);
            }
            ')' if !in_class => {
                depth = depth.saturating_sub(1);
                current.clear();
            }
            c if c.is_alphabetic() && depth == 0 && !in_class => {
                current.extend(c.to_lowercase());
            }
            _ => flush(&mut current, &mut words),
        }
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut BTreeSet<String>) {
    if !current.is_empty() {
        words.insert(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionRegistry;
    use crate::routing::intent::{Extractor, IntentSpec};

    fn spec(id: &str, rules: &[&str], examples: &[&str]) -> IntentSpec {
        IntentSpec {
            id: id.to_string(),
            rules: rules.iter().map(|r| r.to_string()).collect(),
            action: id.to_string(),
            extractor: Extractor::None,
            keywords: Vec::new(),
            category: String::new(),
            description: String::new(),
            examples: examples.iter().map(|e| e.to_string()).collect(),
            template: None,
        }
    }

    fn catalog(specs: Vec<IntentSpec>) -> IntentCatalog {
        IntentCatalog::compile(specs, &ActionRegistry::new()).unwrap()
    }

    #[test]
    fn builtin_catalog_is_clean() {
        let catalog = IntentCatalog::builtin(&ActionRegistry::new()).unwrap();
        assert_eq!(lint_catalog(&catalog), Vec::new());
    }

    #[test]
    fn flags_example_captured_by_earlier_intent() {
        let warnings = lint_catalog(&catalog(vec![
            spec("mute", &["mute"], &["mute"]),
            spec("unmute", &["unmute"], &["unmute"]),
        ]));
        assert!(warnings.contains(&ShadowWarning::ExampleCaptured {
            earlier: "mute".into(),
            later: "unmute".into(),
            example: "unmute".into(),
        }));
    }

    #[test]
    fn flags_overlapping_rules_with_equal_captures() {
        let warnings = lint_catalog(&catalog(vec![
            spec("open_app", &[r"open (\w+)"], &[]),
            spec("open_url", &[r"open (\S+\.com)"], &[]),
        ]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("of open_app overlaps"));
    }

    #[test]
    fn number_requirement_prevents_overlap() {
        let warnings = lint_catalog(&catalog(vec![
            spec("set_volume", &[r"volume (\d+)"], &[]),
            spec("volume", &[r"volume (level)"], &[]),
        ]));
        assert!(warnings.is_empty());
    }

    #[test]
    fn literal_words_skip_groups_and_escapes() {
        let rule = MatchRule::compile(r"\b(set|change) volume (?:to )?(\d+)").unwrap();
        let words: Vec<String> = literal_words(&rule).into_iter().collect();
        assert_eq!(words, vec![NUMBER_TOKEN.to_string(), "volume".to_string()]);
    }
}
