use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Scores for each rung of the matching ladder, and the cut-off below
/// which the default bucket answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityWeights {
    /// The whole trigger appears in the input.
    pub substring: f64,
    /// Trigger and input share at least one word.
    pub word_overlap: f64,
    /// Some trigger word appears inside the input.
    pub partial_word: f64,
    /// Best scores at or below this fall back to the default bucket.
    pub threshold: f64,
    pub default_confidence: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            substring: 0.9,
            word_overlap: 0.7,
            partial_word: 0.6,
            threshold: 0.3,
            default_confidence: 0.1,
        }
    }
}

/// Score one trigger against normalized input.
pub fn score_trigger(text: &str, trigger: &str, weights: &SimilarityWeights) -> f64 {
    if text.contains(trigger) {
        return weights.substring;
    }
    let text_words: HashSet<&str> = text.split_whitespace().collect();
    let mut trigger_words = trigger.split_whitespace();
    if trigger_words.clone().any(|word| text_words.contains(word)) {
        return weights.word_overlap;
    }
    if trigger_words.any(|word| text.contains(word)) {
        return weights.partial_word;
    }
    0.0
}
