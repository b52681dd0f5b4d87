use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::command;
use crate::error::CoreResult;
use crate::types::ScoredReply;
use crate::utils::SnapshotCell;

use super::bucket::{ConversationBucket, ConversationCatalog};
use super::similarity::{score_trigger, SimilarityWeights};

pub const APOLOGY: &str = "I'm not sure how to respond to that.";

/// Picks a canned reply for input the router did not recognize.
pub struct FallbackEngine {
    catalog: SnapshotCell<ConversationCatalog>,
    weights: SimilarityWeights,
    rng: Mutex<StdRng>,
    source: Option<PathBuf>,
}

impl FallbackEngine {
    pub fn new(catalog: ConversationCatalog, weights: SimilarityWeights, rng: StdRng) -> Self {
        Self {
            catalog: SnapshotCell::new(catalog),
            weights,
            rng: Mutex::new(rng),
            source: None,
        }
    }

    /// Engine with a deterministic reply sequence.
    pub fn seeded(catalog: ConversationCatalog, weights: SimilarityWeights, seed: u64) -> Self {
        Self::new(catalog, weights, StdRng::seed_from_u64(seed))
    }

    /// Engine over the catalog file at `path`; `reload` re-reads it.
    pub fn from_path(path: &Path, weights: SimilarityWeights, seed: Option<u64>) -> Self {
        let mut engine = Self::new(ConversationCatalog::load_or_empty(path), weights, rng_for(seed));
        engine.source = Some(path.to_path_buf());
        engine
    }

    /// Engine over the bundled catalog.
    pub fn builtin(weights: SimilarityWeights, seed: Option<u64>) -> Self {
        Self::new(ConversationCatalog::builtin(), weights, rng_for(seed))
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    pub fn catalog(&self) -> Arc<ConversationCatalog> {
        self.catalog.load()
    }

    /// Re-read the source file, if any. A bad file leaves an empty catalog.
    pub fn reload(&self) -> usize {
        let Some(path) = &self.source else {
            return self.catalog.load().len();
        };
        let catalog = ConversationCatalog::load_or_empty(path);
        let count = catalog.len();
        self.catalog.replace(catalog);
        count
    }

    pub fn replace_catalog(&self, catalog: ConversationCatalog) -> Arc<ConversationCatalog> {
        self.catalog.replace(catalog)
    }

    /// Add a bucket to the live catalog.
    pub fn add_bucket(&self, bucket: ConversationBucket) -> CoreResult<()> {
        let added = self.catalog.update(|current| {
            let mut next = current.clone();
            next.push(bucket).then_some(next)
        });
        if added {
            Ok(())
        } else {
            Err(crate::error::CoreError::InvalidInput(
                "bucket needs a new id, triggers and replies".to_string(),
            ))
        }
    }

    /// Best-scoring bucket's reply, or the default bucket's when nothing
    /// clears the threshold.
    pub fn respond(&self, text: &str) -> ScoredReply {
        let normalized = command::parse(text).normalized_text;
        let catalog = self.catalog.load();

        let mut best: Option<&ConversationBucket> = None;
        let mut best_score = 0.0_f64;
        for bucket in catalog.buckets() {
            for trigger in &bucket.triggers {
                let score = score_trigger(&normalized, trigger, &self.weights);
                if score > best_score {
                    best_score = score;
                    best = Some(bucket);
                }
            }
        }

        match best {
            Some(bucket) if best_score > self.weights.threshold => {
                tracing::debug!(bucket = %bucket.id, score = best_score, "conversation match");
                self.pick(bucket, best_score)
            }
            _ => match catalog.default_bucket() {
                Some(default) if !default.replies.is_empty() => {
                    self.pick(default, self.weights.default_confidence)
                }
                _ => ScoredReply {
                    reply: APOLOGY.to_string(),
                    confidence: 0.0,
                },
            },
        }
    }

    fn pick(&self, bucket: &ConversationBucket, confidence: f64) -> ScoredReply {
        let mut rng = self.rng.lock();
        let reply = bucket
            .replies
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_else(|| APOLOGY.to_string());
        ScoredReply {
            reply,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
