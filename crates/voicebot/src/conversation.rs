//! Conversational fallback: canned replies scored by fuzzy trigger matching.

pub mod bucket;
pub mod engine;
pub mod similarity;

pub use bucket::{ConversationBucket, ConversationCatalog, DEFAULT_BUCKET};
pub use engine::{FallbackEngine, APOLOGY};
pub use similarity::{score_trigger, SimilarityWeights};
