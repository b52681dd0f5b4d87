use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const BUILTIN_RESPONSES: &str = include_str!("../../data/responses.json");

/// Id of the bucket used when nothing scores above the threshold.
pub const DEFAULT_BUCKET: &str = "default";

/// A topic with the phrases that trigger it and the replies it can give.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationBucket {
    pub id: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub replies: Vec<String>,
}

impl ConversationBucket {
    pub fn new<T, R>(id: impl Into<String>, triggers: T, replies: R) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            id: id.into(),
            triggers: triggers.into_iter().map(Into::into).collect(),
            replies: replies.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_BUCKET
    }

    /// Lower-case and trim triggers, dropping blanks and repeats.
    fn normalize(mut self) -> Self {
        let mut seen = HashSet::new();
        self.triggers = self
            .triggers
            .into_iter()
            .map(|trigger| trigger.trim().to_lowercase())
            .filter(|trigger| !trigger.is_empty() && seen.insert(trigger.clone()))
            .collect();
        self.replies.retain(|reply| !reply.trim().is_empty());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BucketFile {
    buckets: Vec<ConversationBucket>,
}

/// Ordered topic buckets plus the optional default bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationCatalog {
    buckets: Vec<ConversationBucket>,
    default: Option<ConversationBucket>,
}

impl ConversationCatalog {
    /// Build a catalog, skipping buckets that cannot take part in matching.
    pub fn new(buckets: Vec<ConversationBucket>) -> Self {
        let mut catalog = Self::default();
        for bucket in buckets {
            catalog.push(bucket);
        }
        catalog
    }

    /// Append a bucket. Returns whether it was accepted.
    pub fn push(&mut self, bucket: ConversationBucket) -> bool {
        let bucket = bucket.normalize();
        if bucket.is_default() {
            if self.default.is_some() {
                tracing::warn!("duplicate default conversation bucket ignored");
                return false;
            }
            self.default = Some(bucket);
            return true;
        }
        if bucket.triggers.is_empty() || bucket.replies.is_empty() {
            tracing::warn!(bucket = %bucket.id, "conversation bucket needs triggers and replies");
            return false;
        }
        if self.get(&bucket.id).is_some() {
            tracing::warn!(bucket = %bucket.id, "duplicate conversation bucket ignored");
            return false;
        }
        self.buckets.push(bucket);
        true
    }

    pub fn from_json(data: &str) -> CoreResult<Self> {
        let file: BucketFile = serde_json::from_str(data)
            .map_err(|e| CoreError::Config(format!("invalid conversation catalog: {e}")))?;
        Ok(Self::new(file.buckets))
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&data)
    }

    /// The catalog shipped in `data/responses.json`.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_RESPONSES).unwrap_or_else(|error| {
            tracing::warn!(%error, "bundled conversation catalog is invalid");
            Self::default()
        })
    }

    /// Load `path`, or an empty catalog if it is missing or malformed.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!(path = %path.display(), buckets = catalog.len(), "loaded conversation catalog");
                catalog
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "using empty conversation catalog");
                Self::default()
            }
        }
    }

    /// Non-default buckets in file order.
    pub fn buckets(&self) -> &[ConversationBucket] {
        &self.buckets
    }

    pub fn default_bucket(&self) -> Option<&ConversationBucket> {
        self.default.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&ConversationBucket> {
        self.buckets.iter().find(|bucket| bucket.id == id)
    }

    pub fn len(&self) -> usize {
        self.buckets.len() + usize::from(self.default.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_buckets_in_order() {
        let catalog = ConversationCatalog::from_json(
            r#"{"buckets":[
                {"id":"greeting","triggers":["Hello Bot","hi"],"replies":["Hello!"]},
                {"id":"joke","triggers":["joke"],"replies":["Why did the robot cross the road?"]},
                {"id":"default","replies":["Tell me more."]}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<&str> = catalog.buckets().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["greeting", "joke"]);
        assert_eq!(catalog.get("greeting").unwrap().triggers, vec!["hello bot", "hi"]);
        assert!(catalog.default_bucket().is_some());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn skips_buckets_without_triggers_or_replies() {
        let catalog = ConversationCatalog::new(vec![
            ConversationBucket::new("empty", Vec::<String>::new(), ["reply"]),
            ConversationBucket::new("mute", ["shh"], Vec::<String>::new()),
            ConversationBucket::new("ok", ["  ", "hey", "HEY"], ["Hey!"]),
        ]);
        assert_eq!(catalog.buckets().len(), 1);
        assert_eq!(catalog.get("ok").unwrap().triggers, vec!["hey"]);
    }

    #[test]
    fn malformed_or_missing_file_gives_empty_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(ConversationCatalog::load_or_empty(file.path()).is_empty());
        assert!(ConversationCatalog::load_or_empty(Path::new("/nonexistent/responses.json")).is_empty());
    }

    #[test]
    fn bundled_catalog_has_greeting_and_default() {
        let catalog = ConversationCatalog::builtin();
        assert!(catalog.get("greeting").is_some());
        assert!(catalog.default_bucket().is_some());
    }
}
