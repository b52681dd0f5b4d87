//! Command routing: ordered intents, parameter extraction and dispatch.

pub mod catalog;
pub mod extract;
pub mod format;
pub mod intent;
pub mod lint;
pub mod router;

pub use catalog::{builtin_specs, IntentCatalog, IntentFile};
pub use intent::{Extractor, Intent, IntentSpec, MatchRule};
pub use lint::{lint_catalog, ShadowWarning};
pub use router::{Router, EMPTY_INPUT_REPLY, NO_MATCH_REPLY};
