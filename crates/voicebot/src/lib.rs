pub mod error;
pub mod types;
pub mod config;
pub mod core;
pub mod utils;

pub mod command;
pub mod routing;
pub mod conversation;
pub mod actions;
pub mod platform;
pub mod services;

pub use crate::config::{load_or_default, VoicebotConfig};
pub use crate::core::{Core, ReloadSummary};
pub use crate::error::{CoreError, CoreResult};
pub use crate::types::{CoreResponse, RouteOutcome, RouteStatus, ScoredReply};
