mod adapters;
pub mod factory;
pub mod parse;
pub mod types;

pub use adapters::{Platform, SharedPlatform};
pub use factory::{default_platform, platform_by_id, select_platform};
pub use types::{BatteryReading, DiskUsage, SystemInfo};
