//! Adapter selection for the running target.

use std::sync::Arc;

use super::adapters::SharedPlatform;

#[cfg(target_os = "macos")]
use super::adapters::macos::MacosPlatform;
#[cfg(any(not(target_os = "macos"), test))]
use super::adapters::portable::PortablePlatform;

/// Adapter with the given id, if it is built for this target.
pub fn platform_by_id(id: &str) -> Option<SharedPlatform> {
    match id.trim().to_ascii_lowercase().as_str() {
        #[cfg(target_os = "macos")]
        "macos" => Some(Arc::new(MacosPlatform::new())),
        #[cfg(any(not(target_os = "macos"), test))]
        "portable" => Some(Arc::new(PortablePlatform::new())),
        _ => None,
    }
}

/// The configured adapter, or the native one for this target.
///
/// An unknown or unavailable id is logged and ignored.
pub fn select_platform(preferred: Option<&str>) -> SharedPlatform {
    if let Some(id) = preferred {
        match platform_by_id(id) {
            Some(platform) => return platform,
            None => tracing::warn!(platform = id, "platform adapter not available, using native"),
        }
    }
    default_platform()
}

pub fn default_platform() -> SharedPlatform {
    #[cfg(target_os = "macos")]
    {
        Arc::new(MacosPlatform::new())
    }

    #[cfg(not(target_os = "macos"))]
    {
        Arc::new(PortablePlatform::new())
    }
}
