use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

use super::types::SystemInfo;

/// OS automation surface used by the system actions.
///
/// Every method defaults to [`CoreError::NotImplemented`] so adapters only
/// implement what their platform supports. Calls may block; the dispatcher
/// bounds them with a timeout.
pub trait Platform: Send + Sync {
    fn id(&self) -> &str {
        "unsupported"
    }

    fn system_info(&self) -> CoreResult<SystemInfo> {
        Ok(SystemInfo {
            os: std::env::consts::OS.to_string(),
            version: "unknown".to_string(),
            machine: std::env::consts::ARCH.to_string(),
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()),
        })
    }

    /// Raw power-source report, e.g. the output of `pmset -g batt`.
    fn battery_report(&self) -> CoreResult<String> {
        Err(CoreError::NotImplemented)
    }
    /// Raw `df -h /` style report for the root volume.
    fn disk_report(&self) -> CoreResult<String> {
        Err(CoreError::NotImplemented)
    }
    /// Raw `key: value` lines describing the wireless interface.
    fn wifi_report(&self) -> CoreResult<String> {
        Err(CoreError::NotImplemented)
    }

    fn open_application(&self, _name: &str) -> CoreResult<()> {
        Err(CoreError::NotImplemented)
    }
    fn quit_application(&self, _name: &str) -> CoreResult<()> {
        Err(CoreError::NotImplemented)
    }
    fn list_open_apps(&self) -> CoreResult<Vec<String>> {
        Err(CoreError::NotImplemented)
    }
    fn open_url(&self, _url: &str) -> CoreResult<()> {
        Err(CoreError::NotImplemented)
    }

    /// Output volume, 0–100.
    fn volume(&self) -> CoreResult<u8> {
        Err(CoreError::NotImplemented)
    }
    fn set_volume(&self, _level: u8) -> CoreResult<()> {
        Err(CoreError::NotImplemented)
    }
    fn set_muted(&self, _muted: bool) -> CoreResult<()> {
        Err(CoreError::NotImplemented)
    }
    /// Display brightness, 0–100.
    fn brightness(&self) -> CoreResult<u8> {
        Err(CoreError::NotImplemented)
    }
    fn set_brightness(&self, _level: u8) -> CoreResult<()> {
        Err(CoreError::NotImplemented)
    }

    fn sleep(&self) -> CoreResult<()> {
        Err(CoreError::NotImplemented)
    }
    fn lock_screen(&self) -> CoreResult<()> {
        Err(CoreError::NotImplemented)
    }
}

pub type SharedPlatform = Arc<dyn Platform>;

#[cfg(target_os = "macos")]
pub mod macos;
#[cfg(any(not(target_os = "macos"), test))]
pub mod portable;
