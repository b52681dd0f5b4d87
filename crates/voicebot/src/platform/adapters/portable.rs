use std::process::Command;

use super::Platform;
use crate::error::{CoreError, CoreResult};

/// Fallback adapter for platforms without dedicated automation support.
///
/// Disk usage and URL opening work anywhere `df` and an opener exist; the
/// remaining operations report that they are unsupported.
#[derive(Debug, Default)]
pub struct PortablePlatform;

impl PortablePlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for PortablePlatform {
    fn id(&self) -> &str {
        "portable"
    }

    fn battery_report(&self) -> CoreResult<String> {
        Err(not_supported("Battery status"))
    }

    fn disk_report(&self) -> CoreResult<String> {
        let output = Command::new("df")
            .args(["-h", "/"])
            .output()
            .map_err(|error| CoreError::Action(format!("failed to run df: {error}")))?;
        if !output.status.success() {
            return Err(CoreError::Action(format!("df failed with status {}", output.status)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn wifi_report(&self) -> CoreResult<String> {
        Err(not_supported("Network status"))
    }

    fn open_application(&self, _name: &str) -> CoreResult<()> {
        Err(not_supported("Opening applications"))
    }

    fn quit_application(&self, _name: &str) -> CoreResult<()> {
        Err(not_supported("Closing applications"))
    }

    fn list_open_apps(&self) -> CoreResult<Vec<String>> {
        Err(not_supported("Listing applications"))
    }

    fn open_url(&self, url: &str) -> CoreResult<()> {
        open_url_native(url)
    }

    fn volume(&self) -> CoreResult<u8> {
        Err(not_supported("Volume control"))
    }

    fn set_volume(&self, _level: u8) -> CoreResult<()> {
        Err(not_supported("Volume control"))
    }

    fn set_muted(&self, _muted: bool) -> CoreResult<()> {
        Err(not_supported("Volume control"))
    }

    fn brightness(&self) -> CoreResult<u8> {
        Err(not_supported("Brightness control"))
    }

    fn set_brightness(&self, _level: u8) -> CoreResult<()> {
        Err(not_supported("Brightness control"))
    }

    fn sleep(&self) -> CoreResult<()> {
        Err(not_supported("Sleep"))
    }

    fn lock_screen(&self) -> CoreResult<()> {
        Err(not_supported("Screen locking"))
    }
}

fn not_supported(feature: &str) -> CoreError {
    CoreError::Action(format!("{feature} is not supported on this platform"))
}

#[cfg(target_os = "windows")]
fn open_url_native(url: &str) -> CoreResult<()> {
    spawn_opener("cmd", &["/C", "start", "", url])
}

#[cfg(not(target_os = "windows"))]
fn open_url_native(url: &str) -> CoreResult<()> {
    spawn_opener("xdg-open", &[url])
}

fn spawn_opener(program: &str, args: &[&str]) -> CoreResult<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|error| CoreError::Action(format!("failed to run {program}: {error}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(CoreError::Action(format!("{program} failed with status {status}")))
    }
}
