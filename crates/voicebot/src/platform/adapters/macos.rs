use std::process::Command;

use super::Platform;
use crate::error::{CoreError, CoreResult};
use crate::platform::parse::parse_app_list;
use crate::platform::types::SystemInfo;

#[derive(Debug, Default)]
pub struct MacosPlatform;

impl MacosPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for MacosPlatform {
    fn id(&self) -> &str {
        "macos"
    }

    fn system_info(&self) -> CoreResult<SystemInfo> {
        Ok(SystemInfo {
            os: "macOS".to_string(),
            version: run_command("sw_vers", &["-productVersion"])?,
            machine: std::env::consts::ARCH.to_string(),
            hostname: run_command("hostname", &[])?,
        })
    }

    fn battery_report(&self) -> CoreResult<String> {
        run_command("pmset", &["-g", "batt"])
    }

    fn disk_report(&self) -> CoreResult<String> {
        run_command("df", &["-h", "/"])
    }

    fn wifi_report(&self) -> CoreResult<String> {
        run_command("networksetup", &["-getinfo", "Wi-Fi"])
    }

    fn open_application(&self, name: &str) -> CoreResult<()> {
        run_command("open", &["-a", name]).map(|_| ())
    }

    fn quit_application(&self, name: &str) -> CoreResult<()> {
        run_applescript(&format!(
            "tell application \"{}\" to quit",
            applescript_escape(name)
        ))
        .map(|_| ())
    }

    fn list_open_apps(&self) -> CoreResult<Vec<String>> {
        let output = run_applescript(
            "tell application \"System Events\" to get name of every application process where background only is false",
        )?;
        Ok(parse_app_list(&output))
    }

    fn open_url(&self, url: &str) -> CoreResult<()> {
        run_command("open", &[url]).map(|_| ())
    }

    fn volume(&self) -> CoreResult<u8> {
        let output = run_applescript("output volume of (get volume settings)")?;
        output
            .parse::<u8>()
            .map_err(|_| CoreError::Action(format!("unexpected volume reading: {output}")))
    }

    fn set_volume(&self, level: u8) -> CoreResult<()> {
        run_applescript(&format!("set volume output volume {level}")).map(|_| ())
    }

    fn set_muted(&self, muted: bool) -> CoreResult<()> {
        run_applescript(&format!("set volume output muted {muted}")).map(|_| ())
    }

    fn brightness(&self) -> CoreResult<u8> {
        let output = run_applescript(
            "tell application \"System Events\" to get brightness of display 1",
        )?;
        output
            .parse::<f64>()
            .map(|value| value.round().clamp(0.0, 100.0) as u8)
            .map_err(|_| CoreError::Action(format!("unexpected brightness reading: {output}")))
    }

    fn set_brightness(&self, level: u8) -> CoreResult<()> {
        run_applescript(&format!(
            "tell application \"System Events\" to set brightness of display 1 to {level}"
        ))
        .map(|_| ())
    }

    fn sleep(&self) -> CoreResult<()> {
        run_applescript("tell application \"System Events\" to sleep").map(|_| ())
    }

    fn lock_screen(&self) -> CoreResult<()> {
        run_applescript(
            "tell application \"System Events\" to key code 12 using {control down, command down}",
        )
        .map(|_| ())
    }
}

fn run_command(program: &str, args: &[&str]) -> CoreResult<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|error| CoreError::Action(format!("failed to run {program}: {error}")))?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(CoreError::Action(format!(
            "{program} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

fn run_applescript(script: &str) -> CoreResult<String> {
    run_command("osascript", &["-e", script])
}

fn applescript_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_in_app_names() {
        assert_eq!(applescript_escape("My \"App\""), "My \\\"App\\\"");
    }
}
