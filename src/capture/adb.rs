//! Android capture and adb shell utilities
//!
//! [`AdbProvider`] captures the screen with `adb exec-out screencap -p`,
//! writing the PNG stream to the destination file. [`AdbDevice`] bundles
//! the adb fallback utilities test scripts reach for when the automation
//! driver misbehaves: screen size from `dumpsys window`, device type from
//! build properties, and raw coordinate taps through `input`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::{
    error::{LocatorError, LocatorResult},
    model::{Dimension, PlatformKind},
};

use super::{DEFAULT_TOOL_TIMEOUT, ScreenshotProvider, run_tool};

/// `(0,0) 1080x1920` tail of the mUnrestrictedScreen dumpsys entry
fn unrestricted_screen_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"mUnrestrictedScreen=?\(\d+,\s*\d+\)\s*(\d+)x(\d+)")
            .expect("static regex must compile")
    })
}

/// Handle to one Android device reachable over adb
///
/// `serial` is optional: with a single attached device adb picks it up on
/// its own, with several the serial disambiguates (`adb -s`).
#[derive(Debug, Clone)]
pub struct AdbDevice {
    serial:  Option<String>,
    timeout: Duration,
}

impl AdbDevice {
    /// Handle for the single attached device
    pub fn new() -> Self {
        Self {
            serial:  None,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Handle addressing a specific device by serial
    pub fn with_serial(serial: impl Into<String>) -> Self {
        Self {
            serial:  Some(serial.into()),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Overrides the per-tool-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the adb argument vector, injecting `-s <serial>` when set
    fn adb_args(&self, rest: &[&str]) -> Vec<String> {
        let mut args = Vec::with_capacity(rest.len() + 2);
        if let Some(serial) = &self.serial {
            args.push("-s".to_string());
            args.push(serial.clone());
        }
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    }

    async fn run_adb(&self, rest: &[&str]) -> LocatorResult<std::process::Output> {
        let mut cmd = Command::new("adb");
        cmd.args(self.adb_args(rest));
        run_tool("adb", cmd, self.timeout).await
    }

    /// Reads the physical screen size from `dumpsys window`
    ///
    /// Android 5.x+ emits an extra `OriginalmUnrestrictedScreen` line with
    /// `0x0`, which must be skipped in favor of the real
    /// `mUnrestrictedScreen` entry.
    pub async fn screen_size(&self) -> LocatorResult<Dimension> {
        let output = self.run_adb(&["shell", "dumpsys", "window"]).await?;
        let text = String::from_utf8_lossy(&output.stdout);

        parse_unrestricted_screen(&text).ok_or_else(|| LocatorError::ScreenSizeUnavailable {
            reason: "no mUnrestrictedScreen entry in dumpsys window output".to_string(),
        })
    }

    /// Whether the device reports itself as a tablet
    ///
    /// Reads `ro.build.characteristics`; tablets list "tablet" among the
    /// comma-separated characteristics.
    pub async fn is_tablet(&self) -> LocatorResult<bool> {
        let output = self
            .run_adb(&["shell", "getprop", "ro.build.characteristics"])
            .await?;
        Ok(String::from_utf8_lossy(&output.stdout).contains("tablet"))
    }

    /// Taps at absolute screen coordinates through `input tap`
    ///
    /// Fallback for when driver-level taps fail on a device.
    pub async fn tap_at(&self, x: f64, y: f64) -> LocatorResult<()> {
        let x = format!("{}", x.round() as i64);
        let y = format!("{}", y.round() as i64);
        debug!(%x, %y, "adb input tap");
        self.run_adb(&["shell", "input", "tap", &x, &y]).await?;
        Ok(())
    }

    /// Taps at coordinates given as fractions of the screen size
    ///
    /// Resolves the physical size via [`AdbDevice::screen_size`] first, so
    /// the tap lands correctly regardless of what the automation driver
    /// reports.
    pub async fn tap_at_relative(&self, x_frac: f64, y_frac: f64) -> LocatorResult<()> {
        let size = self.screen_size().await?;
        let x = size.width as f64 * x_frac;
        let y = size.height as f64 * y_frac;
        self.tap_at(x, y).await
    }
}

impl Default for AdbDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the screen dimensions from `dumpsys window` output
fn parse_unrestricted_screen(output: &str) -> Option<Dimension> {
    for line in output.lines() {
        // Android 5.x+ prints OriginalmUnrestrictedScreen=(0,0) 0x0 as well
        if line.contains("OriginalmUnrestrictedScreen") {
            continue;
        }
        if !line.contains("mUnrestrictedScreen") {
            continue;
        }
        if let Some(caps) = unrestricted_screen_re().captures(line) {
            let width: u32 = caps[1].parse().ok()?;
            let height: u32 = caps[2].parse().ok()?;
            return Some(Dimension::new(width, height));
        }
    }
    None
}

/// Screenshot provider for Android devices via `adb exec-out screencap`
#[derive(Debug, Clone)]
pub struct AdbProvider {
    device: AdbDevice,
}

impl AdbProvider {
    pub fn new(device: AdbDevice) -> Self {
        Self { device }
    }

    /// The underlying adb device handle
    pub fn device(&self) -> &AdbDevice {
        &self.device
    }
}

#[async_trait]
impl ScreenshotProvider for AdbProvider {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Android
    }

    async fn capture(&self, destination: &Path) -> LocatorResult<PathBuf> {
        debug!(dest = %destination.display(), "taking android screenshot");

        // exec-out streams raw bytes, avoiding the CRLF mangling of `adb shell`
        let output = self
            .device
            .run_adb(&["exec-out", "screencap", "-p"])
            .await?;

        if output.stdout.is_empty() {
            return Err(LocatorError::CaptureFailed {
                tool:   "adb".to_string(),
                reason: "screencap produced no output".to_string(),
            });
        }

        tokio::fs::write(destination, &output.stdout).await?;
        Ok(destination.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMPSYS_SAMPLE: &str = "\
  Display: mDisplayId=0
    init=1080x1920 420dpi cur=1080x1920 app=1080x1794 rng=1080x1017-1794x1731
    mUnrestrictedScreen=(0,0) 1080x1920
    mRestrictedScreen=(0,0) 1080x1794
    mSystemDecorRect=[0,0][1080,1794]";

    const DUMPSYS_LOLLIPOP_SAMPLE: &str = "\
    OriginalmUnrestrictedScreen=(0,0) 0x0
    mUnrestrictedScreen=(0,0) 768x1280
    mRestrictedScreen=(0,0) 768x1184";

    #[test]
    fn test_parse_unrestricted_screen() {
        let dim = parse_unrestricted_screen(DUMPSYS_SAMPLE).unwrap();
        assert_eq!(dim, Dimension::new(1080, 1920));
    }

    #[test]
    fn test_parse_skips_original_line() {
        // The 0x0 OriginalmUnrestrictedScreen entry must not win
        let dim = parse_unrestricted_screen(DUMPSYS_LOLLIPOP_SAMPLE).unwrap();
        assert_eq!(dim, Dimension::new(768, 1280));
    }

    #[test]
    fn test_parse_missing_entry() {
        assert!(parse_unrestricted_screen("mRestrictedScreen=(0,0) 1080x1794").is_none());
        assert!(parse_unrestricted_screen("").is_none());
    }

    #[test]
    fn test_adb_args_without_serial() {
        let device = AdbDevice::new();
        assert_eq!(
            device.adb_args(&["shell", "dumpsys", "window"]),
            vec!["shell", "dumpsys", "window"]
        );
    }

    #[test]
    fn test_adb_args_with_serial() {
        let device = AdbDevice::with_serial("emulator-5554");
        assert_eq!(
            device.adb_args(&["exec-out", "screencap", "-p"]),
            vec!["-s", "emulator-5554", "exec-out", "screencap", "-p"]
        );
    }

    #[test]
    fn test_provider_platform() {
        let provider = AdbProvider::new(AdbDevice::new());
        assert_eq!(provider.platform(), PlatformKind::Android);
    }
}
