//! iOS device-agent screenshot capture
//!
//! Captures directly from the device with `idevicescreenshot`
//! (libimobiledevice), bypassing the automation driver. The raw capture is
//! then converted to PNG in place with `sips`, since `idevicescreenshot`
//! emits TIFF on older iOS versions.
//!
//! The device UDID is required; without it `idevicescreenshot` cannot
//! address the device, so a missing UDID is a fatal configuration error
//! rather than a retryable capture failure.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::{
    error::{LocatorError, LocatorResult},
    model::PlatformKind,
};

use super::{DEFAULT_TOOL_TIMEOUT, ScreenshotProvider, run_tool};

/// Screenshot provider for iOS devices via `idevicescreenshot`
#[derive(Debug, Clone)]
pub struct IdeviceProvider {
    udid:    String,
    timeout: Duration,
}

impl IdeviceProvider {
    /// Creates a provider for the device with the given UDID
    ///
    /// # Errors
    ///
    /// [`LocatorError::MissingDeviceId`] if the UDID is empty.
    pub fn new(udid: impl Into<String>) -> LocatorResult<Self> {
        let udid = udid.into();
        if udid.trim().is_empty() {
            return Err(LocatorError::MissingDeviceId {
                platform: PlatformKind::Ios,
            });
        }
        Ok(Self {
            udid,
            timeout: DEFAULT_TOOL_TIMEOUT,
        })
    }

    /// Creates a provider from the `UDID` environment variable
    ///
    /// Matches the conventional setup of device-cloud test runners, which
    /// export the target device's UDID into the test environment.
    ///
    /// # Errors
    ///
    /// [`LocatorError::MissingDeviceId`] if `UDID` is unset or empty.
    pub fn from_env() -> LocatorResult<Self> {
        match std::env::var("UDID") {
            Ok(udid) => Self::new(udid),
            Err(_) => Err(LocatorError::MissingDeviceId {
                platform: PlatformKind::Ios,
            }),
        }
    }

    /// Overrides the per-tool-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The UDID this provider captures from
    pub fn udid(&self) -> &str {
        &self.udid
    }
}

#[async_trait]
impl ScreenshotProvider for IdeviceProvider {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Ios
    }

    async fn capture(&self, destination: &Path) -> LocatorResult<PathBuf> {
        debug!(udid = %self.udid, dest = %destination.display(), "taking idevice screenshot");

        let mut screenshot = Command::new("idevicescreenshot");
        screenshot.arg("-u").arg(&self.udid).arg(destination);
        run_tool("idevicescreenshot", screenshot, self.timeout).await?;

        // idevicescreenshot may emit TIFF; normalize to PNG in place.
        let mut convert = Command::new("sips");
        convert
            .args(["-s", "format", "png"])
            .arg(destination)
            .arg("--out")
            .arg(destination);
        run_tool("sips", convert, self.timeout).await?;

        Ok(destination.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_udid() {
        let err = IdeviceProvider::new("").unwrap_err();
        assert!(matches!(
            err,
            LocatorError::MissingDeviceId {
                platform: PlatformKind::Ios
            }
        ));
        assert!(!err.is_recoverable());

        let err = IdeviceProvider::new("   ").unwrap_err();
        assert!(matches!(err, LocatorError::MissingDeviceId { .. }));
    }

    #[test]
    fn test_new_keeps_udid() {
        let provider = IdeviceProvider::new("00008030-001A2B3C4D5E").unwrap();
        assert_eq!(provider.udid(), "00008030-001A2B3C4D5E");
        assert_eq!(provider.platform(), PlatformKind::Ios);
    }

    #[test]
    fn test_with_timeout() {
        let provider = IdeviceProvider::new("some-udid")
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(provider.timeout, Duration::from_secs(5));
    }
}
