//! Screenshot providers
//!
//! This module provides the capture side of the locator: a
//! [`ScreenshotProvider`] trait that produces a screen-capture file for the
//! current device state, with one implementation per platform mechanism:
//!
//! - [`IdeviceProvider`]: iOS device-agent capture via `idevicescreenshot`
//! - [`AdbProvider`]: Android capture via `adb exec-out screencap`
//! - [`MockProvider`]: synthetic captures for tests and development
//!
//! All providers shell out to external tools; every invocation runs under a
//! bounded per-call timeout so a stuck tool cannot hang a search forever.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{
    error::{LocatorError, LocatorResult},
    model::PlatformKind,
};

pub mod adb;
pub mod idevice;
pub mod mock;

pub use adb::{AdbDevice, AdbProvider};
pub use idevice::IdeviceProvider;
pub use mock::MockProvider;

/// Default time budget for one external tool invocation
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Produces a screenshot file for the current device state
///
/// One capture is one attempt of the locator loop. Implementations write
/// the capture to the destination path handed to them (the locator derives
/// it from the query name and attempt index) and return the written path.
///
/// Implementations must be `Send + Sync` so the provider can be shared
/// behind an `Arc` between the engine and caller-side helpers.
#[async_trait]
pub trait ScreenshotProvider: Send + Sync {
    /// The platform this provider captures from
    fn platform(&self) -> PlatformKind;

    /// Captures the current screen into `destination`
    ///
    /// # Errors
    ///
    /// - [`LocatorError::MissingDeviceId`] - required device identifier is
    ///   structurally absent (fatal; aborts the whole search)
    /// - [`LocatorError::CaptureFailed`] - tool exited nonzero or could not
    ///   be spawned (recoverable; the loop retries)
    /// - [`LocatorError::CaptureTimeout`] - tool exceeded its time budget
    ///   (recoverable)
    async fn capture(&self, destination: &Path) -> LocatorResult<PathBuf>;
}

/// Runs an external tool to completion under a timeout
///
/// Returns the process output on exit status zero. A nonzero exit maps to
/// [`LocatorError::CaptureFailed`] with a stderr excerpt, an elapsed budget
/// to [`LocatorError::CaptureTimeout`]. The child is killed if the timeout
/// drops the future.
pub(crate) async fn run_tool(
    tool: &str,
    mut command: Command,
    timeout: Duration,
) -> LocatorResult<Output> {
    command.kill_on_drop(true);
    tracing::debug!(tool, ?timeout, "running external tool");

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| LocatorError::CaptureTimeout {
            tool:        tool.to_string(),
            duration_ms: timeout.as_millis() as u64,
        })?
        .map_err(|e| LocatorError::CaptureFailed {
            tool:   tool.to_string(),
            reason: format!("failed to spawn: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LocatorError::CaptureFailed {
            tool:   tool.to_string(),
            reason: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    Ok(output)
}
