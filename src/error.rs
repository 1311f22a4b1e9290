//! Error types for image location operations
//!
//! This module defines the error taxonomy for the locator engine. The
//! important split is [`LocatorError::is_recoverable`]: recoverable errors
//! (a screenshot tool exiting nonzero, a capture timing out) are logged and
//! absorbed by the retry loop, while configuration errors (a missing device
//! identifier, invalid settings) abort the whole search.
//!
//! "Image not found" and "match out of screen bounds" are deliberately not
//! error variants: they are normal negative results surfaced through
//! [`SearchResult`](crate::model::SearchResult).

use crate::model::PlatformKind;

/// Result type alias for locator operations
pub type LocatorResult<T> = Result<T, LocatorError>;

/// Error type for screenshot capture, matching, and OCR operations
///
/// Each variant carries context about what went wrong and provides
/// remediation guidance through the `remediation_hint()` method.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    /// The device identifier required for capture is structurally missing
    #[error("No device identifier configured for {platform} capture")]
    MissingDeviceId {
        /// Platform whose capture path requires the identifier
        platform: PlatformKind,
    },

    /// A screenshot or shell tool exited nonzero or could not be spawned
    #[error("Capture tool '{tool}' failed: {reason}")]
    CaptureFailed {
        /// Name of the external tool (e.g., "idevicescreenshot", "adb")
        tool:   String,
        /// Why the invocation failed
        reason: String,
    },

    /// An external process exceeded its time budget
    #[error("Capture tool '{tool}' timed out after {duration_ms}ms")]
    CaptureTimeout {
        /// Name of the external tool
        tool:        String,
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// The device screen size could not be determined
    #[error("Screen size unavailable: {reason}")]
    ScreenSizeUnavailable {
        /// Why the size query or parse failed
        reason: String,
    },

    /// Invalid search or engine parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: String,
        /// Reason why it's invalid
        reason:    String,
    },

    /// Text extraction from a cropped image failed
    #[error("OCR failed: {reason}")]
    OcrFailed {
        /// Why text extraction failed
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image decode, encode, or crop error
    #[error("Image processing error: {0}")]
    ImageError(String),
}

impl From<image::ImageError> for LocatorError {
    fn from(err: image::ImageError) -> Self {
        LocatorError::ImageError(err.to_string())
    }
}

impl LocatorError {
    /// Whether the retry loop may absorb this error and proceed to the
    /// next attempt
    ///
    /// Per-attempt failures of the capture tooling are recoverable; missing
    /// configuration is not, since every subsequent attempt would fail the
    /// same way.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LocatorError::CaptureFailed { .. }
                | LocatorError::CaptureTimeout { .. }
                | LocatorError::IoError(_)
        )
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use image_locator::{error::LocatorError, model::PlatformKind};
    ///
    /// let error = LocatorError::MissingDeviceId {
    ///     platform: PlatformKind::Ios,
    /// };
    /// assert!(error.remediation_hint().contains("UDID"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            LocatorError::MissingDeviceId { platform } => match platform {
                PlatformKind::Ios => {
                    "Set the device UDID (e.g., from `idevice_id -l`) when constructing the iOS \
                     screenshot provider. idevicescreenshot cannot pick a device on its own when \
                     several are attached."
                }
                PlatformKind::Android => {
                    "Pass the device serial (from `adb devices`) when more than one device is \
                     attached, or connect exactly one device."
                }
            },
            LocatorError::CaptureFailed { tool, .. } => match tool.as_str() {
                "idevicescreenshot" => {
                    "Check that libimobiledevice is installed, the device is paired and unlocked, \
                     and the UDID matches an attached device."
                }
                "adb" => {
                    "Check that adb is on PATH and `adb devices` lists the target device as \
                     'device' (not 'unauthorized' or 'offline')."
                }
                "sips" => {
                    "sips ships with macOS; on other hosts convert the capture to PNG with a \
                     different tool or skip conversion."
                }
                _ => "Check that the capture tool is installed and the device is reachable.",
            },
            LocatorError::CaptureTimeout { .. } => {
                "The external tool did not finish within its time budget. Check for a stuck \
                 device connection or raise the per-call timeout on the provider."
            }
            LocatorError::ScreenSizeUnavailable { .. } => {
                "Screen size comes from `adb shell dumpsys window` on Android or the automation \
                 driver on iOS. Verify the device is attached and the dumpsys output contains \
                 mUnrestrictedScreen."
            }
            LocatorError::InvalidParameter { parameter, .. } => match parameter.as_str() {
                "retries" => "Retries must be at least 1.",
                "tolerance" => "Tolerance must be a finite value between 0.0 and 1.0.",
                _ => "Check the parameter value against the API documentation.",
            },
            LocatorError::OcrFailed { .. } => {
                "Check that tesseract is installed and the cropped image is readable. Low-contrast \
                 crops often extract poorly; try a tighter query image."
            }
            LocatorError::IoError(_) => {
                "An I/O error occurred. Check file permissions, disk space, and that the \
                 screenshots directory is writable."
            }
            LocatorError::ImageError(_) => {
                "Image processing failed. Ensure the screenshot file is a valid PNG and the crop \
                 region lies within the image."
            }
        }
    }
}
