//! Mock screenshot provider for testing
//!
//! Implements [`ScreenshotProvider`] without a device attached: each
//! capture writes a synthetic gradient PNG at configurable dimensions.
//! Builder methods script failures and delays, and a call counter lets
//! tests assert exactly how many attempts the locator performed.
//!
//! # Examples
//!
//! ```
//! use image_locator::capture::{MockProvider, ScreenshotProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = MockProvider::new().with_dimensions(1242, 2208);
//!     let dest = std::env::temp_dir().join("mock_capture_doc.png");
//!
//!     let path = provider.capture(&dest).await.unwrap();
//!     assert_eq!(image::image_dimensions(&path).unwrap(), (1242, 2208));
//!     assert_eq!(provider.capture_count(), 1);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageBuffer, Rgba};
use tokio::time::sleep;

use crate::{
    error::{LocatorError, LocatorResult},
    model::{Dimension, PlatformKind},
};

use super::ScreenshotProvider;

/// Mock capture backend producing synthetic screenshots
#[derive(Debug)]
pub struct MockProvider {
    platform:           PlatformKind,
    dimensions:         Dimension,
    delay:              Option<Duration>,
    /// Remaining captures that fail with a recoverable error
    failures_remaining: AtomicU32,
    /// When set, every capture fails fatally with a missing identifier
    missing_device_id:  bool,
    captures:           AtomicU32,
}

impl MockProvider {
    /// Creates a mock iOS provider producing 414x736 captures
    pub fn new() -> Self {
        Self {
            platform:           PlatformKind::Ios,
            dimensions:         Dimension::new(414, 736),
            delay:              None,
            failures_remaining: AtomicU32::new(0),
            missing_device_id:  false,
            captures:           AtomicU32::new(0),
        }
    }

    /// Sets the platform the mock reports
    pub fn with_platform(mut self, platform: PlatformKind) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the pixel dimensions of generated captures
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Dimension::new(width, height);
        self
    }

    /// Sleeps for `delay` before each capture, to simulate device latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes the first `count` captures fail with a recoverable
    /// [`LocatorError::CaptureFailed`]
    pub fn failing_first(self, count: u32) -> Self {
        self.failures_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// Makes every capture fail fatally with
    /// [`LocatorError::MissingDeviceId`]
    pub fn with_missing_device_id(mut self) -> Self {
        self.missing_device_id = true;
        self
    }

    /// Number of capture calls made so far
    pub fn capture_count(&self) -> u32 {
        self.captures.load(Ordering::SeqCst)
    }

    /// Writes the synthetic gradient capture
    fn write_pattern(&self, destination: &Path) -> LocatorResult<()> {
        let Dimension { width, height } = self.dimensions;

        // Vertical gradient, blue to cyan
        let img = ImageBuffer::from_fn(width, height, |_x, y| {
            let ratio = y as f32 / height.max(1) as f32;
            Rgba([0u8, (255.0 * ratio) as u8, 255u8, 255u8])
        });

        image::DynamicImage::ImageRgba8(img).save(destination)?;
        Ok(())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScreenshotProvider for MockProvider {
    fn platform(&self) -> PlatformKind {
        self.platform
    }

    async fn capture(&self, destination: &Path) -> LocatorResult<PathBuf> {
        self.captures.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        if self.missing_device_id {
            return Err(LocatorError::MissingDeviceId {
                platform: self.platform,
            });
        }

        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(LocatorError::CaptureFailed {
                tool:   "mock".to_string(),
                reason: "scripted capture failure".to_string(),
            });
        }

        self.write_pattern(destination)?;
        Ok(destination.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dest(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join(name);
        (dir, dest)
    }

    #[tokio::test]
    async fn test_capture_writes_png_at_dimensions() {
        let (_dir, dest) = temp_dest("shot_0.png");
        let provider = MockProvider::new().with_dimensions(1242, 2208);

        let path = provider.capture(&dest).await.unwrap();
        assert_eq!(path, dest);
        assert_eq!(image::image_dimensions(&path).unwrap(), (1242, 2208));
    }

    #[tokio::test]
    async fn test_capture_count_increments() {
        let (_dir, dest) = temp_dest("shot_0.png");
        let provider = MockProvider::new();

        assert_eq!(provider.capture_count(), 0);
        provider.capture(&dest).await.unwrap();
        provider.capture(&dest).await.unwrap();
        assert_eq!(provider.capture_count(), 2);
    }

    #[tokio::test]
    async fn test_failing_first_then_recovers() {
        let (_dir, dest) = temp_dest("shot_0.png");
        let provider = MockProvider::new().failing_first(2);

        assert!(provider.capture(&dest).await.unwrap_err().is_recoverable());
        assert!(provider.capture(&dest).await.unwrap_err().is_recoverable());
        assert!(provider.capture(&dest).await.is_ok());
        assert_eq!(provider.capture_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_device_id_is_fatal_every_time() {
        let (_dir, dest) = temp_dest("shot_0.png");
        let provider = MockProvider::new().with_missing_device_id();

        let err = provider.capture(&dest).await.unwrap_err();
        assert!(matches!(err, LocatorError::MissingDeviceId { .. }));
        assert!(!err.is_recoverable());

        let err = provider.capture(&dest).await.unwrap_err();
        assert!(matches!(err, LocatorError::MissingDeviceId { .. }));
    }

    #[tokio::test]
    async fn test_platform_override() {
        let provider = MockProvider::new().with_platform(PlatformKind::Android);
        assert_eq!(provider.platform(), PlatformKind::Android);
    }
}
