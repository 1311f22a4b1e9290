//! Text extraction from cropped matches
//!
//! OCR is an external collaborator behind the [`TextExtractor`] trait,
//! invoked only after a successful find-and-crop. [`TesseractExtractor`]
//! shells out to the `tesseract` CLI the way the capture providers shell
//! out to their tools, including the bounded per-call timeout.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::{
    capture::DEFAULT_TOOL_TIMEOUT,
    error::{LocatorError, LocatorResult},
};

/// Extracts text from an image file
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Returns the text recognized in `image`
    async fn extract_text(&self, image: &Path) -> LocatorResult<String>;
}

/// `tesseract <image> stdout` wrapper
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    timeout: Duration,
}

impl TesseractExtractor {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Overrides the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for TesseractExtractor {
    async fn extract_text(&self, image: &Path) -> LocatorResult<String> {
        debug!(image = %image.display(), "running tesseract");

        let mut cmd = Command::new("tesseract");
        cmd.arg(image).arg("stdout").kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| LocatorError::OcrFailed {
                reason: format!("tesseract timed out after {}ms", self.timeout.as_millis()),
            })?
            .map_err(|e| LocatorError::OcrFailed {
                reason: format!("failed to spawn tesseract: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LocatorError::OcrFailed {
                reason: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Mock extractor returning a fixed string, for tests
#[derive(Debug)]
pub struct MockExtractor {
    text:  String,
    calls: std::sync::atomic::AtomicU32,
}

impl MockExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text:  text.into(),
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Number of extraction calls made so far
    pub fn call_count(&self) -> u32 {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract_text(&self, _image: &Path) -> LocatorResult<String> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.text.clone())
    }
}
