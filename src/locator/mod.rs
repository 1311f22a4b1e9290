//! The locator engine
//!
//! Orchestrates screenshot capture, matching, retina correction, and bounds
//! validation into a bounded retry loop with two modes:
//!
//! - [`LocatorEngine::find_on_screen`]: stop as soon as the query image is
//!   found (short-circuiting, bounded by the settings' retry count)
//! - [`LocatorEngine::wait_for_disappearance`]: stop as soon as the query
//!   image is absent (bounded by wall clock, not by retries)
//!
//! One search runs at a time on the calling task; retries and polling are
//! sequential sleeps, never parallel attempts. Every attempt leaves its
//! screenshot behind in the [`ScreenshotStore`] for post-hoc debugging.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::{
    capture::ScreenshotProvider,
    crop,
    error::{LocatorError, LocatorResult},
    matcher::ImageMatcher,
    model::{Dimension, LocatorSettings, PlatformKind, RetinaMode, ScreenLocation, SearchResult},
    ocr::TextExtractor,
    util::ScreenshotStore,
};

pub mod bounds;
pub mod retina;

/// Overall wall-clock budget for disappearance polling
pub const DISAPPEARANCE_TIMEOUT: Duration = Duration::from_secs(300);

/// Fixed pause between disappearance polls
pub const DISAPPEARANCE_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Outcome of a single capture-and-match attempt
enum Attempt {
    /// Valid match, search is over
    Found(SearchResult),
    /// Matcher ran and the image is not on screen
    Absent,
    /// Capture or matcher failed recoverably; nothing can be concluded
    Skipped,
}

/// Vision-based element locator for one device
///
/// Holds the capture and matching collaborators behind trait objects; the
/// caller owns session state and screen dimensions and passes them in per
/// search. The engine itself keeps no mutable state between searches.
pub struct LocatorEngine {
    provider: Arc<dyn ScreenshotProvider>,
    matcher:  Arc<dyn ImageMatcher>,
    store:    ScreenshotStore,
    retina:   RetinaMode,
}

impl LocatorEngine {
    /// Creates an engine with the platform's default retina mode
    pub fn new(
        provider: Arc<dyn ScreenshotProvider>,
        matcher: Arc<dyn ImageMatcher>,
        store: ScreenshotStore,
    ) -> Self {
        let retina = RetinaMode::for_platform(provider.platform());
        Self {
            provider,
            matcher,
            store,
            retina,
        }
    }

    /// Overrides the retina correction mode
    pub fn with_retina_mode(mut self, mode: RetinaMode) -> Self {
        self.retina = mode;
        self
    }

    /// The platform the engine captures from
    pub fn platform(&self) -> PlatformKind {
        self.provider.platform()
    }

    /// The store holding this engine's screenshot artifacts
    pub fn store(&self) -> &ScreenshotStore {
        &self.store
    }

    /// Searches the screen for `query`, retrying until found or exhausted
    ///
    /// Performs up to `settings.retries()` capture-and-match attempts and
    /// returns as soon as one produces a match that survives retina
    /// correction and bounds validation. Recoverable capture failures are
    /// logged and consume an attempt; a structurally missing device
    /// identifier aborts the whole call. When `settings.crop()` is set, a
    /// successful match also writes the cropped region next to the
    /// screenshot (see [`crop::cropped_path`]).
    ///
    /// Returns a negative [`SearchResult`] when every attempt misses; that
    /// is not an error.
    pub async fn find_on_screen(
        &self,
        query: &Path,
        settings: &LocatorSettings,
        screen: Dimension,
    ) -> LocatorResult<SearchResult> {
        if settings.retries() == 0 {
            return Err(LocatorError::InvalidParameter {
                parameter: "retries".to_string(),
                reason:    "must be at least 1".to_string(),
            });
        }

        let query_name = query_base_name(query)?;
        let started = Instant::now();
        info!(query = %query.display(), retries = settings.retries(), "searching for image");

        for attempt in 0..settings.retries() {
            match self.attempt(query, &query_name, attempt, settings, screen).await? {
                Attempt::Found(result) => {
                    info!(
                        elapsed_secs = started.elapsed().as_secs(),
                        attempt, "image found"
                    );
                    if settings.crop() {
                        let screenshot = result
                            .screenshot_file()
                            .expect("found result carries its screenshot");
                        let location = result.location().expect("found result carries a location");
                        let cropped = crop::crop_to_location(screenshot, location)?;
                        info!(cropped = %cropped.display(), "cropped matched region");
                    }
                    return Ok(result);
                }
                Attempt::Absent | Attempt::Skipped => {
                    // Pause between attempts only; the last miss returns
                    // immediately
                    if attempt + 1 < settings.retries() && !settings.retry_wait().is_zero() {
                        debug!(wait_secs = settings.retry_wait().as_secs(), "waiting before retry");
                        sleep(settings.retry_wait()).await;
                    }
                }
            }
        }

        info!(
            elapsed_secs = started.elapsed().as_secs(),
            "image not found after {} attempts",
            settings.retries()
        );
        Ok(SearchResult::not_found())
    }

    /// Polls until `query` is no longer on screen
    ///
    /// Captures and matches every 3 seconds for up to 300 seconds of wall
    /// clock, independent of any retry-count setting. Returns `true` on the
    /// first poll where the match is absent; `false` (with a warning, not
    /// an error) when the image is still present at the end of the budget.
    pub async fn wait_for_disappearance(
        &self,
        query: &Path,
        screen: Dimension,
    ) -> LocatorResult<bool> {
        let query_name = query_base_name(query)?;
        let settings = LocatorSettings::default();
        let deadline = Instant::now() + DISAPPEARANCE_TIMEOUT;
        let mut attempt: u32 = 0;

        info!(query = %query.display(), "waiting for image to disappear");

        while Instant::now() < deadline {
            match self.attempt(query, &query_name, attempt, &settings, screen).await? {
                Attempt::Absent => {
                    info!(polls = attempt + 1, "image has disappeared from screen");
                    return Ok(true);
                }
                Attempt::Found(_) => {
                    debug!(attempt, "image still present");
                }
                Attempt::Skipped => {
                    // Could not observe the screen; absence is not proven
                }
            }
            sleep(DISAPPEARANCE_POLL_INTERVAL).await;
            attempt += 1;
        }

        warn!(polls = attempt, "image did not disappear within the timeout");
        Ok(false)
    }

    /// Finds `query`, cropping the matched region on success
    pub async fn find_and_crop(
        &self,
        query: &Path,
        settings: &LocatorSettings,
        screen: Dimension,
    ) -> LocatorResult<SearchResult> {
        self.find_on_screen(query, &settings.clone().with_crop(true), screen)
            .await
    }

    /// Finds `query`, crops the matched region, and extracts its text
    ///
    /// Returns `Ok(None)` when the image is not on screen.
    pub async fn read_text(
        &self,
        query: &Path,
        screen: Dimension,
        extractor: &dyn TextExtractor,
    ) -> LocatorResult<Option<String>> {
        let result = self
            .find_and_crop(query, &LocatorSettings::default(), screen)
            .await?;

        let Some(screenshot) = result.screenshot_file() else {
            return Ok(None);
        };

        let cropped = crop::cropped_path(screenshot);
        let text = extractor.extract_text(&cropped).await?;
        Ok(Some(text))
    }

    /// Runs one capture-and-match attempt
    async fn attempt(
        &self,
        query: &Path,
        query_name: &str,
        attempt: u32,
        settings: &LocatorSettings,
        screen: Dimension,
    ) -> LocatorResult<Attempt> {
        let destination = self.store.screenshot_path(query_name, attempt)?;

        let screenshot = match self.provider.capture(&destination).await {
            Ok(path) => {
                self.store.record(path.clone());
                path
            }
            Err(err) if err.is_recoverable() => {
                warn!(attempt, error = %err, "screenshot capture failed, skipping attempt");
                return Ok(Attempt::Skipped);
            }
            Err(err) => return Err(err),
        };

        debug!(scene = %screenshot.display(), "matching query against screenshot");
        let location = match self
            .matcher
            .find(query, &screenshot, settings.tolerance())
            .await
        {
            Ok(Some(location)) => location,
            Ok(None) => return Ok(Attempt::Absent),
            Err(err) => {
                warn!(attempt, error = %err, "matcher failed, skipping attempt");
                return Ok(Attempt::Skipped);
            }
        };

        match self.validate(location, &screenshot, screen) {
            Some(corrected) => Ok(Attempt::Found(SearchResult::found(screenshot, corrected))),
            None => Ok(Attempt::Absent),
        }
    }

    /// Applies retina correction and bounds validation to a raw match
    ///
    /// Returns `None` when the corrected center falls off the logical
    /// screen, demoting the match to "not found".
    fn validate(
        &self,
        location: ScreenLocation,
        screenshot: &Path,
        screen: Dimension,
    ) -> Option<ScreenLocation> {
        let corrected = match self.retina {
            RetinaMode::Enabled => {
                let (width, height) = match image::image_dimensions(screenshot) {
                    Ok(dims) => dims,
                    Err(err) => {
                        warn!(error = %err, "could not read scene dimensions, skipping match");
                        return None;
                    }
                };
                retina::correct(screen, location, Dimension::new(width, height))
            }
            RetinaMode::Disabled => location,
        };

        if bounds::is_within_bounds(corrected.center, screen) {
            Some(corrected)
        } else {
            warn!(
                center = ?corrected.center,
                %screen,
                "coordinates do not match the screen, treating as not found"
            );
            None
        }
    }
}

/// Base name of the query image, used to name screenshot artifacts
fn query_base_name(query: &Path) -> LocatorResult<String> {
    query
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
        .ok_or_else(|| LocatorError::InvalidParameter {
            parameter: "query".to_string(),
            reason:    format!("no usable file name in '{}'", query.display()),
        })
}
