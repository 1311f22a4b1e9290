//! Shared fixtures for locator integration tests

use std::path::PathBuf;
use std::sync::Arc;

use image_locator::{
    capture::MockProvider,
    locator::LocatorEngine,
    matcher::MockMatcher,
    model::{Dimension, Point, ScreenLocation},
    util::ScreenshotStore,
};

/// Initializes test logging once; respects RUST_LOG
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One mock-backed engine with its artifact directory and query image
pub struct TestContext {
    /// Keeps the temp dir alive for the duration of the test
    pub _dir:     tempfile::TempDir,
    pub provider: Arc<MockProvider>,
    pub matcher:  Arc<MockMatcher>,
    pub engine:   LocatorEngine,
    pub query:    PathBuf,
}

impl TestContext {
    pub fn new(provider: MockProvider, matcher: MockMatcher) -> Self {
        init_tracing();

        let dir = tempfile::tempdir().expect("temp dir");
        let store = ScreenshotStore::new(dir.path().join("screenshots"));
        let provider = Arc::new(provider);
        let matcher = Arc::new(matcher);
        let engine = LocatorEngine::new(provider.clone(), matcher.clone(), store);

        let query = dir.path().join("login_button.png");
        image::DynamicImage::new_rgb8(32, 32)
            .save(&query)
            .expect("query fixture");

        Self {
            _dir: dir,
            provider,
            matcher,
            engine,
            query,
        }
    }
}

/// The logical screen used throughout the tests
pub fn screen() -> Dimension {
    Dimension::new(414, 736)
}

/// A match already in logical coordinates, center (60, 45)
pub fn logical_location() -> ScreenLocation {
    ScreenLocation::from_corners(
        Point::new(10.0, 20.0),
        Point::new(110.0, 20.0),
        Point::new(10.0, 70.0),
        Point::new(110.0, 70.0),
    )
}

/// The same match as the matcher would report it from a 3x retina scene
pub fn scene_location_3x() -> ScreenLocation {
    ScreenLocation::from_corners(
        Point::new(30.0, 60.0),
        Point::new(330.0, 60.0),
        Point::new(30.0, 210.0),
        Point::new(330.0, 210.0),
    )
}

/// A match whose center falls off the 414x736 screen
pub fn off_screen_location() -> ScreenLocation {
    ScreenLocation::from_corners(
        Point::new(450.0, 50.0),
        Point::new(550.0, 50.0),
        Point::new(450.0, 150.0),
        Point::new(550.0, 150.0),
    )
}
