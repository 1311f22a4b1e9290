//! Data models and type definitions for image location
//!
//! This module defines the core types used throughout the crate:
//! - Platform selection and retina-correction mode
//! - Geometry types (points, dimensions, located regions)
//! - Per-search settings and the search result

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Mobile platform whose screen is being searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// iOS device (device-agent capture via idevicescreenshot)
    Ios,
    /// Android device (capture via adb screencap)
    Android,
}

impl PlatformKind {
    /// Returns the platform as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Ios => "ios",
            PlatformKind::Android => "android",
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether matched coordinates are rescaled for retina/high-DPI captures
///
/// The correction exists because some capture paths produce native-pixel
/// screenshots while the automation driver reports logical points. It is an
/// explicit engine setting rather than an implicit platform check;
/// [`RetinaMode::for_platform`] gives the historically observed default
/// (enabled on iOS only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetinaMode {
    /// Matched coordinates are used as the matcher reported them
    Disabled,
    /// Matched coordinates are divided down when the scene is denser than
    /// the logical screen
    Enabled,
}

impl RetinaMode {
    /// The default correction mode observed for each platform: iOS
    /// screenshots are captured at native density, Android coordinates
    /// already arrive in capture-pixel space.
    pub fn for_platform(platform: PlatformKind) -> Self {
        match platform {
            PlatformKind::Ios => RetinaMode::Enabled,
            PlatformKind::Android => RetinaMode::Disabled,
        }
    }
}

/// A point in screen or scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen or scene dimensions in whole pixels / logical points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub width:  u32,
    pub height: u32,
}

impl Dimension {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the same dimensions normalized to landscape orientation
    /// (width >= height), used when comparing screen and scene sizes
    pub fn landscape(&self) -> Dimension {
        if self.height > self.width {
            Dimension::new(self.height, self.width)
        } else {
            *self
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A located region on screen: four quadrilateral corners plus the center
///
/// The corner order (top-left, top-right, bottom-left, bottom-right) is a
/// fixed contract. `center` is the arithmetic midpoint of top-left and
/// bottom-right, which is what bounds validation checks; it is not the
/// polygon centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenLocation {
    pub top_left:     Point,
    pub top_right:    Point,
    pub bottom_left:  Point,
    pub bottom_right: Point,
    pub center:       Point,
}

impl ScreenLocation {
    pub fn new(
        top_left: Point,
        top_right: Point,
        bottom_left: Point,
        bottom_right: Point,
        center: Point,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
            center,
        }
    }

    /// Builds a location from the four corners, deriving the center as the
    /// midpoint of top-left and bottom-right
    pub fn from_corners(
        top_left: Point,
        top_right: Point,
        bottom_left: Point,
        bottom_right: Point,
    ) -> Self {
        let center = Point::new(
            (top_left.x + bottom_right.x) / 2.0,
            (top_left.y + bottom_right.y) / 2.0,
        );
        Self::new(top_left, top_right, bottom_left, bottom_right, center)
    }

    /// Returns a copy with all five points divided by `factor`
    ///
    /// Used by retina correction to map native-pixel coordinates back to
    /// logical points.
    pub fn divided_by(&self, factor: f64) -> ScreenLocation {
        let div = |p: Point| Point::new(p.x / factor, p.y / factor);
        ScreenLocation {
            top_left:     div(self.top_left),
            top_right:    div(self.top_right),
            bottom_left:  div(self.bottom_left),
            bottom_right: div(self.bottom_right),
            center:       div(self.center),
        }
    }

    /// Width of the axis-aligned box implied by the top edge
    pub fn width(&self) -> f64 {
        self.top_right.x - self.top_left.x
    }

    /// Height of the axis-aligned box implied by the left edge
    pub fn height(&self) -> f64 {
        self.bottom_left.y - self.top_left.y
    }
}

/// Immutable per-search settings
///
/// Constructed fresh by the caller for each search and never mutated after
/// construction. Defaults match the historical behavior: tolerance 0.60,
/// 5 retries, no pause between attempts, no cropping.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use image_locator::model::LocatorSettings;
///
/// let settings = LocatorSettings::new()
///     .with_tolerance(0.75)
///     .with_retries(10)
///     .with_retry_wait(Duration::from_secs(2))
///     .with_crop(true);
///
/// assert_eq!(settings.retries(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorSettings {
    tolerance:  f64,
    retries:    u32,
    #[serde(with = "duration_secs")]
    retry_wait: Duration,
    crop:       bool,
}

impl Default for LocatorSettings {
    fn default() -> Self {
        Self {
            tolerance:  0.60,
            retries:    5,
            retry_wait: Duration::ZERO,
            crop:       false,
        }
    }
}

impl LocatorSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the similarity tolerance passed to the matcher (lower = more
    /// permissive)
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of screenshot-and-match attempts
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the pause between failed attempts (zero disables the pause)
    pub fn with_retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = wait;
        self
    }

    /// Whether a successful match triggers cropping of the matched region
    pub fn with_crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn retry_wait(&self) -> Duration {
        self.retry_wait
    }

    pub fn crop(&self) -> bool {
        self.crop
    }
}

/// Serialize `Duration` as whole seconds, matching how the wait was
/// historically configured.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

/// Outcome of a `find_on_screen` search
///
/// The image was found iff both the screenshot file and the location are
/// present. Immutable once returned; owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    screenshot_file: Option<PathBuf>,
    location:        Option<ScreenLocation>,
}

impl SearchResult {
    /// A negative result: no screenshot matched within the retry budget
    pub fn not_found() -> Self {
        Self {
            screenshot_file: None,
            location:        None,
        }
    }

    /// A positive result: `location` was found in `screenshot_file`
    pub fn found(screenshot_file: PathBuf, location: ScreenLocation) -> Self {
        Self {
            screenshot_file: Some(screenshot_file),
            location:        Some(location),
        }
    }

    pub fn is_found(&self) -> bool {
        self.screenshot_file.is_some() && self.location.is_some()
    }

    /// The screenshot in which the match was found
    pub fn screenshot_file(&self) -> Option<&std::path::Path> {
        self.screenshot_file.as_deref()
    }

    /// The located region in logical screen coordinates
    pub fn location(&self) -> Option<&ScreenLocation> {
        self.location.as_ref()
    }
}
