//! Image matcher boundary
//!
//! The feature-matching algorithm itself is an external collaborator: given
//! a query image, a scene (screenshot) image, and a similarity tolerance, it
//! either returns the located quadrilateral plus center in scene-pixel
//! coordinates or reports no sufficiently confident match. Typical
//! implementations wrap an OpenCV AKAZE/ORB pipeline or a template-matching
//! library; the locator only depends on this trait.

use std::path::Path;

use async_trait::async_trait;

use crate::{error::LocatorResult, model::ScreenLocation};

pub mod mock;

pub use mock::MockMatcher;

/// Finds a query image inside a scene image
///
/// Coordinates in the returned [`ScreenLocation`] are scene pixels; the
/// locator applies retina correction and bounds validation afterwards.
/// Results should be deterministic enough that the same image pair and
/// tolerance produce the same answer.
#[async_trait]
pub trait ImageMatcher: Send + Sync {
    /// Searches `scene` for `query` at the given similarity tolerance
    ///
    /// Returns `Ok(None)` when no sufficiently confident match exists;
    /// that is a normal negative result, not an error.
    async fn find(
        &self,
        query: &Path,
        scene: &Path,
        tolerance: f64,
    ) -> LocatorResult<Option<ScreenLocation>>;
}
