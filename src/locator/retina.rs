//! Retina/high-DPI coordinate correction
//!
//! Some capture paths produce screenshots at native pixel density while the
//! automation driver reports the screen in logical points. A match found in
//! such a screenshot carries coordinates 2x or 3x too large; this module
//! divides them back down.
//!
//! Display scale is discrete (1x/2x/3x), not a continuous DPI ratio, so the
//! factor is chosen by comparing the logical screen against the scene: when
//! the screen is smaller than half the scene in both landscape-normalized
//! axes the device renders at 3x, otherwise at 2x.

use tracing::debug;

use crate::model::{Dimension, ScreenLocation};

/// Rescales a matched location from scene pixels to logical points
///
/// Both dimensions are normalized to landscape purely for the comparison;
/// the returned coordinates are never rotated. When the screen is not
/// strictly smaller than the scene in both axes the location is returned
/// unmodified, so the correction is idempotent for already-logical input.
pub fn correct(
    screen: Dimension,
    location: ScreenLocation,
    scene: Dimension,
) -> ScreenLocation {
    let screen_l = screen.landscape();
    let scene_l = scene.landscape();

    let (screen_w, screen_h) = (screen_l.width as f64, screen_l.height as f64);
    let (scene_w, scene_h) = (scene_l.width as f64, scene_l.height as f64);

    if screen_w < scene_w && screen_h < scene_h {
        let factor = if screen_w < scene_w / 2.0 && screen_h < scene_h / 2.0 {
            3.0
        } else {
            2.0
        };
        debug!(%screen, %scene, factor, "rescaling coordinates for retina display");
        location.divided_by(factor)
    } else {
        location
    }
}
