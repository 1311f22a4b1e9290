//! Cropping of the matched region
//!
//! Given a located quadrilateral and the screenshot it was found in, this
//! module writes a new image cropped to the match, for downstream OCR. The
//! crop rectangle is the axis-aligned box implied by the top-left corner
//! plus the top edge's width and the left edge's height; it is not a
//! perspective-correct quadrilateral crop. The original screenshot is
//! retained unmodified.

use std::path::{Path, PathBuf};

use image::GenericImageView;
use tracing::debug;

use crate::{
    error::{LocatorError, LocatorResult},
    model::ScreenLocation,
};

/// The deterministic output path for a screenshot's cropped region
///
/// `reports/foo_screenshot_2.png` crops to
/// `reports/foo_screenshot_2_cropped.png`.
pub fn cropped_path(screenshot: &Path) -> PathBuf {
    let stem = screenshot
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("screenshot");
    screenshot.with_file_name(format!("{stem}_cropped.png"))
}

/// Crops `screenshot` to the axis-aligned box of `location`
///
/// The rectangle starts at the top-left corner with width
/// `top_right.x - top_left.x` and height `bottom_left.y - top_left.y`,
/// clamped into the image bounds. Returns the path of the new file.
///
/// # Errors
///
/// - [`LocatorError::InvalidParameter`] - the location implies an empty or
///   negative rectangle
/// - [`LocatorError::ImageError`] - the screenshot cannot be decoded or the
///   crop cannot be encoded
pub fn crop_to_location(
    screenshot: &Path,
    location: &ScreenLocation,
) -> LocatorResult<PathBuf> {
    let width = location.width();
    let height = location.height();
    if width <= 0.0 || height <= 0.0 {
        return Err(LocatorError::InvalidParameter {
            parameter: "location".to_string(),
            reason:    format!("crop rectangle {width}x{height} is empty"),
        });
    }

    let img = image::open(screenshot)?;
    let (img_width, img_height) = img.dimensions();

    let x = location.top_left.x.round().clamp(0.0, (img_width.saturating_sub(1)) as f64) as u32;
    let y = location.top_left.y.round().clamp(0.0, (img_height.saturating_sub(1)) as f64) as u32;
    let w = (width.round() as u32).min(img_width - x);
    let h = (height.round() as u32).min(img_height - y);

    debug!(x, y, w, h, "cropping matched region");
    let cropped = img.crop_imm(x, y, w, h);

    let out = cropped_path(screenshot);
    cropped.save(&out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn sample_location() -> ScreenLocation {
        ScreenLocation::from_corners(
            Point::new(10.0, 20.0),
            Point::new(110.0, 20.0),
            Point::new(10.0, 70.0),
            Point::new(110.0, 70.0),
        )
    }

    fn write_screenshot(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        image::DynamicImage::new_rgb8(width, height)
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_cropped_path_naming() {
        let out = cropped_path(Path::new("reports/login_screenshot_2.png"));
        assert_eq!(out, PathBuf::from("reports/login_screenshot_2_cropped.png"));
    }

    #[test]
    fn test_crop_rectangle_from_corners() {
        // Corners (10,20)/(110,20)/(10,70) imply rect (10,20,100,50)
        let dir = tempfile::tempdir().unwrap();
        let shot = write_screenshot(dir.path(), "scene_screenshot_0.png", 400, 300);

        let out = crop_to_location(&shot, &sample_location()).unwrap();
        assert_eq!(image::image_dimensions(&out).unwrap(), (100, 50));
    }

    #[test]
    fn test_original_screenshot_retained() {
        let dir = tempfile::tempdir().unwrap();
        let shot = write_screenshot(dir.path(), "scene_screenshot_0.png", 400, 300);

        let out = crop_to_location(&shot, &sample_location()).unwrap();
        assert_ne!(out, shot);
        assert!(shot.exists());
        assert_eq!(image::image_dimensions(&shot).unwrap(), (400, 300));
    }

    #[test]
    fn test_crop_clamped_to_image_bounds() {
        // Rect extends past the right/bottom edge; crop shrinks to fit
        let dir = tempfile::tempdir().unwrap();
        let shot = write_screenshot(dir.path(), "scene_screenshot_0.png", 60, 40);

        let out = crop_to_location(&shot, &sample_location()).unwrap();
        assert_eq!(image::image_dimensions(&out).unwrap(), (50, 20));
    }

    #[test]
    fn test_empty_rectangle_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let shot = write_screenshot(dir.path(), "scene_screenshot_0.png", 100, 100);

        let degenerate = ScreenLocation::from_corners(
            Point::new(50.0, 50.0),
            Point::new(50.0, 50.0),
            Point::new(50.0, 50.0),
            Point::new(50.0, 50.0),
        );
        let err = crop_to_location(&shot, &degenerate).unwrap_err();
        assert!(matches!(err, LocatorError::InvalidParameter { .. }));
    }

    #[test]
    fn test_missing_screenshot_is_image_error() {
        let err = crop_to_location(Path::new("/nonexistent/shot.png"), &sample_location())
            .unwrap_err();
        // image::open surfaces the missing file through ImageError
        assert!(matches!(
            err,
            LocatorError::ImageError(_) | LocatorError::IoError(_)
        ));
    }
}
