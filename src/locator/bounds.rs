//! Screen-bounds validation of matched coordinates
//!
//! A matcher can produce a geometrically valid match whose center lies
//! outside the logical screen, typically when the match landed in a
//! letterboxed or stale region of the screenshot. Such matches are treated
//! as not found.

use crate::model::{Dimension, Point};

/// Whether a match center lies on the logical screen
///
/// The upper bound is exclusive: `(width, 0)` is already off screen.
pub fn is_within_bounds(center: Point, screen: Dimension) -> bool {
    center.x >= 0.0
        && center.x < screen.width as f64
        && center.y >= 0.0
        && center.y < screen.height as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_coordinate_rejected() {
        assert!(!is_within_bounds(Point::new(-1.0, 10.0), Dimension::new(400, 800)));
        assert!(!is_within_bounds(Point::new(10.0, -1.0), Dimension::new(400, 800)));
    }

    #[test]
    fn test_interior_point_accepted() {
        assert!(is_within_bounds(Point::new(399.0, 799.0), Dimension::new(400, 800)));
        assert!(is_within_bounds(Point::new(0.0, 0.0), Dimension::new(400, 800)));
        assert!(is_within_bounds(Point::new(200.5, 400.5), Dimension::new(400, 800)));
    }

    #[test]
    fn test_upper_bound_exclusive() {
        assert!(!is_within_bounds(Point::new(400.0, 0.0), Dimension::new(400, 800)));
        assert!(!is_within_bounds(Point::new(0.0, 800.0), Dimension::new(400, 800)));
    }
}
