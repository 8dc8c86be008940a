//! Mapping from normalized detection coordinates to frame pixels.
//!
//! Every coordinate is rounded half away from zero. The right/bottom edges
//! are computed from the already-rounded left/top so a box's pixel size
//! depends only on its normalized size and the frame size.

use crate::detection::domain::face_analysis::{BoundingBox, Landmark};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

/// Inclusive pixel rectangle; may extend past the frame or be degenerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelPoint {
    pub fn from_normalized(landmark: &Landmark, width: u32, height: u32) -> Self {
        Self {
            x: to_pixel(landmark.x * f64::from(width)),
            y: to_pixel(landmark.y * f64::from(height)),
        }
    }
}

impl PixelRect {
    pub fn from_normalized(bounding_box: &BoundingBox, width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        let left = to_pixel(bounding_box.left * w);
        let top = to_pixel(bounding_box.top * h);
        Self {
            left,
            top,
            right: to_pixel(f64::from(left) + bounding_box.width * w),
            bottom: to_pixel(f64::from(top) + bounding_box.height * h),
        }
    }

    pub fn top_left(&self) -> PixelPoint {
        PixelPoint {
            x: self.left,
            y: self.top,
        }
    }

    pub fn bottom_right(&self) -> PixelPoint {
        PixelPoint {
            x: self.right,
            y: self.bottom,
        }
    }
}

fn to_pixel(value: f64) -> i32 {
    // Saturating cast: wildly out-of-range boxes clamp instead of wrapping.
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bbox(left: f64, top: f64, width: f64, height: f64) -> BoundingBox {
        BoundingBox {
            left,
            top,
            width,
            height,
        }
    }

    fn landmark(x: f64, y: f64) -> Landmark {
        Landmark { kind: None, x, y }
    }

    #[test]
    fn test_centered_box_on_square_frame() {
        let rect = PixelRect::from_normalized(&bbox(0.25, 0.25, 0.5, 0.5), 200, 200);
        assert_eq!(rect.top_left(), PixelPoint { x: 50, y: 50 });
        assert_eq!(rect.bottom_right(), PixelPoint { x: 150, y: 150 });
    }

    #[test]
    fn test_landmark_center() {
        let point = PixelPoint::from_normalized(&landmark(0.5, 0.5), 100, 100);
        assert_eq!(point, PixelPoint { x: 50, y: 50 });
    }

    #[test]
    fn test_axes_scale_independently() {
        let rect = PixelRect::from_normalized(&bbox(0.1, 0.5, 0.2, 0.25), 640, 480);
        assert_eq!(
            rect,
            PixelRect {
                left: 64,
                top: 240,
                right: 192,
                bottom: 360
            }
        );
    }

    #[rstest]
    #[case::rounds_up(0.336, 100, 34)]
    #[case::rounds_down(0.334, 100, 33)]
    #[case::half_away_from_zero(0.125, 100, 13)]
    #[case::negative(-0.02, 100, -2)]
    #[case::beyond_frame(1.5, 100, 150)]
    fn test_landmark_rounding(#[case] x: f64, #[case] width: u32, #[case] expected: i32) {
        let point = PixelPoint::from_normalized(&landmark(x, 0.0), width, 10);
        assert_eq!(point.x, expected);
    }

    #[rstest]
    #[case(0.25, 0.25, 0.5, 0.5, 200, 200)]
    #[case(0.1, 0.2, 0.3, 0.4, 640, 480)]
    #[case(0.333, 0.777, 0.111, 0.05, 101, 57)]
    fn test_doubling_frame_doubles_coordinates(
        #[case] left: f64,
        #[case] top: f64,
        #[case] width: f64,
        #[case] height: f64,
        #[case] w: u32,
        #[case] h: u32,
    ) {
        let b = bbox(left, top, width, height);
        let small = PixelRect::from_normalized(&b, w, h);
        let large = PixelRect::from_normalized(&b, w * 2, h * 2);
        for (s, l) in [
            (small.left, large.left),
            (small.top, large.top),
            (small.right, large.right),
            (small.bottom, large.bottom),
        ] {
            assert!((l - 2 * s).abs() <= 2, "expected ~{} got {}", 2 * s, l);
        }
    }

    #[test]
    fn test_zero_sized_box_is_degenerate() {
        let rect = PixelRect::from_normalized(&bbox(0.5, 0.5, 0.0, 0.0), 100, 100);
        assert_eq!(rect.top_left(), rect.bottom_right());
    }
}
