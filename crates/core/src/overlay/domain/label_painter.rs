use image::RgbImage;

use crate::overlay::domain::overlay_style::LabelStyle;
use crate::overlay::domain::pixel_geometry::PixelPoint;

/// Draws short text labels onto an image.
///
/// `anchor` is the left end of the text baseline: glyphs extend upward and
/// to the right of it. Parts falling outside the image are clipped.
pub trait LabelPainter: Send {
    fn paint(&self, image: &mut RgbImage, text: &str, anchor: PixelPoint, style: &LabelStyle);
}
