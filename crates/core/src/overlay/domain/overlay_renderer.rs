use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::detection::domain::face_analysis::{AgeRange, BoundingBox, DetectionResult, Landmark};
use crate::overlay::domain::label_painter::LabelPainter;
use crate::overlay::domain::overlay_style::OverlayStyle;
use crate::overlay::domain::pixel_geometry::{PixelPoint, PixelRect};
use crate::shared::frame::Frame;

/// Draws face analysis results onto frames.
///
/// For each face, in result order: bounding box, then landmarks, then the
/// age label, all onto the same frame. Frame dimensions never change and
/// anything outside the frame is clipped.
pub struct OverlayRenderer {
    style: OverlayStyle,
    label_painter: Box<dyn LabelPainter>,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle, label_painter: Box<dyn LabelPainter>) -> Self {
        Self {
            style,
            label_painter,
        }
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn render(&self, frame: &mut Frame, result: &DetectionResult) {
        for face in &result.faces {
            self.render_bounding_box(frame, &face.bounding_box);
            self.render_landmarks(frame, &face.landmarks);
            self.render_age_range(frame, &face.age_range, &face.bounding_box);
        }
    }

    /// Outlines the box between its mapped corners (both inclusive). Extra
    /// thickness grows outward from that outline.
    pub fn render_bounding_box(&self, frame: &mut Frame, bounding_box: &BoundingBox) {
        let rect = PixelRect::from_normalized(bounding_box, frame.width(), frame.height());
        let width = rect.right.saturating_sub(rect.left).max(0) as u32 + 1;
        let height = rect.bottom.saturating_sub(rect.top).max(0) as u32 + 1;

        for ring in 0..self.style.box_thickness.max(1) {
            let grow = ring as i32;
            let outline = Rect::at(rect.left.saturating_sub(grow), rect.top.saturating_sub(grow))
                .of_size(width + 2 * ring, height + 2 * ring);
            draw_hollow_rect_mut(frame.as_image_mut(), outline, self.style.box_color);
        }
    }

    pub fn render_landmarks(&self, frame: &mut Frame, landmarks: &[Landmark]) {
        let (width, height) = (frame.width(), frame.height());
        for landmark in landmarks {
            let point = PixelPoint::from_normalized(landmark, width, height);
            draw_filled_circle_mut(
                frame.as_image_mut(),
                (point.x, point.y),
                self.style.landmark_radius,
                self.style.landmark_color,
            );
        }
    }

    /// Writes `"{low}-{high}"` with its baseline starting at the box's
    /// top-left corner, so the label sits on the box's upper edge.
    pub fn render_age_range(&self, frame: &mut Frame, age_range: &AgeRange, bounding_box: &BoundingBox) {
        let anchor =
            PixelRect::from_normalized(bounding_box, frame.width(), frame.height()).top_left();
        self.label_painter.paint(
            frame.as_image_mut(),
            &age_range.label(),
            anchor,
            &self.style.label,
        );
    }
}
