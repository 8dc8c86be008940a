use image::Rgb;

/// Colours and stroke sizes for face overlays.
///
/// The defaults draw a green 2px box, red 1px-radius landmark dots and a
/// blue age label with a 2px stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub box_color: Rgb<u8>,
    pub box_thickness: u32,
    pub landmark_color: Rgb<u8>,
    pub landmark_radius: i32,
    pub label: LabelStyle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStyle {
    pub color: Rgb<u8>,
    /// Height of a digit above the baseline, in pixels.
    pub height: f32,
    pub thickness: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            box_color: Rgb([0, 255, 0]),
            box_thickness: 2,
            landmark_color: Rgb([255, 0, 0]),
            landmark_radius: 1,
            label: LabelStyle::default(),
        }
    }
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            color: Rgb([0, 0, 255]),
            height: 22.0,
            thickness: 2,
        }
    }
}
