//! Built-in single-stroke font for age labels.
//!
//! Age labels only ever contain digits and a hyphen, so a handful of
//! polyline glyphs cover them without shipping or downloading a font.
//! Glyphs live on a 4x6 grid with y=0 at the top and y=6 on the baseline.

use image::RgbImage;
use imageproc::drawing::draw_antialiased_line_segment_mut;
use imageproc::pixelops::interpolate;

use crate::overlay::domain::label_painter::LabelPainter;
use crate::overlay::domain::overlay_style::LabelStyle;
use crate::overlay::domain::pixel_geometry::PixelPoint;

type Glyph = &'static [&'static [(i32, i32)]];

const GLYPH_HEIGHT: i32 = 6;
const GLYPH_ADVANCE: i32 = 6;

const ZERO: Glyph = &[&[(1, 0), (3, 0), (4, 1), (4, 5), (3, 6), (1, 6), (0, 5), (0, 1), (1, 0)]];
const ONE: Glyph = &[&[(1, 1), (2, 0), (2, 6)], &[(1, 6), (3, 6)]];
const TWO: Glyph = &[&[(0, 1), (1, 0), (3, 0), (4, 1), (4, 2), (0, 6), (4, 6)]];
const THREE: Glyph = &[&[(0, 0), (4, 0), (2, 2), (3, 2), (4, 3), (4, 5), (3, 6), (1, 6), (0, 5)]];
const FOUR: Glyph = &[&[(3, 6), (3, 0), (0, 4), (4, 4)]];
const FIVE: Glyph = &[&[(4, 0), (0, 0), (0, 2), (3, 2), (4, 3), (4, 5), (3, 6), (0, 6)]];
const SIX: Glyph = &[&[
    (3, 0),
    (1, 0),
    (0, 1),
    (0, 5),
    (1, 6),
    (3, 6),
    (4, 5),
    (4, 3),
    (3, 2),
    (1, 2),
    (0, 3),
]];
const SEVEN: Glyph = &[&[(0, 0), (4, 0), (1, 6)]];
const EIGHT: Glyph = &[
    &[(1, 0), (3, 0), (4, 1), (4, 2), (3, 3), (1, 3), (0, 2), (0, 1), (1, 0)],
    &[(1, 3), (0, 4), (0, 5), (1, 6), (3, 6), (4, 5), (4, 4), (3, 3)],
];
const NINE: Glyph = &[&[
    (1, 6),
    (3, 6),
    (4, 5),
    (4, 1),
    (3, 0),
    (1, 0),
    (0, 1),
    (0, 3),
    (1, 4),
    (3, 4),
    (4, 3),
]];
const HYPHEN: Glyph = &[&[(1, 3), (3, 3)]];

fn glyph(c: char) -> Option<Glyph> {
    match c {
        '0' => Some(ZERO),
        '1' => Some(ONE),
        '2' => Some(TWO),
        '3' => Some(THREE),
        '4' => Some(FOUR),
        '5' => Some(FIVE),
        '6' => Some(SIX),
        '7' => Some(SEVEN),
        '8' => Some(EIGHT),
        '9' => Some(NINE),
        '-' => Some(HYPHEN),
        _ => None,
    }
}

/// Paints labels with the built-in stroke glyphs as anti-aliased lines.
///
/// Characters without a glyph take up space but draw nothing. Extra
/// thickness is added up and to the right so nothing lands below the
/// baseline.
#[derive(Default)]
pub struct StrokeLabelPainter;

impl StrokeLabelPainter {
    pub fn new() -> Self {
        Self
    }
}

impl LabelPainter for StrokeLabelPainter {
    fn paint(&self, image: &mut RgbImage, text: &str, anchor: PixelPoint, style: &LabelStyle) {
        let unit = style.height / GLYPH_HEIGHT as f32;
        let to_px = |origin_x: i32, (gx, gy): (i32, i32)| {
            (
                origin_x + (gx as f32 * unit).round() as i32,
                anchor.y - ((GLYPH_HEIGHT - gy) as f32 * unit).round() as i32,
            )
        };

        for (i, c) in text.chars().enumerate() {
            let Some(strokes) = glyph(c) else {
                continue;
            };
            let origin_x = anchor.x + (i as f32 * GLYPH_ADVANCE as f32 * unit).round() as i32;
            for stroke in strokes {
                for segment in stroke.windows(2) {
                    let start = to_px(origin_x, segment[0]);
                    let end = to_px(origin_x, segment[1]);
                    for (dx, dy) in stroke_offsets(style.thickness) {
                        draw_antialiased_line_segment_mut(
                            image,
                            (start.0 + dx, start.1 + dy),
                            (end.0 + dx, end.1 + dy),
                            style.color,
                            interpolate,
                        );
                    }
                }
            }
        }
    }
}

fn stroke_offsets(thickness: u32) -> impl Iterator<Item = (i32, i32)> {
    std::iter::once((0, 0)).chain(
        (1..thickness.max(1) as i32).flat_map(|t| [(t, 0), (0, -t)]),
    )
}
