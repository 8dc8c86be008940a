use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::RgbImage;
use imageproc::drawing::draw_text_mut;
use thiserror::Error;

use crate::overlay::domain::label_painter::LabelPainter;
use crate::overlay::domain::overlay_style::LabelStyle;
use crate::overlay::domain::pixel_geometry::PixelPoint;

/// Cap height of common sans-serif faces as a fraction of the em size.
const CAP_HEIGHT_RATIO: f32 = 0.7;

#[derive(Error, Debug)]
pub enum FontLoadError {
    #[error("failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a usable TrueType/OpenType font")]
    Invalid(#[from] ab_glyph::InvalidFont),
}

/// Paints labels with a TrueType/OpenType font via `ab_glyph`.
pub struct FontLabelPainter {
    font: FontVec,
}

impl FontLabelPainter {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontLoadError> {
        Ok(Self {
            font: FontVec::try_from_vec(bytes)?,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, FontLoadError> {
        let bytes = fs::read(path).map_err(|source| FontLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let painter = Self::from_bytes(bytes)?;
        log::debug!("Loaded label font {}", path.display());
        Ok(painter)
    }
}

impl LabelPainter for FontLabelPainter {
    fn paint(&self, image: &mut RgbImage, text: &str, anchor: PixelPoint, style: &LabelStyle) {
        let scale = PxScale::from(style.height / CAP_HEIGHT_RATIO);
        // Text is positioned by the top of its line box; shift up by the
        // ascent so the baseline lands on the anchor.
        let ascent = self.font.as_scaled(scale).ascent().round() as i32;
        let top = anchor.y - ascent;
        for dx in 0..style.thickness.max(1) as i32 {
            draw_text_mut(image, style.color, anchor.x + dx, top, scale, &self.font, text);
        }
    }
}
