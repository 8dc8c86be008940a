use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use thiserror::Error;

use crate::shared::constants::DEFAULT_JPEG_QUALITY;
use crate::shared::frame::Frame;
use crate::video::domain::image_encoder::ImageEncoder;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("JPEG quality must be within 1..=100, got {0}")]
    InvalidQuality(u8),
    #[error("failed to encode frame {index} as JPEG: {source}")]
    Image {
        index: usize,
        #[source]
        source: image::ImageError,
    },
}

/// Baseline JPEG encoding through the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    pub fn new(quality: u8) -> Result<Self, EncodeError> {
        if !(1..=100).contains(&quality) {
            return Err(EncodeError::InvalidQuality(quality));
        }
        Ok(Self { quality })
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageEncoder for JpegEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let mut bytes = Vec::new();
        ImageJpegEncoder::new_with_quality(&mut bytes, self.quality)
            .encode_image(frame.as_image())
            .map_err(|source| EncodeError::Image {
                index: frame.index(),
                source,
            })?;
        Ok(bytes)
    }
}
