use image::RgbImage;

/// A single captured frame: RGB8 pixels in row-major order plus its
/// position in the capture sequence.
///
/// Format conversion happens at I/O boundaries only; overlay drawing
/// mutates the pixel buffer in place and never changes its dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    image: RgbImage,
    index: usize,
}

impl Frame {
    /// Returns `None` when `data` is shorter than `width * height * 3`.
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Option<Self> {
        let image = RgbImage::from_raw(width, height, data)?;
        Some(Self { image, index })
    }

    pub fn from_image(image: RgbImage, index: usize) -> Self {
        Self { image, index }
    }

    pub fn data(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    pub fn as_image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 5).unwrap();
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_image_mut_allows_modification() {
        let mut frame = Frame::new(vec![0u8; 6], 2, 1, 0).unwrap();
        frame.as_image_mut().put_pixel(1, 0, image::Rgb([255, 0, 0]));
        assert_eq!(frame.pixel(1, 0), [255, 0, 0]);
        assert_eq!(frame.data()[3], 255);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::new(vec![100u8; 12], 2, 2, 0).unwrap();
        let mut cloned = frame.clone();
        cloned.as_image_mut().put_pixel(0, 0, image::Rgb([0, 0, 0]));
        assert_eq!(frame.pixel(0, 0), [100, 100, 100]);
        assert_eq!(cloned.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_short_data_is_rejected() {
        assert!(Frame::new(vec![0u8; 10], 2, 2, 0).is_none());
    }

    #[test]
    fn test_pixel_is_row_major() {
        // 2x2: set pixel (row=1, col=0) to red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let frame = Frame::new(data, 2, 2, 0).unwrap();
        assert_eq!(frame.pixel(0, 1), [255, 0, 0]);
        assert_eq!(frame.pixel(1, 0), [0, 0, 0]);
    }
}
