use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::display_sink::{DisplaySink, SinkEvent};

#[derive(Clone, Debug, PartialEq)]
enum Target {
    /// Every frame replaces the same file, like a window refreshing in place.
    Overwrite(PathBuf),
    /// One `frame_NNNNNN.<ext>` file per frame.
    Numbered { dir: PathBuf, extension: String },
}

/// Presents frames by writing them as image files.
///
/// The output format follows the file extension. A file sink never asks to
/// quit; the loop ends on the frame limit or the end of the source.
pub struct ImageFileSink {
    target: Target,
    written: usize,
}

impl ImageFileSink {
    pub fn overwrite(path: &Path) -> Self {
        Self {
            target: Target::Overwrite(path.to_path_buf()),
            written: 0,
        }
    }

    pub fn numbered(dir: &Path, extension: &str) -> Self {
        Self {
            target: Target::Numbered {
                dir: dir.to_path_buf(),
                extension: extension.trim_start_matches('.').to_string(),
            },
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn path_for(&self, frame: &Frame) -> PathBuf {
        match &self.target {
            Target::Overwrite(path) => path.clone(),
            Target::Numbered { dir, extension } => {
                dir.join(format!("frame_{:06}.{extension}", frame.index()))
            }
        }
    }
}

impl DisplaySink for ImageFileSink {
    fn show(&mut self, frame: &Frame) -> Result<SinkEvent, Box<dyn std::error::Error>> {
        let path = self.path_for(frame);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        frame.as_image().save(&path)?;
        self.written += 1;
        log::debug!("Wrote frame {} to {}", frame.index(), path.display());
        Ok(SinkEvent::Continue)
    }

    fn close(&mut self) {
        if self.written > 0 {
            log::info!("Wrote {} frame(s)", self.written);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(index: usize, color: [u8; 3]) -> Frame {
        Frame::from_image(image::RgbImage::from_pixel(20, 10, image::Rgb(color)), index)
    }

    #[test]
    fn test_overwrite_replaces_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut sink = ImageFileSink::overwrite(&path);

        assert_eq!(sink.show(&make_frame(0, [10, 20, 30])).unwrap(), SinkEvent::Continue);
        assert_eq!(sink.show(&make_frame(1, [200, 100, 50])).unwrap(), SinkEvent::Continue);

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(img.get_pixel(0, 0).0, [200, 100, 50]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(sink.written(), 2);
    }

    #[test]
    fn test_numbered_writes_one_file_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");
        let mut sink = ImageFileSink::numbered(&out, ".png");

        sink.show(&make_frame(0, [0, 0, 0])).unwrap();
        sink.show(&make_frame(1, [0, 0, 0])).unwrap();
        sink.close();

        assert!(out.join("frame_000000.png").exists());
        assert!(out.join("frame_000001.png").exists());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.jpg");
        let mut sink = ImageFileSink::overwrite(&path);
        sink.show(&make_frame(0, [1, 2, 3])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = ImageFileSink::overwrite(&dir.path().join("out.unknownformat"));
        assert!(sink.show(&make_frame(0, [1, 2, 3])).is_err());
        assert_eq!(sink.written(), 0);
    }
}
