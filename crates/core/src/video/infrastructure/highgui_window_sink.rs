use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;

use crate::shared::constants::{QUIT_KEY, WINDOW_NAME};
use crate::shared::frame::Frame;
use crate::video::domain::display_sink::{DisplaySink, SinkEvent};

/// Shows frames in an OpenCV highgui window and polls the keyboard once
/// per frame. The window is created lazily on the first frame.
pub struct HighguiWindowSink {
    name: String,
    opened: bool,
}

impl HighguiWindowSink {
    pub fn new() -> Self {
        Self::named(WINDOW_NAME)
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            opened: false,
        }
    }
}

impl Default for HighguiWindowSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for HighguiWindowSink {
    fn show(&mut self, frame: &Frame) -> Result<SinkEvent, Box<dyn std::error::Error>> {
        if !self.opened {
            highgui::named_window(&self.name, highgui::WINDOW_AUTOSIZE)?;
            self.opened = true;
        }

        let mat = to_bgr_mat(frame)?;
        highgui::imshow(&self.name, &mat)?;

        let key = highgui::wait_key(1)?;
        Ok(key_event(key))
    }

    fn close(&mut self) {
        if self.opened {
            if let Err(e) = highgui::destroy_window(&self.name) {
                log::warn!("Failed to close window {}: {e}", self.name);
            }
            self.opened = false;
        }
    }
}

/// `wait_key` returns -1 when no key was pressed; higher bits may carry
/// modifier flags on some backends.
fn key_event(key: i32) -> SinkEvent {
    if key >= 0 && (key & 0xFF) == QUIT_KEY as i32 {
        SinkEvent::Quit
    } else {
        SinkEvent::Continue
    }
}

fn to_bgr_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    let dst = mat.data_bytes_mut()?;
    for (bgr, rgb) in dst.chunks_exact_mut(3).zip(frame.data().chunks_exact(3)) {
        bgr[0] = rgb[2];
        bgr[1] = rgb[1];
        bgr[2] = rgb[0];
    }
    Ok(mat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::no_key(-1, SinkEvent::Continue)]
    #[case::quit('q' as i32, SinkEvent::Quit)]
    #[case::quit_with_modifier_bits(0x10_0000 | 'q' as i32, SinkEvent::Quit)]
    #[case::other_key('x' as i32, SinkEvent::Continue)]
    #[case::upper_case('Q' as i32, SinkEvent::Continue)]
    fn test_key_event(#[case] key: i32, #[case] expected: SinkEvent) {
        assert_eq!(key_event(key), expected);
    }

    #[test]
    fn test_sink_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<HighguiWindowSink>();
    }

    #[test]
    fn test_bgr_conversion_swaps_channels() {
        let frame = Frame::from_image(image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30])), 0);
        let mat = to_bgr_mat(&frame).unwrap();
        assert_eq!((mat.rows(), mat.cols()), (2, 3));
        assert_eq!(&mat.data_bytes().unwrap()[..3], &[30, 20, 10]);
    }
}
