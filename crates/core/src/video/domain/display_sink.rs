use crate::shared::frame::Frame;

/// What the viewer asked for after a frame was shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Continue,
    Quit,
}

/// Presents annotated frames and reports the viewer's response.
pub trait DisplaySink: Send {
    fn show(&mut self, frame: &Frame) -> Result<SinkEvent, Box<dyn std::error::Error>>;

    /// Tears down any window or file handle. Safe to call more than once.
    fn close(&mut self);
}
