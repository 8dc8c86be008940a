use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;

/// Supplies frames from a camera or a file, one per request.
///
/// `next_frame` returns `Ok(None)` only when a finite source is exhausted;
/// live sources report a missing frame as an error.
pub trait FrameSource: Send {
    /// Acquires the underlying device or file and returns its metadata.
    fn open(&mut self) -> Result<SourceMetadata, Box<dyn std::error::Error>>;

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device or file. Safe to call more than once.
    fn close(&mut self);
}
