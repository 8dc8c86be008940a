use crate::shared::frame::Frame;

/// Compresses a frame into bytes for the face analysis request.
pub trait ImageEncoder: Send {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}
