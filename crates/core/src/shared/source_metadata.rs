/// Describes an opened frame source.
///
/// Live sources report `total_frames: None`; file sources report the
/// container's frame count when it is known (images count as one frame).
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: Option<usize>,
    pub description: String,
    pub live: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_metadata_has_no_frame_total() {
        let meta = SourceMetadata {
            width: 640,
            height: 480,
            fps: 30.0,
            total_frames: None,
            description: "/dev/video0".to_string(),
            live: true,
        };
        assert!(meta.live);
        assert_eq!(meta.total_frames, None);
    }

    #[test]
    fn test_clone_is_equal() {
        let meta = SourceMetadata {
            width: 800,
            height: 600,
            fps: 0.0,
            total_frames: Some(1),
            description: "face.png".to_string(),
            live: false,
        };
        assert_eq!(meta.clone(), meta);
    }
}
