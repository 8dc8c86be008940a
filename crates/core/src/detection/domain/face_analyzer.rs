use std::path::PathBuf;

use thiserror::Error;

use crate::detection::domain::detect_faces_payload::MalformedDetectionResult;
use crate::detection::domain::face_analysis::DetectionResult;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("encoded image is {size} bytes, above the {limit}-byte request limit")]
    ImageTooLarge { size: usize, limit: usize },
    #[error("face analysis request failed: {0}")]
    Service(String),
    #[error("failed to start the request runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error(transparent)]
    Malformed(#[from] MalformedDetectionResult),
    #[error("failed to read recorded response {path}: {source}")]
    Recording {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse recorded response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Domain interface for the remote face analysis call.
///
/// Takes an already-encoded image and returns every face found with all
/// attributes the overlay needs. Implementations block until the answer
/// arrives; `&mut self` lets replaying implementations advance.
pub trait FaceAnalyzer: Send {
    fn analyze(&mut self, encoded_image: &[u8]) -> Result<DetectionResult, AnalysisError>;
}
