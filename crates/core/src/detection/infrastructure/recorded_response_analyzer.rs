use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::detection::domain::detect_faces_payload::DetectFacesPayload;
use crate::detection::domain::face_analysis::DetectionResult;
use crate::detection::domain::face_analyzer::{AnalysisError, FaceAnalyzer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Recording {
    Many(Vec<DetectFacesPayload>),
    One(DetectFacesPayload),
}

/// Replays saved `DetectFaces` responses instead of calling the service.
///
/// A recording is either one response object or an array of them; arrays
/// are replayed in order, wrapping around after the last entry. Each
/// response is validated when it is replayed, so a malformed entry fails
/// on the frame that uses it.
pub struct RecordedResponseAnalyzer {
    responses: Vec<DetectFacesPayload>,
    next: usize,
}

impl RecordedResponseAnalyzer {
    pub fn new(responses: Vec<DetectFacesPayload>) -> Self {
        Self { responses, next: 0 }
    }

    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let responses = match serde_json::from_str::<Recording>(json)? {
            Recording::Many(responses) => responses,
            Recording::One(response) => vec![response],
        };
        Ok(Self::new(responses))
    }

    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        let json = fs::read_to_string(path).map_err(|source| AnalysisError::Recording {
            path: path.to_path_buf(),
            source,
        })?;
        let analyzer = Self::from_json(&json)?;
        log::info!(
            "Replaying {} recorded response(s) from {}",
            analyzer.responses.len(),
            path.display()
        );
        Ok(analyzer)
    }
}

impl FaceAnalyzer for RecordedResponseAnalyzer {
    fn analyze(&mut self, _encoded_image: &[u8]) -> Result<DetectionResult, AnalysisError> {
        if self.responses.is_empty() {
            return Ok(DetectionResult::empty());
        }
        let payload = self.responses[self.next].clone();
        self.next = (self.next + 1) % self.responses.len();
        Ok(DetectionResult::try_from(payload)?)
    }
}
