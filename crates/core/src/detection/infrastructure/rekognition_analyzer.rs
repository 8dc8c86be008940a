use aws_config::BehaviorVersion;
use aws_sdk_rekognition::config::Region;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::operation::detect_faces::DetectFacesOutput;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, FaceDetail, Image};
use aws_sdk_rekognition::Client;
use tokio::runtime::Runtime;

use crate::detection::domain::detect_faces_payload::{
    AgeRangePayload, BoundingBoxPayload, DetectFacesPayload, FaceDetailPayload, LandmarkPayload,
};
use crate::detection::domain::face_analysis::DetectionResult;
use crate::detection::domain::face_analyzer::{AnalysisError, FaceAnalyzer};
use crate::shared::constants::MAX_IMAGE_BYTES;

/// Calls AWS Rekognition `DetectFaces` with every attribute requested.
///
/// The SDK is async; this adapter owns a current-thread runtime and blocks
/// on each call so the capture loop stays strictly sequential. Credentials
/// come from the standard AWS provider chain; the region is fixed at
/// construction.
pub struct RekognitionAnalyzer {
    client: Client,
    runtime: Runtime,
}

impl RekognitionAnalyzer {
    pub fn new(region: &str) -> Result<Self, AnalysisError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AnalysisError::Runtime)?;
        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load(),
        );
        log::info!("Face analysis via Rekognition in {region}");
        Ok(Self {
            client: Client::new(&config),
            runtime,
        })
    }
}

impl FaceAnalyzer for RekognitionAnalyzer {
    fn analyze(&mut self, encoded_image: &[u8]) -> Result<DetectionResult, AnalysisError> {
        check_request_size(encoded_image.len())?;

        let request = self
            .client
            .detect_faces()
            .image(Image::builder().bytes(Blob::new(encoded_image)).build())
            .attributes(Attribute::All)
            .send();
        let output = self
            .runtime
            .block_on(request)
            .map_err(|e| AnalysisError::Service(DisplayErrorContext(&e).to_string()))?;

        Ok(DetectionResult::try_from(payload_from_output(&output))?)
    }
}

fn check_request_size(size: usize) -> Result<(), AnalysisError> {
    if size > MAX_IMAGE_BYTES {
        return Err(AnalysisError::ImageTooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Lowers SDK output to the wire payload so both analyzers share one
/// validation path.
fn payload_from_output(output: &DetectFacesOutput) -> DetectFacesPayload {
    DetectFacesPayload {
        face_details: output
            .face_details
            .as_ref()
            .map(|details| details.iter().map(payload_from_detail).collect()),
    }
}

fn payload_from_detail(detail: &FaceDetail) -> FaceDetailPayload {
    FaceDetailPayload {
        bounding_box: detail.bounding_box().map(|b| BoundingBoxPayload {
            left: b.left().map(f64::from),
            top: b.top().map(f64::from),
            width: b.width().map(f64::from),
            height: b.height().map(f64::from),
        }),
        landmarks: detail.landmarks.as_ref().map(|landmarks| {
            landmarks
                .iter()
                .map(|lm| LandmarkPayload {
                    kind: lm.r#type().map(|t| t.as_str().to_string()),
                    x: lm.x().map(f64::from),
                    y: lm.y().map(f64::from),
                })
                .collect()
        }),
        age_range: detail.age_range().map(|a| AgeRangePayload {
            low: a.low().map(i64::from),
            high: a.high().map(i64::from),
        }),
        confidence: detail.confidence().map(f64::from),
    }
}
