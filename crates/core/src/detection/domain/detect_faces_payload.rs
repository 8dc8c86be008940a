//! Wire shape of a `DetectFaces` response and its validation into
//! [`DetectionResult`].
//!
//! Every field is optional on the wire. Validation requires the attributes
//! the overlay draws (box, landmarks, age range) and rejects anything else
//! as [`MalformedDetectionResult`] instead of failing on a bare lookup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::face_analysis::{
    AgeRange, BoundingBox, DetectionResult, FaceDetail, Landmark,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedDetectionResult {
    #[error("malformed detection result: response has no FaceDetails")]
    MissingFaceDetails,
    #[error("malformed detection result: face {face_index} is missing {field}")]
    MissingField { face_index: usize, field: String },
    #[error("malformed detection result: face {face_index} has invalid age range {low}-{high}")]
    InvalidAgeRange {
        face_index: usize,
        low: i64,
        high: i64,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectFacesPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_details: Option<Vec<FaceDetailPayload>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FaceDetailPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBoxPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<LandmarkPayload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AgeRangePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBoxPayload {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LandmarkPayload {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgeRangePayload {
    pub low: Option<i64>,
    pub high: Option<i64>,
}

impl DetectFacesPayload {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl TryFrom<DetectFacesPayload> for DetectionResult {
    type Error = MalformedDetectionResult;

    fn try_from(payload: DetectFacesPayload) -> Result<Self, Self::Error> {
        let details = payload
            .face_details
            .ok_or(MalformedDetectionResult::MissingFaceDetails)?;
        let faces = details
            .into_iter()
            .enumerate()
            .map(|(face_index, detail)| validate_face(face_index, detail))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DetectionResult { faces })
    }
}

fn validate_face(
    face_index: usize,
    detail: FaceDetailPayload,
) -> Result<FaceDetail, MalformedDetectionResult> {
    let missing = |name: &str| MalformedDetectionResult::MissingField {
        face_index,
        field: name.to_string(),
    };

    let raw_box = detail.bounding_box.ok_or_else(|| missing("BoundingBox"))?;
    let bounding_box = BoundingBox {
        left: raw_box.left.ok_or_else(|| missing("BoundingBox.Left"))?,
        top: raw_box.top.ok_or_else(|| missing("BoundingBox.Top"))?,
        width: raw_box.width.ok_or_else(|| missing("BoundingBox.Width"))?,
        height: raw_box.height.ok_or_else(|| missing("BoundingBox.Height"))?,
    };

    let landmarks = detail
        .landmarks
        .ok_or_else(|| missing("Landmarks"))?
        .into_iter()
        .enumerate()
        .map(|(i, lm)| -> Result<Landmark, MalformedDetectionResult> {
            Ok(Landmark {
                x: lm.x.ok_or_else(|| missing(&format!("Landmarks[{i}].X")))?,
                y: lm.y.ok_or_else(|| missing(&format!("Landmarks[{i}].Y")))?,
                kind: lm.kind,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let raw_age = detail.age_range.ok_or_else(|| missing("AgeRange"))?;
    let low = raw_age.low.ok_or_else(|| missing("AgeRange.Low"))?;
    let high = raw_age.high.ok_or_else(|| missing("AgeRange.High"))?;
    let age_range = match (u32::try_from(low), u32::try_from(high)) {
        (Ok(l), Ok(h)) if l <= h => AgeRange { low: l, high: h },
        _ => {
            return Err(MalformedDetectionResult::InvalidAgeRange {
                face_index,
                low,
                high,
            })
        }
    };

    Ok(FaceDetail {
        bounding_box,
        landmarks,
        age_range,
        confidence: detail.confidence,
    })
}
