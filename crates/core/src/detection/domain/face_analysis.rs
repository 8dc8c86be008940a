//! Validated face analysis results.
//!
//! All coordinates are fractions of the analysed frame's width and height.
//! They are only meaningful against that same frame; nothing here checks it.

/// One face's rectangular region, normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A named facial keypoint (`eyeLeft`, `nose`, `mouthRight`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct Landmark {
    pub kind: Option<String>,
    pub x: f64,
    pub y: f64,
}

/// Estimated age bracket in years. `low <= high` once validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgeRange {
    pub low: u32,
    pub high: u32,
}

impl AgeRange {
    /// Overlay text for the range, e.g. `"20-30"`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceDetail {
    pub bounding_box: BoundingBox,
    pub landmarks: Vec<Landmark>,
    pub age_range: AgeRange,
    pub confidence: Option<f64>,
}

/// Every face found in one analysed frame, in service order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionResult {
    pub faces: Vec<FaceDetail>,
}

impl DetectionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::typical(20, 30, "20-30")]
    #[case::single_year(7, 7, "7-7")]
    #[case::wide(0, 100, "0-100")]
    fn test_age_label(#[case] low: u32, #[case] high: u32, #[case] expected: &str) {
        assert_eq!(AgeRange { low, high }.label(), expected);
    }

    #[test]
    fn test_empty_result() {
        let result = DetectionResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }
}
