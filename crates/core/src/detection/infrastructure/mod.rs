pub mod recorded_response_analyzer;
pub mod rekognition_analyzer;
