pub mod detect_faces_payload;
pub mod face_analysis;
pub mod face_analyzer;
