pub mod ffmpeg_source;
#[cfg(feature = "window")]
pub mod highgui_window_sink;
pub mod image_file_sink;
pub mod jpeg_encoder;
