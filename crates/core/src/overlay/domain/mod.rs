pub mod label_painter;
pub mod overlay_renderer;
pub mod overlay_style;
pub mod pixel_geometry;
