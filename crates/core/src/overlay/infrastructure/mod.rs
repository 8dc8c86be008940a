pub mod font_label_painter;
pub mod stroke_label_painter;
