pub mod constants;
pub mod font_resolver;
pub mod frame;
pub mod source_metadata;
