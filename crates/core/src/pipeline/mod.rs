pub mod live_overlay_use_case;
pub mod pipeline_logger;
