pub mod logger;
pub mod vision_pipeline;
