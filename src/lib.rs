// Guardmark watermark placement library

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod watermark;
