// Error types module

use thiserror::Error;

use crate::watermark::WatermarkError;

/// Application-level error
///
/// Wraps the placement engine's errors together with the I/O, document and
/// image failures of the surrounding tooling.
#[derive(Error, Debug)]
pub enum GuardmarkError {
    /// Configuration errors (invalid YAML, missing env vars, unknown preset)
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Watermark(#[from] WatermarkError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
