//! Watermark error types.
//!
//! Configuration and page errors are rejected before any generator is built.
//! Per-instance rendering failures are not errors at this level; see
//! [`crate::render::RenderSkip`].

use thiserror::Error;

/// Errors raised by the placement engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WatermarkError {
    /// The configuration failed validation.
    #[error("Invalid watermark configuration: {0}")]
    InvalidConfig(String),

    /// The page size is not a pair of positive finite numbers in range.
    #[error("Invalid page size {width}x{height}: dimensions must be positive and at most 1000000")]
    InvalidPage { width: f64, height: f64 },

    /// The embedded font could not be loaded.
    #[error("Font error: {0}")]
    Font(String),

    /// A document page could not be prepared for stamping.
    #[error("Document error: {0}")]
    Document(String),
}

impl From<String> for WatermarkError {
    fn from(msg: String) -> Self {
        Self::InvalidConfig(msg)
    }
}
