//! Capture error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture returned no image for {0}")]
    NoImage(crate::DeviceRect),

    #[error("Capture rectangle is empty: {0}")]
    EmptyRect(crate::DeviceRect),

    #[error("Unsupported raster layout: {0}")]
    UnsupportedFormat(String),

    #[error("Platform not supported")]
    UnsupportedPlatform,
}

pub type CaptureResult<T> = Result<T, CaptureError>;
