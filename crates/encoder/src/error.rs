//! Encoder error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("Encoder initialization failed: {0}")]
    InitFailed(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(#[from] capture::CaptureError),

    #[error("Stream holds {expected} image(s), cannot add another")]
    ImageCountExceeded { expected: usize },

    #[error("Stream incomplete: {added} of {expected} image(s) added")]
    IncompleteStream { expected: usize, added: usize },
}

impl EncoderError {
    /// Whether the failure happened while constructing the session
    pub fn is_init(&self) -> bool {
        matches!(self, EncoderError::InitFailed(_) | EncoderError::InvalidConfig(_))
    }
}

pub type EncoderResult<T> = Result<T, EncoderError>;
