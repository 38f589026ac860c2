//! Error types for the capture call

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Kind of failure surfaced at the call boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller did not supply exactly four numeric values
    Argument,
    /// The platform returned no image for the rectangle
    Capture,
    /// The encoding session or its destination could not be constructed
    EncoderInit,
    /// The encoding session failed while producing the stream
    Encode,
}

impl ErrorKind {
    /// Fixed message reported for this kind
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::Argument => "Expected 4 numeric arguments",
            ErrorKind::Capture => "Failed to capture region",
            ErrorKind::EncoderInit => "Failed to create PNG encoder",
            ErrorKind::Encode => "Failed to encode PNG",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Terminal error of a capture call
///
/// Carries one [`ErrorKind`]; the lower-level cause, if any, is kept as
/// the error source.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct RegionCaptureError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl RegionCaptureError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source<E>(kind: ErrorKind, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    pub fn argument() -> Self {
        Self::new(ErrorKind::Argument)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl From<ErrorKind> for RegionCaptureError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type alias for capture calls
pub type RegionCaptureResult<T> = Result<T, RegionCaptureError>;
