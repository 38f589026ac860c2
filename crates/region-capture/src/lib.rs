//! Region Capture - Screen region to PNG bytes
//!
//! Validates the caller's rectangle, captures it from a [`ScreenSource`],
//! and encodes the raster with an [`ImageEncoder`]. Every handle acquired
//! along the way is owned by a scoped value, so it is released exactly once
//! on every path: the encoder session first, then the raster. The
//! destination buffer becomes the returned bytes.

use bytes::Bytes;
use tracing::debug;

pub use capture::{CaptureError, DeviceRect, Raster, ScreenSource, SyntheticScreen, create_source};
pub use capture_protocol::{
    CaptureRequest, ErrorKind, HostValue, PNG_SIGNATURE, RegionCaptureError, RegionCaptureResult,
};
pub use encoder::{EncoderError, ImageEncoder, PngEncoder};

/// Capture-and-encode pipeline over an injected source and encoder
#[derive(Debug)]
pub struct RegionCapturer<S, E> {
    source: S,
    encoder: E,
}

impl<S: ScreenSource> RegionCapturer<S, PngEncoder> {
    /// Pipeline producing PNG with default settings
    pub fn png(source: S) -> Self {
        Self::new(source, PngEncoder::new())
    }
}

impl<S: ScreenSource, E: ImageEncoder> RegionCapturer<S, E> {
    pub fn new(source: S, encoder: E) -> Self {
        Self { source, encoder }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Capture the region described by four raw host arguments
    ///
    /// Arguments are validated before anything else is touched.
    pub fn capture_region(&self, args: &[HostValue]) -> RegionCaptureResult<Bytes> {
        let request = CaptureRequest::from_args(args)?;
        self.capture_request(request)
    }

    /// Capture an already validated request
    pub fn capture_request(&self, request: CaptureRequest) -> RegionCaptureResult<Bytes> {
        let rect = DeviceRect::from(request);
        if rect.is_empty() {
            return Err(capture_failure(CaptureError::EmptyRect(rect)));
        }

        debug!(
            "Capturing {} via {} as {}",
            rect,
            self.source.name(),
            self.encoder.format_name()
        );

        let raster = self.source.capture_raster(rect).map_err(capture_failure)?;
        let encoded = encode_raster(&self.encoder, raster.as_ref())?;
        drop(raster);

        debug!("Region {} encoded to {} bytes", rect, encoded.len());
        Ok(encoded)
    }
}

/// Capture with the platform source and the PNG encoder
pub fn capture_region(args: &[HostValue]) -> RegionCaptureResult<Bytes> {
    let request = CaptureRequest::from_args(args)?;
    let source = create_source().map_err(capture_failure)?;
    RegionCapturer::png(source).capture_request(request)
}

/// Encode one raster into a single-image stream
///
/// The session is gone when this returns, whether or not it succeeded.
fn encode_raster<E: ImageEncoder>(encoder: &E, raster: &dyn Raster) -> RegionCaptureResult<Bytes> {
    let destination = encoder.create_destination().map_err(encoder_failure)?;
    let mut session = encoder.begin(destination, 1).map_err(encoder_failure)?;

    session.add_image(&raster.view()).map_err(encoder_failure)?;
    let destination = session.finalize().map_err(encoder_failure)?;

    Ok(destination.into_bytes())
}

fn capture_failure(err: CaptureError) -> RegionCaptureError {
    RegionCaptureError::with_source(ErrorKind::Capture, err)
}

fn encoder_failure(err: EncoderError) -> RegionCaptureError {
    let kind = if err.is_init() {
        ErrorKind::EncoderInit
    } else {
        ErrorKind::Encode
    };
    RegionCaptureError::with_source(kind, err)
}
