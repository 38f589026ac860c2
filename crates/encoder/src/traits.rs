//! Image encoder trait abstraction

use std::io;

use bytes::Bytes;
use capture::RasterView;

use crate::{EncoderError, EncoderResult};

/// Growable in-memory sink for an encoded stream
#[derive(Debug, Default)]
pub struct DestinationBuffer {
    bytes: Vec<u8>,
}

impl DestinationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a buffer, failing instead of aborting when memory is short
    pub fn try_with_capacity(capacity: usize) -> EncoderResult<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve(capacity)
            .map_err(|e| EncoderError::InitFailed(format!("destination buffer: {e}")))?;
        Ok(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Hand the written bytes over, consuming the buffer
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.bytes)
    }
}

impl io::Write for DestinationBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Factory for encoding sessions
pub trait ImageEncoder: Send + Sync {
    /// Allocate the destination for one stream
    fn create_destination(&self) -> EncoderResult<DestinationBuffer> {
        Ok(DestinationBuffer::new())
    }

    /// Open a session writing `image_count` images into `destination`
    fn begin(
        &self,
        destination: DestinationBuffer,
        image_count: usize,
    ) -> EncoderResult<Box<dyn EncoderSession>>;

    /// Short format name for diagnostics
    fn format_name(&self) -> &'static str;
}

/// One encoded stream in progress
///
/// Dropping an unfinished session discards it together with its
/// destination.
pub trait EncoderSession {
    /// Add a source image to the stream
    fn add_image(&mut self, image: &RasterView<'_>) -> EncoderResult<()>;

    /// Write the stream and return the filled destination
    fn finalize(self: Box<Self>) -> EncoderResult<DestinationBuffer>;
}

impl<E: ImageEncoder + ?Sized> ImageEncoder for Box<E> {
    fn create_destination(&self) -> EncoderResult<DestinationBuffer> {
        (**self).create_destination()
    }

    fn begin(
        &self,
        destination: DestinationBuffer,
        image_count: usize,
    ) -> EncoderResult<Box<dyn EncoderSession>> {
        (**self).begin(destination, image_count)
    }

    fn format_name(&self) -> &'static str {
        (**self).format_name()
    }
}
