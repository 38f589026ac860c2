//! PNG encoder implementation

use std::time::Instant;

use capture::{PixelFormat, RasterView};
use image::ExtendedColorType;
use image::ImageEncoder as _;
use image::codecs::png::PngEncoder as PngWriter;
use tracing::debug;

use crate::{DestinationBuffer, EncoderError, EncoderResult, EncoderSession, ImageEncoder};

/// Encoder producing single-image PNG streams with default compression
#[derive(Debug, Clone, Default)]
pub struct PngEncoder {
    initial_capacity: usize,
}

impl PngEncoder {
    /// Create a new PNG encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve this many bytes up front in each destination
    pub fn with_initial_capacity(mut self, bytes: usize) -> Self {
        self.initial_capacity = bytes;
        self
    }
}

impl ImageEncoder for PngEncoder {
    fn create_destination(&self) -> EncoderResult<DestinationBuffer> {
        DestinationBuffer::try_with_capacity(self.initial_capacity)
    }

    fn begin(
        &self,
        destination: DestinationBuffer,
        image_count: usize,
    ) -> EncoderResult<Box<dyn EncoderSession>> {
        if image_count != 1 {
            return Err(EncoderError::InvalidConfig(format!(
                "PNG streams hold exactly one image, {} requested",
                image_count
            )));
        }

        Ok(Box::new(PngSession {
            destination,
            staged: None,
        }))
    }

    fn format_name(&self) -> &'static str {
        "png"
    }
}

/// Tightly packed RGBA copy of a source image
struct StagedImage {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

impl StagedImage {
    fn from_view(view: &RasterView<'_>) -> EncoderResult<Self> {
        view.validate()?;

        let mut rgba = Vec::new();
        rgba.try_reserve_exact(view.row_bytes() * view.height as usize)
            .map_err(|e| EncoderError::EncodingFailed(format!("staging buffer: {e}")))?;

        for row in view.rows() {
            match view.format {
                PixelFormat::Rgba8 => rgba.extend_from_slice(row),
                PixelFormat::Bgra8 => rgba.extend(
                    row.chunks_exact(4)
                        .flat_map(|chunk| [chunk[2], chunk[1], chunk[0], chunk[3]]),
                ),
                PixelFormat::Bgra8Premultiplied => {
                    rgba.extend(row.chunks_exact(4).flat_map(|chunk| {
                        let alpha = chunk[3];
                        [
                            unpremultiply(chunk[2], alpha),
                            unpremultiply(chunk[1], alpha),
                            unpremultiply(chunk[0], alpha),
                            alpha,
                        ]
                    }))
                }
                PixelFormat::Bgrx8 => rgba.extend(
                    row.chunks_exact(4)
                        .flat_map(|chunk| [chunk[2], chunk[1], chunk[0], u8::MAX]),
                ),
            }
        }

        Ok(Self {
            rgba,
            width: view.width,
            height: view.height,
        })
    }
}

/// PNG stores straight alpha
fn unpremultiply(channel: u8, alpha: u8) -> u8 {
    match alpha {
        0 => 0,
        u8::MAX => channel,
        _ => {
            let straight = (channel as u16 * 255 + alpha as u16 / 2) / alpha as u16;
            straight.min(255) as u8
        }
    }
}

struct PngSession {
    destination: DestinationBuffer,
    staged: Option<StagedImage>,
}

impl EncoderSession for PngSession {
    fn add_image(&mut self, image: &RasterView<'_>) -> EncoderResult<()> {
        if self.staged.is_some() {
            return Err(EncoderError::ImageCountExceeded { expected: 1 });
        }

        self.staged = Some(StagedImage::from_view(image)?);
        Ok(())
    }

    fn finalize(self: Box<Self>) -> EncoderResult<DestinationBuffer> {
        let PngSession {
            mut destination,
            staged,
        } = *self;
        let image = staged.ok_or(EncoderError::IncompleteStream {
            expected: 1,
            added: 0,
        })?;

        let start = Instant::now();
        PngWriter::new(&mut destination)
            .write_image(&image.rgba, image.width, image.height, ExtendedColorType::Rgba8)
            .map_err(|e| EncoderError::EncodingFailed(e.to_string()))?;

        if destination.is_empty() {
            return Err(EncoderError::EncodingFailed(
                "Empty stream from encoder".to_string(),
            ));
        }

        debug!(
            "Encoded {}x{} PNG: {} bytes in {} us",
            image.width,
            image.height,
            destination.len(),
            start.elapsed().as_micros()
        );

        Ok(destination)
    }
}
