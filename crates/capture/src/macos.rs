//! macOS screen capture using CoreGraphics window-list images

use core_foundation::data::CFData;
use core_graphics::display::CGDisplay;
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use core_graphics::image::CGImage;
use core_graphics::window::{
    kCGNullWindowID, kCGWindowImageDefault, kCGWindowListOptionOnScreenOnly,
};
use foreign_types::ForeignType;
use tracing::debug;

use crate::{CaptureError, CaptureResult, DeviceRect, PixelFormat, Raster, RasterView, ScreenSource};

// CGBitmapInfo layout
const ALPHA_INFO_MASK: u32 = 0x1f;
const BYTE_ORDER_MASK: u32 = 0x7000;
const BYTE_ORDER_32_LITTLE: u32 = 2 << 12;
const ALPHA_PREMULTIPLIED_FIRST: u32 = 2;
const ALPHA_FIRST: u32 = 4;
const ALPHA_NONE_SKIP_FIRST: u32 = 6;

/// Captures the composited desktop of all on-screen windows
#[derive(Debug, Default)]
pub struct MacOSCapture;

impl MacOSCapture {
    /// Create a new macOS capture source
    pub fn new() -> Self {
        Self
    }
}

impl ScreenSource for MacOSCapture {
    fn capture_raster(&self, rect: DeviceRect) -> CaptureResult<Box<dyn Raster>> {
        let bounds = CGRect::new(
            &CGPoint::new(rect.x as f64, rect.y as f64),
            &CGSize::new(rect.width as f64, rect.height as f64),
        );

        // No specific window: the null window id with the on-screen list
        // option yields the whole composition inside `bounds`.
        let image = CGDisplay::screenshot(
            bounds,
            kCGWindowListOptionOnScreenOnly,
            kCGNullWindowID,
            kCGWindowImageDefault,
        )
        .ok_or(CaptureError::NoImage(rect))?;

        let raster = CoreGraphicsRaster::new(image)?;
        debug!("Captured {} -> {}x{} px", rect, raster.width, raster.height);

        Ok(Box::new(raster))
    }

    fn name(&self) -> &'static str {
        "coregraphics"
    }
}

/// A `CGImage` and a copy of its backing pixels
///
/// Both are CoreFoundation objects released when the raster is dropped.
struct CoreGraphicsRaster {
    _image: CGImage,
    data: CFData,
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

/// Memory layout of a 32-bit image from its `CGBitmapInfo`
///
/// Only alpha-first little-endian words are accepted: those are B, G, R, A
/// in memory, with any of the three alpha-first meanings.
fn pixel_format(bitmap_info: u32) -> Option<PixelFormat> {
    if bitmap_info & BYTE_ORDER_MASK != BYTE_ORDER_32_LITTLE {
        return None;
    }

    match bitmap_info & ALPHA_INFO_MASK {
        ALPHA_PREMULTIPLIED_FIRST => Some(PixelFormat::Bgra8Premultiplied),
        ALPHA_FIRST => Some(PixelFormat::Bgra8),
        ALPHA_NONE_SKIP_FIRST => Some(PixelFormat::Bgrx8),
        _ => None,
    }
}

impl CoreGraphicsRaster {
    fn new(image: CGImage) -> CaptureResult<Self> {
        if image.bits_per_pixel() != 32 || image.bits_per_component() != 8 {
            return Err(CaptureError::UnsupportedFormat(format!(
                "{} bits per pixel, {} bits per component",
                image.bits_per_pixel(),
                image.bits_per_component()
            )));
        }

        let bitmap_info = unsafe { CGImageGetBitmapInfo(image.as_ptr()) };
        let format = pixel_format(bitmap_info).ok_or_else(|| {
            CaptureError::UnsupportedFormat(format!("bitmap info {:#x}", bitmap_info))
        })?;

        let width = u32::try_from(image.width())
            .map_err(|_| CaptureError::UnsupportedFormat("width exceeds u32".to_string()))?;
        let height = u32::try_from(image.height())
            .map_err(|_| CaptureError::UnsupportedFormat("height exceeds u32".to_string()))?;
        let stride = image.bytes_per_row();
        let data = image.data();

        let raster = Self {
            _image: image,
            data,
            width,
            height,
            stride,
            format,
        };
        raster.view().validate()?;

        Ok(raster)
    }
}

impl Raster for CoreGraphicsRaster {
    fn view(&self) -> RasterView<'_> {
        RasterView {
            data: self.data.bytes(),
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
        }
    }
}

#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C" {
    fn CGImageGetBitmapInfo(image: core_graphics::sys::CGImageRef) -> u32;
}
