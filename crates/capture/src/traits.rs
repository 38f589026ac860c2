//! Screen source trait abstraction

use crate::{CaptureResult, DeviceRect, RasterView};

/// A captured bitmap
///
/// Owns the underlying native image. Dropping the value releases it.
pub trait Raster {
    /// Borrow the pixel data
    fn view(&self) -> RasterView<'_>;

    fn width(&self) -> u32 {
        self.view().width
    }

    fn height(&self) -> u32 {
        self.view().height
    }
}

/// Source of still images of the on-screen composition
pub trait ScreenSource: Send + Sync {
    /// Capture the composited desktop restricted to `rect`
    ///
    /// Only on-screen windows are included. Fails with
    /// [`CaptureError::NoImage`](crate::CaptureError::NoImage) when the
    /// platform produces no image.
    fn capture_raster(&self, rect: DeviceRect) -> CaptureResult<Box<dyn Raster>>;

    /// Short backend name for diagnostics
    fn name(&self) -> &'static str;
}

impl<S: ScreenSource + ?Sized> ScreenSource for Box<S> {
    fn capture_raster(&self, rect: DeviceRect) -> CaptureResult<Box<dyn Raster>> {
        (**self).capture_raster(rect)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<S: ScreenSource + ?Sized> ScreenSource for std::sync::Arc<S> {
    fn capture_raster(&self, rect: DeviceRect) -> CaptureResult<Box<dyn Raster>> {
        (**self).capture_raster(rect)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
