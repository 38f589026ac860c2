//! Deterministic in-memory screen
//!
//! Stands in for the platform compositor: a single display of fixed size
//! and scale, filled with one colour. Every raster it hands out is counted
//! in a [`ResourceLedger`] so callers can check that nothing leaks.

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    CaptureError, CaptureResult, DeviceRect, DisplayInfo, Lease, PixelFormat, Raster, RasterView,
    ResourceLedger, ScreenSource,
};

/// Rows are padded to this many bytes, like native bitmaps
const ROW_ALIGNMENT: usize = 64;

/// Synthetic display source
#[derive(Debug)]
pub struct SyntheticScreen {
    display: DisplayInfo,
    /// Fill colour as RGBA
    fill: [u8; 4],
    ledger: ResourceLedger,
    requests: Mutex<Vec<DeviceRect>>,
}

impl SyntheticScreen {
    /// Create a display of `width` x `height` points at the origin, scale 1
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display: DisplayInfo {
                id: 0,
                width,
                height,
                scale: 1.0,
                x: 0,
                y: 0,
            },
            fill: [0, 0, 0, 255],
            ledger: ResourceLedger::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.display.scale = scale;
        self
    }

    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.display.x = x;
        self.display.y = y;
        self
    }

    /// Set the fill colour (RGBA)
    pub fn with_fill(mut self, rgba: [u8; 4]) -> Self {
        self.fill = rgba;
        self
    }

    pub fn with_ledger(mut self, ledger: ResourceLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn display(&self) -> &DisplayInfo {
        &self.display
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Rectangles requested so far, in order
    pub fn requests(&self) -> Vec<DeviceRect> {
        self.requests.lock().clone()
    }

    fn device_pixels(&self, points: i32) -> CaptureResult<u32> {
        let pixels = (points as f64 * self.display.scale).round();
        if !(0.0..=u32::MAX as f64).contains(&pixels) {
            return Err(CaptureError::UnsupportedFormat(format!(
                "{} points at scale {} is not a valid pixel size",
                points, self.display.scale
            )));
        }
        Ok(pixels as u32)
    }
}

impl ScreenSource for SyntheticScreen {
    fn capture_raster(&self, rect: DeviceRect) -> CaptureResult<Box<dyn Raster>> {
        self.requests.lock().push(rect);

        // Off-screen parts of the rect are not composited.
        let visible = self
            .display
            .bounds()
            .intersection(&rect)
            .ok_or(CaptureError::NoImage(rect))?;

        let width = self.device_pixels(visible.width)?;
        let height = self.device_pixels(visible.height)?;
        if width == 0 || height == 0 {
            return Err(CaptureError::NoImage(rect));
        }

        let too_large = || {
            CaptureError::UnsupportedFormat(format!("{}x{} px raster is too large", width, height))
        };
        let stride = (width as usize)
            .checked_mul(4)
            .and_then(|row| row.checked_next_multiple_of(ROW_ALIGNMENT))
            .ok_or_else(too_large)?;
        let len = stride.checked_mul(height as usize).ok_or_else(too_large)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| too_large())?;
        data.resize(len, 0u8);

        let [r, g, b, a] = self.fill;
        for row in data.chunks_exact_mut(stride) {
            for pixel in row[..width as usize * 4].chunks_exact_mut(4) {
                pixel.copy_from_slice(&[b, g, r, a]);
            }
        }

        debug!(
            "Synthetic capture of {} -> {}x{} px (scale {})",
            rect, width, height, self.display.scale
        );

        Ok(Box::new(SyntheticRaster {
            data,
            width,
            height,
            stride,
            _lease: self.ledger.acquire(),
        }))
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Raster produced by [`SyntheticScreen`], BGRA with padded rows
struct SyntheticRaster {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
    _lease: Lease,
}

impl Raster for SyntheticRaster {
    fn view(&self) -> RasterView<'_> {
        RasterView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: PixelFormat::Bgra8,
        }
    }
}
