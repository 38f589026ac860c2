//! Raster data structures

use std::fmt;

use capture_protocol::CaptureRequest;

use crate::{CaptureError, CaptureResult};

/// Pixel format of a captured raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// BGRA 8-bit per channel (native screen layout)
    Bgra8,
    /// BGRA with colour channels premultiplied by alpha
    Bgra8Premultiplied,
    /// BGR plus an unused fourth byte; always opaque
    Bgrx8,
    /// RGBA 8-bit per channel
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Bgra8
            | PixelFormat::Bgra8Premultiplied
            | PixelFormat::Bgrx8
            | PixelFormat::Rgba8 => 4,
        }
    }
}

/// Rectangle in screen points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DeviceRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if the rect covers no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Check if this rect contains another rect
    pub fn contains(&self, other: &DeviceRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlapping area of two rects, if any
    pub fn intersection(&self, other: &DeviceRect) -> Option<DeviceRect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= x as i64 || bottom <= y as i64 {
            return None;
        }

        Some(DeviceRect {
            x,
            y,
            width: (right - x as i64) as i32,
            height: (bottom - y as i64) as i32,
        })
    }
}

impl From<CaptureRequest> for DeviceRect {
    fn from(request: CaptureRequest) -> Self {
        Self::new(request.x, request.y, request.width, request.height)
    }
}

impl fmt::Display for DeviceRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.width, self.height, self.x, self.y)
    }
}

/// Borrowed pixels of a captured raster
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    /// Raw pixel data
    pub data: &'a [u8],
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
    /// Stride (bytes per row, may include padding)
    pub stride: usize,
    /// Pixel format
    pub format: PixelFormat,
}

impl<'a> RasterView<'a> {
    /// Bytes of pixel data in one row, without padding
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Check that the buffer covers the declared geometry
    pub fn validate(&self) -> CaptureResult<()> {
        let row_bytes = self.row_bytes();
        if self.stride < row_bytes {
            return Err(CaptureError::UnsupportedFormat(format!(
                "stride {} shorter than row of {} bytes",
                self.stride, row_bytes
            )));
        }

        let required = match self.height as usize {
            0 => 0,
            rows => self.stride * (rows - 1) + row_bytes,
        };
        if self.data.len() < required {
            return Err(CaptureError::UnsupportedFormat(format!(
                "buffer of {} bytes too small for {}x{} (stride {})",
                self.data.len(),
                self.width,
                self.height,
                self.stride
            )));
        }

        Ok(())
    }

    /// Pixel data of row `y`, without padding
    ///
    /// Panics if `y` is out of range or the view has not been validated.
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> {
        let view = *self;
        (0..view.height).map(move |y| view.row(y))
    }
}

/// Display information
#[derive(Debug, Clone)]
pub struct DisplayInfo {
    /// Display ID
    pub id: u32,
    /// Width in points
    pub width: u32,
    /// Height in points
    pub height: u32,
    /// Scale factor (for HiDPI)
    pub scale: f64,
    /// X position in virtual screen
    pub x: i32,
    /// Y position in virtual screen
    pub y: i32,
}

impl DisplayInfo {
    /// Display area in screen points
    pub fn bounds(&self) -> DeviceRect {
        DeviceRect::new(
            self.x,
            self.y,
            self.width.min(i32::MAX as u32) as i32,
            self.height.min(i32::MAX as u32) as i32,
        )
    }
}
