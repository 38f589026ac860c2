//! Host arguments and the validated capture request

use std::fmt;

use crate::{RegionCaptureError, RegionCaptureResult};

/// A value as handed over by the host runtime
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    Undefined,
}

impl HostValue {
    /// Convert to a 32-bit integer the way host runtimes do
    ///
    /// The fractional part is truncated toward zero and out-of-range values
    /// wrap modulo 2^32. `NaN` and infinities become `0`. Returns `None`
    /// for non-numeric values.
    pub fn to_int32(&self) -> Option<i32> {
        match self {
            HostValue::Number(n) => Some(wrap_to_int32(*n)),
            _ => None,
        }
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Number(value)
    }
}

impl From<i32> for HostValue {
    fn from(value: i32) -> Self {
        HostValue::Number(value as f64)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::String(value.to_string())
    }
}

fn wrap_to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }

    const TWO_32: f64 = 4_294_967_296.0;
    let wrapped = value.trunc().rem_euclid(TWO_32);
    if wrapped >= TWO_32 / 2.0 {
        (wrapped - TWO_32) as i32
    } else {
        wrapped as i32
    }
}

/// Rectangle to capture, in screen coordinates
///
/// Width and height are not checked for positivity here; an empty
/// rectangle is turned away by the capture step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureRequest {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CaptureRequest {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Validate raw host arguments
    ///
    /// Succeeds only for exactly four numeric values.
    pub fn from_args(args: &[HostValue]) -> RegionCaptureResult<Self> {
        let [x, y, width, height] = args else {
            return Err(RegionCaptureError::argument());
        };

        let coord = |value: &HostValue| value.to_int32().ok_or_else(RegionCaptureError::argument);

        Ok(Self {
            x: coord(x)?,
            y: coord(y)?,
            width: coord(width)?,
            height: coord(height)?,
        })
    }

    /// Check if the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl fmt::Display for CaptureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}
