//! Image Encoder - Still-image encoding of captured rasters
//!
//! Provides abstraction over encoding backends:
//! - PNG via the `image` crate

mod error;
mod png_encoder;
mod traits;

pub use error::*;
pub use png_encoder::*;
pub use traits::*;
