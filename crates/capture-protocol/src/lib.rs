//! Capture Protocol - Call-surface types for region capture
//!
//! This crate contains the host-facing argument model, the validated
//! capture request and the error taxonomy shared by the capture pipeline
//! and its host bindings.

mod error;
mod request;

pub use error::*;
pub use request::*;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
