//! Screen Capture - Still images of a screen region
//!
//! Provides abstraction over platform-specific capture APIs:
//! - macOS: CoreGraphics window-list images
//! - Any platform: a deterministic synthetic display

mod error;
mod ledger;
mod raster;
mod synthetic;
mod traits;

#[cfg(target_os = "macos")]
mod macos;

pub use error::*;
pub use ledger::*;
pub use raster::*;
pub use synthetic::*;
pub use traits::*;

#[cfg(target_os = "macos")]
pub fn has_screen_recording_permission() -> bool {
    core_graphics::access::ScreenCaptureAccess::default().preflight()
}

#[cfg(target_os = "macos")]
pub fn request_screen_recording_permission() -> bool {
    core_graphics::access::ScreenCaptureAccess::default().request()
}

#[cfg(not(target_os = "macos"))]
pub fn has_screen_recording_permission() -> bool {
    true
}

#[cfg(not(target_os = "macos"))]
pub fn request_screen_recording_permission() -> bool {
    true
}

#[cfg(target_os = "macos")]
pub use macos::MacOSCapture;

/// Create the platform screen source
pub fn create_source() -> CaptureResult<Box<dyn ScreenSource>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(MacOSCapture::new()))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(CaptureError::UnsupportedPlatform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_create_source_unsupported() {
        assert!(matches!(create_source(), Err(CaptureError::UnsupportedPlatform)));
        assert!(has_screen_recording_permission());
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_create_source_macos() {
        assert_eq!(create_source().unwrap().name(), "coregraphics");
    }
}
