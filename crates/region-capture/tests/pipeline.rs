//! End-to-end pipeline behaviour against the synthetic display

use capture::{Lease, RasterView, ResourceLedger};
use encoder::{DestinationBuffer, EncoderResult, EncoderSession};
use region_capture::{
    EncoderError, ErrorKind, HostValue, ImageEncoder, PNG_SIGNATURE, PngEncoder, RegionCapturer,
    SyntheticScreen,
};

fn args(values: &[f64]) -> Vec<HostValue> {
    values.iter().copied().map(HostValue::from).collect()
}

fn decode(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .expect("valid PNG")
        .to_rgba8()
}

/// Encoder whose sessions are counted in a ledger
struct CountingEncoder<E = PngEncoder> {
    inner: E,
    sessions: ResourceLedger,
}

impl CountingEncoder {
    fn new() -> Self {
        Self::wrap(PngEncoder::new())
    }
}

impl<E: ImageEncoder> CountingEncoder<E> {
    fn wrap(inner: E) -> Self {
        Self {
            inner,
            sessions: ResourceLedger::new(),
        }
    }
}

struct CountedSession {
    inner: Box<dyn EncoderSession>,
    _lease: Lease,
}

impl EncoderSession for CountedSession {
    fn add_image(&mut self, image: &RasterView<'_>) -> EncoderResult<()> {
        self.inner.add_image(image)
    }

    fn finalize(self: Box<Self>) -> EncoderResult<DestinationBuffer> {
        self.inner.finalize()
    }
}

impl<E: ImageEncoder> ImageEncoder for CountingEncoder<E> {
    fn begin(
        &self,
        destination: DestinationBuffer,
        image_count: usize,
    ) -> EncoderResult<Box<dyn EncoderSession>> {
        let inner = self.inner.begin(destination, image_count)?;
        Ok(Box::new(CountedSession {
            inner,
            _lease: self.sessions.acquire(),
        }))
    }

    fn format_name(&self) -> &'static str {
        "counted-png"
    }
}

/// Encoder whose session can never be constructed
struct UnavailableEncoder;

impl ImageEncoder for UnavailableEncoder {
    fn begin(&self, _: DestinationBuffer, _: usize) -> EncoderResult<Box<dyn EncoderSession>> {
        Err(EncoderError::InitFailed("out of resources".to_string()))
    }

    fn format_name(&self) -> &'static str {
        "unavailable"
    }
}

/// Session step that fails
#[derive(Clone, Copy)]
enum Failing {
    AddImage,
    Finalize,
}

/// Encoder whose sessions open fine but fail at one step
struct BrokenEncoder(Failing);

struct BrokenSession(Failing);

impl EncoderSession for BrokenSession {
    fn add_image(&mut self, _: &RasterView<'_>) -> EncoderResult<()> {
        match self.0 {
            Failing::AddImage => Err(EncoderError::EncodingFailed("image rejected".to_string())),
            Failing::Finalize => Ok(()),
        }
    }

    fn finalize(self: Box<Self>) -> EncoderResult<DestinationBuffer> {
        Err(EncoderError::EncodingFailed("stream aborted".to_string()))
    }
}

impl ImageEncoder for BrokenEncoder {
    fn begin(&self, _: DestinationBuffer, _: usize) -> EncoderResult<Box<dyn EncoderSession>> {
        Ok(Box::new(BrokenSession(self.0)))
    }

    fn format_name(&self) -> &'static str {
        "broken"
    }
}

#[test]
fn solid_colour_region_round_trips() {
    let colour = [200, 40, 90, 255];
    let capturer = RegionCapturer::png(SyntheticScreen::new(1920, 1080).with_fill(colour));

    let png = capturer.capture_region(&args(&[0.0, 0.0, 100.0, 100.0])).unwrap();

    assert_eq!(&png[..8], &PNG_SIGNATURE);
    let decoded = decode(&png);
    assert_eq!(decoded.dimensions(), (100, 100));
    assert!(decoded.pixels().all(|p| p.0 == colour));
    assert_eq!(capturer.source().ledger().outstanding(), 0);
}

#[test]
fn two_arguments_is_argument_error() {
    let capturer = RegionCapturer::png(SyntheticScreen::new(1920, 1080));

    let err = capturer.capture_region(&args(&[0.0, 0.0])).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Argument);
    assert_eq!(err.to_string(), "Expected 4 numeric arguments");
    assert!(capturer.source().requests().is_empty());
    assert_eq!(capturer.source().ledger().acquired(), 0);
}

#[test]
fn any_arity_other_than_four_touches_nothing() {
    let capturer = RegionCapturer::png(SyntheticScreen::new(640, 480));

    for count in [0usize, 1, 2, 3, 5, 8] {
        let err = capturer
            .capture_region(&args(&vec![1.0; count]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    let err = capturer
        .capture_region(&[
            HostValue::from(0),
            HostValue::Null,
            HostValue::from(10),
            HostValue::from(10),
        ])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);

    assert!(capturer.source().requests().is_empty());
    assert_eq!(capturer.source().ledger().acquired(), 0);
}

#[test]
fn off_screen_region_is_capture_error() {
    let capturer = RegionCapturer::png(SyntheticScreen::new(1920, 1080));

    let err = capturer
        .capture_region(&args(&[-5000.0, -5000.0, 10.0, 10.0]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Capture);
    assert_eq!(err.to_string(), "Failed to capture region");
    assert_eq!(capturer.source().requests().len(), 1);
    assert_eq!(capturer.source().ledger().acquired(), 0);
}

#[test]
fn degenerate_region_is_capture_error_without_backend_call() {
    let capturer = RegionCapturer::png(SyntheticScreen::new(1920, 1080));

    for rect in [[10.0, 10.0, 0.0, 0.0], [10.0, 10.0, 50.0, 0.0], [10.0, 10.0, -20.0, 30.0]] {
        let err = capturer.capture_region(&args(&rect)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capture);
    }

    assert!(capturer.source().requests().is_empty());
}

#[test]
fn device_scale_is_preserved() {
    let capturer = RegionCapturer::png(SyntheticScreen::new(1440, 900).with_scale(2.0));

    let png = capturer.capture_region(&args(&[100.0, 50.0, 120.0, 80.0])).unwrap();

    assert_eq!(decode(&png).dimensions(), (240, 160));
}

#[test]
fn fractional_coordinates_are_truncated() {
    let capturer = RegionCapturer::png(SyntheticScreen::new(800, 600));

    let png = capturer.capture_region(&args(&[0.9, 0.9, 10.7, 20.2])).unwrap();

    assert_eq!(decode(&png).dimensions(), (10, 20));
    assert_eq!(
        capturer.source().requests(),
        vec![region_capture::DeviceRect::new(0, 0, 10, 20)]
    );
}

#[test]
fn encoder_init_failure_still_releases_raster() {
    let capturer = RegionCapturer::new(SyntheticScreen::new(800, 600), UnavailableEncoder);

    let err = capturer
        .capture_region(&args(&[0.0, 0.0, 10.0, 10.0]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EncoderInit);
    assert_eq!(err.to_string(), "Failed to create PNG encoder");
    let ledger = capturer.source().ledger();
    assert_eq!(ledger.acquired(), 1);
    assert_eq!(ledger.outstanding(), 0);
}

#[test]
fn finalize_failure_releases_session_and_raster() {
    let capturer = RegionCapturer::new(
        SyntheticScreen::new(800, 600),
        CountingEncoder::wrap(BrokenEncoder(Failing::Finalize)),
    );

    let err = capturer
        .capture_region(&args(&[0.0, 0.0, 10.0, 10.0]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Encode);
    assert_eq!(err.to_string(), "Failed to encode PNG");
    let sessions = &capturer.encoder().sessions;
    assert_eq!(sessions.acquired(), 1);
    assert_eq!(sessions.outstanding(), 0);
    assert_eq!(capturer.source().ledger().acquired(), 1);
    assert_eq!(capturer.source().ledger().outstanding(), 0);
}

#[test]
fn add_image_failure_releases_session_and_raster() {
    let capturer = RegionCapturer::new(
        SyntheticScreen::new(800, 600),
        CountingEncoder::wrap(BrokenEncoder(Failing::AddImage)),
    );

    let err = capturer
        .capture_region(&args(&[0.0, 0.0, 10.0, 10.0]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Encode);
    let sessions = &capturer.encoder().sessions;
    assert_eq!(sessions.acquired(), 1);
    assert_eq!(sessions.outstanding(), 0);
    assert_eq!(capturer.source().ledger().outstanding(), 0);
}

#[test]
fn oversized_synthetic_raster_is_capture_error() {
    let capturer = RegionCapturer::new(
        SyntheticScreen::new(100, 100).with_scale(1e12),
        CountingEncoder::new(),
    );

    let err = capturer
        .capture_region(&args(&[0.0, 0.0, 10.0, 10.0]))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Capture);
    assert_eq!(capturer.source().ledger().acquired(), 0);
    assert_eq!(capturer.encoder().sessions.acquired(), 0);
}

#[test]
fn mixed_calls_leak_nothing() {
    let capturer = RegionCapturer::new(SyntheticScreen::new(1024, 768), CountingEncoder::new());
    let calls: [&[f64]; 6] = [
        &[0.0, 0.0, 64.0, 64.0],
        &[0.0, 0.0],
        &[-5000.0, -5000.0, 10.0, 10.0],
        &[1000.0, 700.0, 100.0, 100.0],
        &[5.0, 5.0, 0.0, 0.0],
        &[0.0, 0.0, 1.0, 1.0],
    ];

    let mut successes = 0;
    for _ in 0..10 {
        for call in calls {
            if let Ok(png) = capturer.capture_region(&args(call)) {
                assert_eq!(&png[..8], &PNG_SIGNATURE);
                successes += 1;
            }
        }
    }

    assert_eq!(successes, 30);
    let rasters = capturer.source().ledger();
    assert_eq!(rasters.acquired(), 30);
    assert_eq!(rasters.released(), rasters.acquired());
    let sessions = &capturer.encoder().sessions;
    assert_eq!(sessions.acquired(), 30);
    assert_eq!(sessions.outstanding(), 0);
}

#[test]
fn shared_ledger_across_sources() {
    let ledger = ResourceLedger::new();
    let first = RegionCapturer::png(SyntheticScreen::new(100, 100).with_ledger(ledger.clone()));
    let second = RegionCapturer::png(
        SyntheticScreen::new(100, 100)
            .with_origin(100, 0)
            .with_ledger(ledger.clone()),
    );

    first.capture_region(&args(&[0.0, 0.0, 50.0, 50.0])).unwrap();
    second.capture_region(&args(&[150.0, 0.0, 50.0, 50.0])).unwrap();
    assert!(second.capture_region(&args(&[0.0, 0.0, 50.0, 50.0])).is_err());

    assert_eq!(ledger.acquired(), 2);
    assert_eq!(ledger.outstanding(), 0);
}
