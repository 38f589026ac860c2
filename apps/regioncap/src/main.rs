//! regioncap
//!
//! Command-line host for the region capture pipeline: turns process
//! arguments into host values, captures, and writes the PNG out.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use region_capture::{
    CaptureRequest, HostValue, RegionCapturer, ScreenSource, SyntheticScreen, create_source,
};

#[derive(Parser, Debug)]
#[command(name = "regioncap")]
#[command(about = "Capture a screen region to PNG")]
struct Args {
    /// Region as X Y WIDTH HEIGHT, in screen points
    #[arg(value_name = "COORD", num_args = 0.., allow_negative_numbers = true)]
    coords: Vec<String>,

    /// Write the PNG here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Capture from a synthetic display instead of the screen, e.g. 1440x900@2
    #[arg(long, value_name = "WxH[@SCALE]", value_parser = parse_display)]
    synthetic: Option<SyntheticDisplay>,

    /// Fill colour of the synthetic display as RRGGBB
    #[arg(long, value_name = "RRGGBB", default_value = "000000", value_parser = parse_fill)]
    fill: [u8; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SyntheticDisplay {
    width: u32,
    height: u32,
    scale: f64,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout may carry the image
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("regioncap=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let values: Vec<HostValue> = args.coords.iter().map(|raw| host_value(raw)).collect();
    let request = CaptureRequest::from_args(&values)?;

    let source: Box<dyn ScreenSource> = match args.synthetic {
        Some(display) => Box::new(
            SyntheticScreen::new(display.width, display.height)
                .with_scale(display.scale)
                .with_fill(args.fill),
        ),
        None => {
            if !capture::has_screen_recording_permission() {
                warn!("Screen recording permission not granted, requesting it");
                if !capture::request_screen_recording_permission() {
                    warn!("Permission still missing; capture will only see the desktop");
                }
            }
            create_source().context("No screen capture backend for this platform")?
        }
    };

    info!("Capturing {} via {}", request, source.name());
    let png = RegionCapturer::png(source).capture_request(request)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &png)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", png.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&png)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Numeric text becomes a number, anything else stays a string
fn host_value(raw: &str) -> HostValue {
    match raw.trim().parse::<f64>() {
        Ok(number) => HostValue::Number(number),
        Err(_) => HostValue::String(raw.to_string()),
    }
}

/// Largest device scale accepted for the synthetic display
const MAX_SCALE: f64 = 16.0;

fn parse_display(raw: &str) -> Result<SyntheticDisplay, String> {
    let (size, scale) = match raw.split_once('@') {
        Some((size, scale)) => (size, scale),
        None => (raw, "1"),
    };
    let (width, height) = size
        .split_once('x')
        .ok_or_else(|| format!("expected WxH, got '{}'", size))?;

    let width: u32 = width.parse().map_err(|_| format!("invalid width '{}'", width))?;
    let height: u32 = height
        .parse()
        .map_err(|_| format!("invalid height '{}'", height))?;
    let scale: f64 = scale.parse().map_err(|_| format!("invalid scale '{}'", scale))?;

    if width == 0 || height == 0 {
        return Err("display size must be non-zero".to_string());
    }
    if !(scale > 0.0 && scale <= MAX_SCALE) {
        return Err(format!("scale must be in (0, {}], got {}", MAX_SCALE, scale));
    }

    Ok(SyntheticDisplay {
        width,
        height,
        scale,
    })
}

fn parse_fill(raw: &str) -> Result<[u8; 4], String> {
    let hex = raw.trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected RRGGBB, got '{}'", raw));
    }

    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid colour '{}'", raw))?;
    let [_, r, g, b] = rgb.to_be_bytes();
    Ok([r, g, b, 255])
}
