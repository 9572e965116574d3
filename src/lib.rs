//! # LensProfile
//!
//! Machining profile generator for rotationally symmetric lenses.
//!
//! A lens is described by its front, back and edge surfaces, each a chain
//! of analytic segments (conic, even asphere, offset circle, straight line).
//! LensProfile samples every surface on a radial grid, stitches the
//! segments into one continuous curve and writes the result as a JFL file
//! for the lathe controller. JFL files can be read back for inspection and
//! curvature analysis.
//!
//! ## Architecture
//!
//! 1. **lensprofile-core** - Lens model, profile and document types, errors
//! 2. **lensprofile-camtools** - Sag evaluation, stitching, assembly
//! 3. **lensprofile-jfl** - JFL builder/parser, file I/O, curve analysis
//! 4. **lensprofile-settings** - Configuration and lens parameter files
//! 5. **lensprofile** - This crate: re-exports, logging and the CLI

use std::path::Path;

pub use lensprofile_core::{
    AnalysisError, CoordinateKind, Error, LensSpec, NamedPolyline, Points, Profile,
    ProfileDocument, ProfileError, ProtocolFormat, Result, SagError, SegmentSpec, SpecError,
    StartPoint, SurfaceLabel, SurfaceSpec, SurfaceType, XzPoint, XzwPoint,
};

pub use lensprofile_camtools::{
    assemble, stitch, LensProfileGenerator, LensProfiles, SamplingParameters, DEFAULT_STEP,
};

pub use lensprofile_jfl::{analyze, build, load_jfl, parse, save_jfl, CurveAnalysis};

pub use lensprofile_settings::{
    load_lens, save_lens, Config, ParameterFile, SettingsError, SettingsResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, keeping stdout for command results
/// - RUST_LOG environment variable support
/// - INFO level when RUST_LOG is unset
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with_level(tracing::Level::INFO)
}

/// Initialize logging, falling back to `level` when RUST_LOG is unset
pub fn init_logging_with_level(level: tracing::Level) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Generate the JFL document for `lens` and write it to `output`
pub fn generate_jfl(lens: LensSpec, config: &Config, output: &Path) -> Result<ProfileDocument> {
    let generator = LensProfileGenerator::new(lens, config.sampling);
    let document = generator.generate(config.format.clone())?;
    save_jfl(output, &document)?;
    Ok(document)
}

/// Point count and coordinate ranges of one polyline
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineSummary {
    pub name: String,
    pub kind: CoordinateKind,
    pub points: usize,
    pub x_range: (f64, f64),
    pub z_range: (f64, f64),
}

impl PolylineSummary {
    pub fn of(polyline: &NamedPolyline) -> Self {
        Self {
            name: polyline.name.clone(),
            kind: polyline.kind(),
            points: polyline.len(),
            x_range: range(&polyline.xs()),
            z_range: range(&polyline.zs()),
        }
    }
}

fn range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Summaries of every polyline, in document order
pub fn summarize(document: &ProfileDocument) -> Vec<PolylineSummary> {
    document.iter().map(PolylineSummary::of).collect()
}
