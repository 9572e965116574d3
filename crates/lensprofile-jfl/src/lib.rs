//! # LensProfile JFL
//!
//! Profile-exchange codec for LensProfile.
//! Builds and parses the line-oriented JFL text read by the lathe
//! controller, reads and writes JFL files, and analyses the curvature of
//! parsed polylines.

pub mod analysis;
pub mod builder;
pub mod file_io;
pub mod parser;

pub use analysis::{
    analyze, axial_radius, curvature_radius, curvature_radius_from_derivatives,
    first_derivative, gradient, second_derivative, CurveAnalysis,
};
pub use builder::{build, format_value, FIELD_WIDTH, FRACTION_DIGITS};
pub use file_io::{
    load_jfl, load_jfl_with_format, save_jfl, FileReadStats, JflFileReader, JFL_EXTENSION,
};
pub use parser::{
    parse, parse_coordinates, parse_with_format, Coordinates, JflParser, ParserState,
};
