//! Error types for the settings crate.
//!
//! This module provides structured error types for configuration files,
//! lens parameter files, and their validation.

use std::io;

use lensprofile_core::{SpecError, SurfaceLabel};
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The configuration directory could not be found.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// The file extension maps to no supported format.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// A lens parameter file is inconsistent.
    #[error("Parameter error: {0}")]
    Parameters(#[from] ParameterError),

    /// The lens described by a parameter file is invalid.
    #[error(transparent)]
    Lens(#[from] lensprofile_core::Error),
}

/// Errors found while turning a parameter file into a lens description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A segment's parameters do not fit its surface type.
    #[error("{surface} surface, segment {segment}: {source}")]
    Segment {
        surface: SurfaceLabel,
        segment: usize,
        #[source]
        source: SpecError,
    },

    /// `num_of_segments` disagrees with the listed segments.
    #[error("{surface} surface: num_of_segments is {declared} but {actual} segments are listed")]
    SegmentCount {
        surface: SurfaceLabel,
        declared: usize,
        actual: usize,
    },

    /// A stored semidiameter is not half the diameter.
    #[error("Lens semidiameter {semidiameter} is not half of diameter {diameter}")]
    Semidiameter { semidiameter: f64, diameter: f64 },
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
