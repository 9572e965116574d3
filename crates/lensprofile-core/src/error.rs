//! Error handling for LensProfile
//!
//! Provides error types for every stage of profile generation:
//! - Parameter errors (missing or malformed segment parameters)
//! - Sag evaluation errors (a single segment could not be evaluated)
//! - Profile errors (stitching a surface failed, with the segment index)
//! - Analysis errors (differential geometry on sampled curves)
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::spec::SurfaceLabel;
use thiserror::Error;

/// Segment parameter error type
///
/// Raised when a segment's parameter set does not match the schema of its
/// surface type. This is the configuration error family: it is reported
/// to the caller and generation of the affected surface is aborted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    /// A parameter required by the surface type schema is absent
    #[error("Missing required parameter '{param}'")]
    MissingParameter {
        /// The schema name of the missing parameter.
        param: String,
    },

    /// `AsphereParams` does not hold exactly `AsphereTerm` coefficients
    #[error("AsphereParams has {actual} coefficients but AsphereTerm is {expected}")]
    AsphereTermMismatch {
        /// The declared `AsphereTerm`.
        expected: usize,
        /// The number of coefficients supplied.
        actual: usize,
    },

    /// A parameter is present but its value is unusable
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// The schema name of the parameter.
        param: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The surface type name is not one of the supported primitives
    #[error("Unknown surface type: {0}")]
    UnknownSurfaceType(String),
}

impl SpecError {
    /// Shorthand for [`SpecError::InvalidParameter`]
    pub fn invalid(param: impl Into<String>, reason: impl Into<String>) -> Self {
        SpecError::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SpecError::MissingParameter`]
    pub fn missing(param: impl Into<String>) -> Self {
        SpecError::MissingParameter {
            param: param.into(),
        }
    }
}

/// Sag evaluation error type
///
/// Produced by a single segment evaluation, which knows nothing about the
/// segment's position in its surface. The stitcher attaches that context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SagError {
    /// The segment parameters are inconsistent
    #[error(transparent)]
    Config(#[from] SpecError),

    /// A Line segment whose first sample sits on its own SemiDiameter
    #[error("Zero-width Line segment at r = {radius}")]
    DegenerateSegment {
        /// The radius at which the segment starts and ends.
        radius: f64,
    },
}

/// Surface profile error type
///
/// Represents failures while stitching the segments of one surface into a
/// continuous profile. Segment indices are zero-based positions in the
/// surface's segment list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A segment's parameters are invalid
    #[error("Segment {segment}: {source}")]
    Config {
        /// Index of the offending segment.
        segment: usize,
        /// The parameter problem.
        #[source]
        source: SpecError,
    },

    /// SemiDiameter values are not strictly increasing
    #[error(
        "Segment {segment}: SemiDiameter {semi_diameter} must be greater than the previous boundary {previous}"
    )]
    OutOfOrderSegments {
        /// Index of the offending segment.
        segment: usize,
        /// Its SemiDiameter.
        semi_diameter: f64,
        /// The SemiDiameter of the segment before it.
        previous: f64,
    },

    /// A Line segment covers a single sample that equals its SemiDiameter
    #[error("Segment {segment}: zero-width Line segment at r = {radius}")]
    DegenerateSegment {
        /// Index of the offending segment.
        segment: usize,
        /// The radius at which the segment starts and ends.
        radius: f64,
    },

    /// The radius sampling grid cannot be built
    #[error("Invalid sampling: {0}")]
    InvalidSampling(String),

    /// Trailing samples fall outside every segment's domain
    #[error(
        "Samples from r = {first_uncovered} up to the outer radius {outer_radius} are not covered by any segment"
    )]
    UncoveredDomain {
        /// The first sampled radius that no segment claimed.
        first_uncovered: f64,
        /// The outer radius of the sampling grid.
        outer_radius: f64,
    },
}

impl ProfileError {
    /// Attach a segment index to an evaluation error
    pub fn from_sag(segment: usize, err: SagError) -> Self {
        match err {
            SagError::Config(source) => ProfileError::Config { segment, source },
            SagError::DegenerateSegment { radius } => {
                ProfileError::DegenerateSegment { segment, radius }
            }
        }
    }

    /// Index of the segment that caused the error, if any
    pub fn segment(&self) -> Option<usize> {
        match self {
            ProfileError::Config { segment, .. }
            | ProfileError::OutOfOrderSegments { segment, .. }
            | ProfileError::DegenerateSegment { segment, .. } => Some(*segment),
            ProfileError::InvalidSampling(_) | ProfileError::UncoveredDomain { .. } => None,
        }
    }
}

/// Curve analysis error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Not enough samples for the requested finite-difference scheme
    #[error("At least {required} samples are required, got {actual}")]
    TooFewSamples {
        /// Minimum number of samples.
        required: usize,
        /// Number of samples supplied.
        actual: usize,
    },

    /// Abscissa and ordinate sequences have different lengths
    #[error("Sample length mismatch: {x} x values, {z} z values")]
    LengthMismatch {
        /// Number of x values.
        x: usize,
        /// Number of z values.
        z: usize,
    },

    /// Two neighbouring samples share the same x
    #[error("Repeated abscissa at sample {index}")]
    RepeatedAbscissa {
        /// Index of the second of the two samples.
        index: usize,
    },
}

/// Main error type for LensProfile
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Generation of one surface failed
    #[error("{surface} surface: {source}")]
    Surface {
        /// The surface whose generation was aborted.
        surface: SurfaceLabel,
        /// What went wrong inside that surface.
        #[source]
        source: ProfileError,
    },

    /// Lens-level parameters are invalid
    #[error("Invalid lens: {0}")]
    Lens(#[from] SpecError),

    /// Curve analysis error
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a profile error with the surface it belongs to
    pub fn surface(surface: SurfaceLabel, source: ProfileError) -> Self {
        Error::Surface { surface, source }
    }

    /// The surface that failed, for surface errors
    pub fn failed_surface(&self) -> Option<SurfaceLabel> {
        match self {
            Error::Surface { surface, .. } => Some(*surface),
            _ => None,
        }
    }

    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_error_display() {
        let err = SpecError::missing("Radius");
        assert_eq!(err.to_string(), "Missing required parameter 'Radius'");

        let err = SpecError::AsphereTermMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "AsphereParams has 2 coefficients but AsphereTerm is 3"
        );
    }

    #[test]
    fn test_sag_error_gets_segment_context() {
        let err = ProfileError::from_sag(2, SagError::DegenerateSegment { radius: 1.5 });
        assert_eq!(
            err,
            ProfileError::DegenerateSegment {
                segment: 2,
                radius: 1.5
            }
        );
        assert_eq!(err.segment(), Some(2));

        let err = ProfileError::from_sag(1, SagError::Config(SpecError::missing("EndZ")));
        assert_eq!(
            err.to_string(),
            "Segment 1: Missing required parameter 'EndZ'"
        );
    }

    #[test]
    fn test_surface_error_display() {
        let err = Error::surface(
            SurfaceLabel::Back,
            ProfileError::OutOfOrderSegments {
                segment: 1,
                semi_diameter: 2.0,
                previous: 3.0,
            },
        );
        assert_eq!(
            err.to_string(),
            "back surface: Segment 1: SemiDiameter 2 must be greater than the previous boundary 3"
        );
        assert_eq!(err.failed_surface(), Some(SurfaceLabel::Back));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.is_io_error());

        let err: Error = AnalysisError::TooFewSamples {
            required: 2,
            actual: 1,
        }
        .into();
        assert!(matches!(err, Error::Analysis(_)));
    }
}
