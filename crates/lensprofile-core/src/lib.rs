//! # LensProfile Core
//!
//! Core types for LensProfile.
//! Provides the lens description model (lens, surfaces, segments), the
//! sampled profile and JFL document types, and the error taxonomy shared
//! by every other crate.

pub mod error;
pub mod profile;
pub mod spec;

pub use error::{AnalysisError, Error, ProfileError, Result, SagError, SpecError};

pub use profile::{
    CoordinateKind, NamedPolyline, Points, Profile, ProfileDocument, ProtocolFormat, XzPoint,
    XzwPoint, DEFAULT_FOOTER, DEFAULT_HEADER, DEFAULT_THREE_COORD_MARKER, MARKER_PREFIX,
};

pub use spec::{
    EvenAsphereParams, LensSpec, LineParams, OffsetCircleParams, SegmentSpec, StandardParams,
    StartPoint, SurfaceLabel, SurfaceSpec, SurfaceType,
};
