//! # LensProfile CAM Tools
//!
//! This crate turns a lens description into machining profiles.
//!
//! ## Pipeline
//!
//! - **Sag**: closed-form sag of one segment (Standard, EvenAsphere,
//!   OffsetCircle, Line), anchored at the end of the previous segment
//! - **Stitcher**: splits the radius grid between segments and glues them
//!   into one continuous profile per surface
//! - **Assembler**: orients front, back and edge into JFL polylines
//! - **Generator**: runs the three surfaces of a lens end to end

pub mod assembler;
pub mod generator;
pub mod sag;
pub mod stitcher;

pub use assembler::{assemble, assemble_with_format, exports_rim_first};
pub use generator::{LensProfileGenerator, LensProfiles, SamplingParameters, DEFAULT_STEP};
pub use sag::{conic_sag, evaluate, even_terms, BOUNDARY_TOLERANCE};
pub use stitcher::{sample_radii, stitch, MAX_SAMPLES};
