//! Lens profile generator
//!
//! Runs the whole pipeline for one lens: stitch front, back and edge on a
//! shared radius grid, then assemble the JFL document.

use lensprofile_core::{
    Error, LensSpec, Profile, ProfileDocument, ProtocolFormat, Result, SurfaceLabel,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assembler::assemble_with_format;
use crate::stitcher::stitch;

/// Default radial sampling step (mm)
pub const DEFAULT_STEP: f64 = 0.0025;

/// Sampling parameters for profile generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParameters {
    /// Radial distance between samples (mm)
    pub step: f64,
    /// Exclusive upper bound of the radius grid; the lens semi-diameter when unset
    pub outer_radius: Option<f64>,
}

impl Default for SamplingParameters {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            outer_radius: None,
        }
    }
}

/// Stitched profiles of the three surfaces
#[derive(Debug, Clone, PartialEq)]
pub struct LensProfiles {
    pub front: Profile,
    pub back: Profile,
    pub edge: Profile,
}

impl LensProfiles {
    pub fn get(&self, label: SurfaceLabel) -> &Profile {
        match label {
            SurfaceLabel::Front => &self.front,
            SurfaceLabel::Back => &self.back,
            SurfaceLabel::Edge => &self.edge,
        }
    }

    /// Assemble into a JFL document
    pub fn to_document(&self, format: ProtocolFormat) -> ProfileDocument {
        assemble_with_format(format, &self.front, &self.back, &self.edge)
    }
}

/// Generator for lens profiles
pub struct LensProfileGenerator {
    lens: LensSpec,
    sampling: SamplingParameters,
}

impl LensProfileGenerator {
    /// Create a new generator for `lens`
    pub fn new(lens: LensSpec, sampling: SamplingParameters) -> Self {
        Self { lens, sampling }
    }

    pub fn lens(&self) -> &LensSpec {
        &self.lens
    }

    pub fn sampling(&self) -> &SamplingParameters {
        &self.sampling
    }

    /// Exclusive upper bound of the radius grid
    pub fn outer_radius(&self) -> f64 {
        self.sampling
            .outer_radius
            .unwrap_or_else(|| self.lens.semidiameter())
    }

    /// Stitch a single surface
    pub fn generate_surface(&self, label: SurfaceLabel) -> Result<Profile> {
        let outer_radius = self.outer_radius();
        let profile = stitch(self.lens.surface(label), outer_radius, self.sampling.step)
            .map_err(|source| Error::surface(label, source))?;

        debug!(
            surface = %label,
            samples = profile.len(),
            outer_radius,
            "Generated surface profile"
        );
        Ok(profile)
    }

    /// Stitch all three surfaces
    pub fn generate_profiles(&self) -> Result<LensProfiles> {
        Ok(LensProfiles {
            front: self.generate_surface(SurfaceLabel::Front)?,
            back: self.generate_surface(SurfaceLabel::Back)?,
            edge: self.generate_surface(SurfaceLabel::Edge)?,
        })
    }

    /// Generate the JFL document with the given boilerplate
    pub fn generate(&self, format: ProtocolFormat) -> Result<ProfileDocument> {
        let profiles = self.generate_profiles()?;
        let document = profiles.to_document(format);

        info!(
            thickness = self.lens.thickness,
            diameter = self.lens.diameter,
            step = self.sampling.step,
            polylines = document.len(),
            "Generated lens profile document"
        );
        Ok(document)
    }
}
