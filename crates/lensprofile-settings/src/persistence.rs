//! Lens Parameter Persistence
//!
//! Loads and saves the lens parameter file exchanged with lens design
//! editors. The file mirrors the editor's form: a `lens` block plus one
//! block per surface, each listing its segments as `{type, params}` with
//! params keyed by the surface type's schema names.
//!
//! Conversion into [`LensSpec`] checks the schema before deserializing, so a
//! malformed file reports the surface, the segment index and the offending
//! parameter.

use std::path::Path;

use lensprofile_core::{
    LensSpec, SegmentSpec, SpecError, StartPoint, SurfaceLabel, SurfaceSpec, SurfaceType,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::{read_file, write_file};
use crate::error::{ParameterError, SettingsResult};

/// Allowed difference between a stored semidiameter and `diameter / 2`
const SEMIDIAMETER_TOLERANCE: f64 = 1e-9;

/// `lens` block of a parameter file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensParameters {
    #[serde(alias = "lens_thickness")]
    pub thickness: f64,
    #[serde(alias = "lens_diameter")]
    pub diameter: f64,
    /// Derived; checked against `diameter` on load
    #[serde(
        default,
        alias = "lens_semidiameter",
        skip_serializing_if = "Option::is_none"
    )]
    pub semidiameter: Option<f64>,
}

/// One segment entry, params still untyped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentParameters {
    #[serde(rename = "type")]
    pub surface_type: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl SegmentParameters {
    /// Entry for a typed segment
    pub fn from_spec(segment: &SegmentSpec) -> Self {
        let params = match serde_json::to_value(segment) {
            Ok(Value::Object(mut entry)) => match entry.remove("params") {
                Some(Value::Object(params)) => params,
                _ => Map::new(),
            },
            _ => Map::new(),
        };
        Self {
            surface_type: segment.surface_type().to_string(),
            params,
        }
    }

    /// Typed segment, validated against its schema
    pub fn to_spec(&self) -> Result<SegmentSpec, SpecError> {
        let surface_type: SurfaceType = self.surface_type.parse()?;

        if let Some(missing) = surface_type
            .param_names()
            .iter()
            .find(|name| !self.params.contains_key(**name))
        {
            return Err(SpecError::missing(*missing));
        }

        if surface_type == SurfaceType::EvenAsphere {
            let term = self.params.get("AsphereTerm").and_then(Value::as_u64);
            let coeffs = self
                .params
                .get("AsphereParams")
                .and_then(Value::as_array)
                .map(Vec::len);
            if let (Some(term), Some(coeffs)) = (term, coeffs) {
                if term as usize != coeffs {
                    return Err(SpecError::AsphereTermMismatch {
                        expected: term as usize,
                        actual: coeffs,
                    });
                }
            }
        }

        let entry = serde_json::json!({
            "type": surface_type.to_string(),
            "params": self.params,
        });
        let segment: SegmentSpec = serde_json::from_value(entry)
            .map_err(|e| SpecError::invalid("params", e.to_string()))?;
        segment.validate()?;
        Ok(segment)
    }
}

/// One surface block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceParameters {
    pub start_point_x: f64,
    pub start_point_z: f64,
    /// Declared segment count; must match `segments` when present
    #[serde(default)]
    pub num_of_segments: Option<usize>,
    #[serde(default)]
    pub segments: Vec<SegmentParameters>,
}

impl SurfaceParameters {
    pub fn from_spec(surface: &SurfaceSpec) -> Self {
        Self {
            start_point_x: surface.start_point.r,
            start_point_z: surface.start_point.z,
            num_of_segments: Some(surface.segments.len()),
            segments: surface
                .segments
                .iter()
                .map(SegmentParameters::from_spec)
                .collect(),
        }
    }

    pub fn to_spec(&self, label: SurfaceLabel) -> Result<SurfaceSpec, ParameterError> {
        if let Some(declared) = self.num_of_segments {
            if declared != self.segments.len() {
                return Err(ParameterError::SegmentCount {
                    surface: label,
                    declared,
                    actual: self.segments.len(),
                });
            }
        }

        let segments = self
            .segments
            .iter()
            .enumerate()
            .map(|(segment, params)| {
                params.to_spec().map_err(|source| ParameterError::Segment {
                    surface: label,
                    segment,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SurfaceSpec {
            start_point: StartPoint::new(self.start_point_x, self.start_point_z),
            segments,
        })
    }
}

/// Lens parameter file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterFile {
    pub lens: LensParameters,
    #[serde(alias = "前表面")]
    pub front: SurfaceParameters,
    #[serde(alias = "后表面")]
    pub back: SurfaceParameters,
    #[serde(alias = "边缘")]
    pub edge: SurfaceParameters,
}

impl ParameterFile {
    /// Parameter file for `lens`, with the derived semidiameter
    pub fn from_lens(lens: &LensSpec) -> Self {
        Self {
            lens: LensParameters {
                thickness: lens.thickness,
                diameter: lens.diameter,
                semidiameter: Some(lens.semidiameter()),
            },
            front: SurfaceParameters::from_spec(&lens.front),
            back: SurfaceParameters::from_spec(&lens.back),
            edge: SurfaceParameters::from_spec(&lens.edge),
        }
    }

    pub fn surface(&self, label: SurfaceLabel) -> &SurfaceParameters {
        match label {
            SurfaceLabel::Front => &self.front,
            SurfaceLabel::Back => &self.back,
            SurfaceLabel::Edge => &self.edge,
        }
    }

    /// Typed, validated lens description
    pub fn to_lens(&self) -> SettingsResult<LensSpec> {
        let LensParameters {
            thickness,
            diameter,
            semidiameter,
        } = self.lens;

        if let Some(semidiameter) = semidiameter {
            if (semidiameter - diameter / 2.0).abs() > SEMIDIAMETER_TOLERANCE {
                return Err(ParameterError::Semidiameter {
                    semidiameter,
                    diameter,
                }
                .into());
            }
        }

        let lens = LensSpec {
            thickness,
            diameter,
            front: self.front.to_spec(SurfaceLabel::Front)?,
            back: self.back.to_spec(SurfaceLabel::Back)?,
            edge: self.edge.to_spec(SurfaceLabel::Edge)?,
        };
        lens.validate()?;
        Ok(lens)
    }
}

/// Load a lens from a JSON or TOML parameter file
pub fn load_lens(path: &Path) -> SettingsResult<LensSpec> {
    let file: ParameterFile = read_file(path)?;
    let lens = file.to_lens()?;
    info!(
        path = %path.display(),
        thickness = lens.thickness,
        diameter = lens.diameter,
        "Loaded lens parameters"
    );
    Ok(lens)
}

/// Save a lens as a JSON or TOML parameter file
pub fn save_lens(path: &Path, lens: &LensSpec) -> SettingsResult<()> {
    write_file(path, &ParameterFile::from_lens(lens))?;
    info!(path = %path.display(), "Saved lens parameters");
    Ok(())
}
