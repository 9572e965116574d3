//! Lens description model
//!
//! A lens is three surfaces (front, back, edge), each an ordered list of
//! segments. Every segment is one geometric primitive carrying a fixed
//! parameter struct, validated when it is built.

use crate::error::{Error, ProfileError, SpecError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geometric primitive of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceType {
    /// Conic section (sphere, ellipse, parabola, hyperbola)
    Standard,
    /// Conic plus even polynomial terms
    EvenAsphere,
    /// Conic whose vertex sits off the optical axis
    OffsetCircle,
    /// Straight line to a target sag
    Line,
}

impl SurfaceType {
    /// All surface types, in menu order
    pub const ALL: [SurfaceType; 4] = [
        SurfaceType::Standard,
        SurfaceType::EvenAsphere,
        SurfaceType::OffsetCircle,
        SurfaceType::Line,
    ];

    /// Ordered parameter schema of this type
    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            Self::Standard => &["Radius", "Conic", "SemiDiameter"],
            Self::EvenAsphere => &[
                "Radius",
                "Conic",
                "AsphereTerm",
                "AsphereParams",
                "SemiDiameter",
            ],
            Self::OffsetCircle => &["Radius", "Conic", "Center", "SemiDiameter"],
            Self::Line => &["EndZ", "SemiDiameter"],
        }
    }

    /// Short explanation of the primitive
    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "Standard surface: spherical or conic aspheric",
            Self::EvenAsphere => "Even asphere: conic base plus even-order polynomial terms",
            Self::OffsetCircle => {
                "Offset circle: center off the optical axis, often used as a fillet between segments"
            }
            Self::Line => "Straight line",
        }
    }

    /// Short explanation of a schema parameter
    pub fn param_description(param: &str) -> Option<&'static str> {
        let text = match param {
            "SemiDiameter" => "Semi-diameter: distance from the segment's outer edge to the optical axis",
            "Radius" => "Radius of curvature",
            "Conic" => "Conic constant",
            "Center" => "Distance from the offset circle's center to the optical axis",
            "AsphereTerm" => "Number of even asphere terms",
            "AsphereParams" => "Coefficients of the even asphere terms (r^2, r^4, ...)",
            "EndZ" => "Sag at the end point of the line",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "Standard"),
            Self::EvenAsphere => write!(f, "EvenAsphere"),
            Self::OffsetCircle => write!(f, "OffsetCircle"),
            Self::Line => write!(f, "Line"),
        }
    }
}

impl FromStr for SurfaceType {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Standard" => Ok(Self::Standard),
            "EvenAsphere" => Ok(Self::EvenAsphere),
            "OffsetCircle" => Ok(Self::OffsetCircle),
            "Line" => Ok(Self::Line),
            _ => Err(SpecError::UnknownSurfaceType(s.to_string())),
        }
    }
}

/// Parameters of a [`SurfaceType::Standard`] segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StandardParams {
    pub radius: f64,
    pub conic: f64,
    pub semi_diameter: f64,
}

/// Parameters of a [`SurfaceType::EvenAsphere`] segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EvenAsphereParams {
    pub radius: f64,
    pub conic: f64,
    /// Number of polynomial terms; must equal `asphere_params.len()`
    pub asphere_term: usize,
    /// Coefficient `i` multiplies `r^(2 * (i + 1))`
    pub asphere_params: Vec<f64>,
    pub semi_diameter: f64,
}

/// Parameters of a [`SurfaceType::OffsetCircle`] segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OffsetCircleParams {
    pub radius: f64,
    pub conic: f64,
    /// Radial position of the conic vertex
    pub center: f64,
    pub semi_diameter: f64,
}

/// Parameters of a [`SurfaceType::Line`] segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineParams {
    pub end_z: f64,
    pub semi_diameter: f64,
}

/// One segment of a surface
///
/// The segment owns the radius interval `(previous boundary, semi_diameter]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum SegmentSpec {
    Standard(StandardParams),
    EvenAsphere(EvenAsphereParams),
    OffsetCircle(OffsetCircleParams),
    Line(LineParams),
}

fn finite(param: &str, value: f64) -> Result<f64, SpecError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SpecError::invalid(param, format!("{} is not a finite number", value)))
    }
}

fn curvature_radius(value: f64) -> Result<f64, SpecError> {
    finite("Radius", value)?;
    if value == 0.0 {
        return Err(SpecError::invalid("Radius", "must be non-zero"));
    }
    Ok(value)
}

fn semi_diameter(value: f64) -> Result<f64, SpecError> {
    finite("SemiDiameter", value)?;
    if value <= 0.0 {
        return Err(SpecError::invalid("SemiDiameter", "must be > 0"));
    }
    Ok(value)
}

impl SegmentSpec {
    /// Build a validated Standard segment
    pub fn standard(radius: f64, conic: f64, semi_diameter: f64) -> Result<Self, SpecError> {
        let segment = Self::Standard(StandardParams {
            radius,
            conic,
            semi_diameter,
        });
        segment.validate()?;
        Ok(segment)
    }

    /// Build a validated EvenAsphere segment; `AsphereTerm` is the number of coefficients
    pub fn even_asphere(
        radius: f64,
        conic: f64,
        asphere_params: Vec<f64>,
        semi_diameter: f64,
    ) -> Result<Self, SpecError> {
        let segment = Self::EvenAsphere(EvenAsphereParams {
            radius,
            conic,
            asphere_term: asphere_params.len(),
            asphere_params,
            semi_diameter,
        });
        segment.validate()?;
        Ok(segment)
    }

    /// Build a validated OffsetCircle segment
    pub fn offset_circle(
        radius: f64,
        conic: f64,
        center: f64,
        semi_diameter: f64,
    ) -> Result<Self, SpecError> {
        let segment = Self::OffsetCircle(OffsetCircleParams {
            radius,
            conic,
            center,
            semi_diameter,
        });
        segment.validate()?;
        Ok(segment)
    }

    /// Build a validated Line segment
    pub fn line(end_z: f64, semi_diameter: f64) -> Result<Self, SpecError> {
        let segment = Self::Line(LineParams {
            end_z,
            semi_diameter,
        });
        segment.validate()?;
        Ok(segment)
    }

    /// The primitive this segment evaluates
    pub fn surface_type(&self) -> SurfaceType {
        match self {
            Self::Standard(_) => SurfaceType::Standard,
            Self::EvenAsphere(_) => SurfaceType::EvenAsphere,
            Self::OffsetCircle(_) => SurfaceType::OffsetCircle,
            Self::Line(_) => SurfaceType::Line,
        }
    }

    /// Outer boundary of the segment's radius interval
    pub fn semi_diameter(&self) -> f64 {
        match self {
            Self::Standard(p) => p.semi_diameter,
            Self::EvenAsphere(p) => p.semi_diameter,
            Self::OffsetCircle(p) => p.semi_diameter,
            Self::Line(p) => p.semi_diameter,
        }
    }

    /// Check every parameter against the schema rules
    pub fn validate(&self) -> Result<(), SpecError> {
        match self {
            Self::Standard(p) => {
                curvature_radius(p.radius)?;
                finite("Conic", p.conic)?;
                semi_diameter(p.semi_diameter)?;
            }
            Self::EvenAsphere(p) => {
                curvature_radius(p.radius)?;
                finite("Conic", p.conic)?;
                if p.asphere_params.len() != p.asphere_term {
                    return Err(SpecError::AsphereTermMismatch {
                        expected: p.asphere_term,
                        actual: p.asphere_params.len(),
                    });
                }
                for &coefficient in &p.asphere_params {
                    finite("AsphereParams", coefficient)?;
                }
                semi_diameter(p.semi_diameter)?;
            }
            Self::OffsetCircle(p) => {
                curvature_radius(p.radius)?;
                finite("Conic", p.conic)?;
                finite("Center", p.center)?;
                semi_diameter(p.semi_diameter)?;
            }
            Self::Line(p) => {
                finite("EndZ", p.end_z)?;
                semi_diameter(p.semi_diameter)?;
            }
        }
        Ok(())
    }
}

/// Anchor of a surface in the (r, z) plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StartPoint {
    pub r: f64,
    pub z: f64,
}

impl StartPoint {
    pub fn new(r: f64, z: f64) -> Self {
        Self { r, z }
    }
}

/// One of the three lens surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub start_point: StartPoint,
    pub segments: Vec<SegmentSpec>,
}

impl SurfaceSpec {
    /// Build a surface, rejecting invalid or out-of-order segments
    pub fn new(start_point: StartPoint, segments: Vec<SegmentSpec>) -> Result<Self, ProfileError> {
        let surface = Self {
            start_point,
            segments,
        };
        surface.validate()?;
        Ok(surface)
    }

    /// Check segment parameters and strictly increasing SemiDiameter order
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !self.start_point.r.is_finite() || !self.start_point.z.is_finite() {
            return Err(ProfileError::InvalidSampling(format!(
                "start point ({}, {}) is not finite",
                self.start_point.r, self.start_point.z
            )));
        }

        let mut previous: Option<f64> = None;
        for (index, segment) in self.segments.iter().enumerate() {
            segment
                .validate()
                .map_err(|source| ProfileError::Config {
                    segment: index,
                    source,
                })?;

            let semi_diameter = segment.semi_diameter();
            if let Some(previous) = previous {
                if semi_diameter <= previous {
                    return Err(ProfileError::OutOfOrderSegments {
                        segment: index,
                        semi_diameter,
                        previous,
                    });
                }
            }
            previous = Some(semi_diameter);
        }
        Ok(())
    }
}

/// Which surface of the lens a profile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceLabel {
    Front,
    Back,
    Edge,
}

impl SurfaceLabel {
    /// All surfaces, in export order
    pub const ALL: [SurfaceLabel; 3] = [SurfaceLabel::Front, SurfaceLabel::Back, SurfaceLabel::Edge];

    /// Segment label used in JFL files
    pub fn protocol_label(&self) -> &'static str {
        match self {
            Self::Front => "F",
            Self::Back => "B",
            Self::Edge => "E",
        }
    }
}

impl fmt::Display for SurfaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Back => write!(f, "back"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// Complete lens description
///
/// The semi-diameter is always derived from `diameter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensSpec {
    /// Center thickness
    pub thickness: f64,
    /// Machining diameter
    pub diameter: f64,
    pub front: SurfaceSpec,
    pub back: SurfaceSpec,
    pub edge: SurfaceSpec,
}

impl LensSpec {
    /// Default layout for a new lens
    ///
    /// Front starts on axis at z = 0, back on axis at z = thickness and the
    /// edge 1 mm inside the rim at z = 3. Each surface gets one Standard
    /// segment (R = 10, k = 0) reaching the lens semi-diameter.
    pub fn with_defaults(thickness: f64, diameter: f64) -> Result<Self, SpecError> {
        let semi = diameter / 2.0;
        let segment = SegmentSpec::standard(10.0, 0.0, semi)?;
        let surface = |r: f64, z: f64| SurfaceSpec {
            start_point: StartPoint::new(r, z),
            segments: vec![segment.clone()],
        };

        let lens = Self {
            thickness,
            diameter,
            front: surface(0.0, 0.0),
            back: surface(0.0, thickness),
            edge: surface(semi - 1.0, 3.0),
        };
        lens.validate_dimensions()?;
        Ok(lens)
    }

    /// Half the machining diameter
    pub fn semidiameter(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Surface by label
    pub fn surface(&self, label: SurfaceLabel) -> &SurfaceSpec {
        match label {
            SurfaceLabel::Front => &self.front,
            SurfaceLabel::Back => &self.back,
            SurfaceLabel::Edge => &self.edge,
        }
    }

    /// Mutable surface by label
    pub fn surface_mut(&mut self, label: SurfaceLabel) -> &mut SurfaceSpec {
        match label {
            SurfaceLabel::Front => &mut self.front,
            SurfaceLabel::Back => &mut self.back,
            SurfaceLabel::Edge => &mut self.edge,
        }
    }

    fn validate_dimensions(&self) -> Result<(), SpecError> {
        if !self.thickness.is_finite() || self.thickness <= 0.0 {
            return Err(SpecError::invalid("thickness", "must be a finite value > 0"));
        }
        if !self.diameter.is_finite() || self.diameter <= 0.0 {
            return Err(SpecError::invalid("diameter", "must be a finite value > 0"));
        }
        Ok(())
    }

    /// Validate dimensions and all three surfaces
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_dimensions()?;
        for label in SurfaceLabel::ALL {
            self.surface(label)
                .validate()
                .map_err(|source| Error::surface(label, source))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_schema_order() {
        assert_eq!(
            SurfaceType::Standard.param_names(),
            &["Radius", "Conic", "SemiDiameter"]
        );
        assert_eq!(SurfaceType::Line.param_names(), &["EndZ", "SemiDiameter"]);
        for ty in SurfaceType::ALL {
            assert_eq!(ty.param_names().last(), Some(&"SemiDiameter"));
            for param in ty.param_names() {
                assert!(SurfaceType::param_description(param).is_some());
            }
        }
    }

    #[test]
    fn test_surface_type_round_trips_through_str() {
        for ty in SurfaceType::ALL {
            assert_eq!(ty.to_string().parse::<SurfaceType>(), Ok(ty));
        }
        assert_eq!(
            "Toroid".parse::<SurfaceType>(),
            Err(SpecError::UnknownSurfaceType("Toroid".to_string()))
        );
    }

    #[test]
    fn test_even_asphere_term_mismatch() {
        let segment = SegmentSpec::EvenAsphere(EvenAsphereParams {
            radius: 10.0,
            conic: 0.0,
            asphere_term: 3,
            asphere_params: vec![1e-3, 1e-5],
            semi_diameter: 4.0,
        });
        assert_eq!(
            segment.validate(),
            Err(SpecError::AsphereTermMismatch {
                expected: 3,
                actual: 2
            })
        );

        let ok = SegmentSpec::even_asphere(10.0, 0.0, vec![1e-3, 1e-5], 4.0);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_zero_radius_rejected() {
        let err = SegmentSpec::standard(0.0, 0.0, 5.0).unwrap_err();
        assert!(matches!(err, SpecError::InvalidParameter { ref param, .. } if param == "Radius"));
    }

    #[test]
    fn test_out_of_order_segments() {
        let segments = vec![
            SegmentSpec::standard(10.0, 0.0, 3.0).unwrap(),
            SegmentSpec::line(0.5, 2.0).unwrap(),
        ];
        let err = SurfaceSpec::new(StartPoint::default(), segments).unwrap_err();
        assert_eq!(
            err,
            ProfileError::OutOfOrderSegments {
                segment: 1,
                semi_diameter: 2.0,
                previous: 3.0
            }
        );
    }

    #[test]
    fn test_equal_semi_diameters_are_out_of_order() {
        let segments = vec![
            SegmentSpec::line(0.5, 3.0).unwrap(),
            SegmentSpec::line(0.7, 3.0).unwrap(),
        ];
        assert!(matches!(
            SurfaceSpec::new(StartPoint::default(), segments),
            Err(ProfileError::OutOfOrderSegments { segment: 1, .. })
        ));
    }

    #[test]
    fn test_default_lens_layout() {
        let lens = LensSpec::with_defaults(0.2, 10.6).unwrap();
        assert!((lens.semidiameter() - 5.3).abs() < 1e-12);
        assert_eq!(lens.front.start_point, StartPoint::new(0.0, 0.0));
        assert_eq!(lens.back.start_point, StartPoint::new(0.0, 0.2));
        assert!((lens.edge.start_point.r - 4.3).abs() < 1e-12);
        assert_eq!(lens.edge.start_point.z, 3.0);
        assert!(lens.validate().is_ok());
    }

    #[test]
    fn test_lens_validation_names_surface() {
        let mut lens = LensSpec::with_defaults(0.2, 10.6).unwrap();
        lens.edge.segments.push(SegmentSpec::Line(LineParams {
            end_z: 1.0,
            semi_diameter: 1.0,
        }));
        let err = lens.validate().unwrap_err();
        assert_eq!(err.failed_surface(), Some(SurfaceLabel::Edge));
    }

    #[test]
    fn test_segment_serde_uses_schema_names() {
        let segment = SegmentSpec::offset_circle(-3.0, 0.0, 1.5, 4.0).unwrap();
        let value = serde_json::to_value(&segment).unwrap();
        assert_eq!(value["type"], "OffsetCircle");
        assert_eq!(value["params"]["Center"], 1.5);
        assert_eq!(value["params"]["SemiDiameter"], 4.0);
    }
}
