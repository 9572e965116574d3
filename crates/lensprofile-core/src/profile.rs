//! Sampled profiles and JFL document model
//!
//! A [`Profile`] is the stitched (r, z) curve of one surface. A
//! [`ProfileDocument`] is the ordered set of named polylines written to or
//! read from a JFL file, together with the protocol boilerplate.

use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Job header emitted before the first segment of every JFL file
pub const DEFAULT_HEADER: &str = "MCG
GSH003
Jobnumber
8/29/2023 2:34:15 PM
1
C:
L1021
L1021
MY_OK
OK1
Chuck1
1
2
FC
AC
";

/// Footer token terminating a JFL file
pub const DEFAULT_FOOTER: &str = "Q";

/// Marker line announcing three-coordinate data
pub const DEFAULT_THREE_COORD_MARKER: &str = "*S015A000";

/// Leading character of every three-coordinate marker line
pub const MARKER_PREFIX: char = '*';

/// Stitched sag curve of one surface
///
/// `r` is sampled on a uniform grid in increasing order and `z` holds the
/// sag at each radius. Both always have the same length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    r: Vec<f64>,
    z: Vec<f64>,
}

impl Profile {
    /// Pair up radii and sags
    pub fn from_samples(r: Vec<f64>, z: Vec<f64>) -> Result<Self, ProfileError> {
        if r.len() != z.len() {
            return Err(ProfileError::InvalidSampling(format!(
                "{} radii but {} sag values",
                r.len(),
                z.len()
            )));
        }
        Ok(Self { r, z })
    }

    pub fn r(&self) -> &[f64] {
        &self.r
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Last (outermost) sample
    pub fn last(&self) -> Option<XzPoint> {
        Some(XzPoint::new(*self.r.last()?, *self.z.last()?))
    }

    /// Samples as points, apex to rim
    pub fn points(&self) -> impl DoubleEndedIterator<Item = XzPoint> + '_ {
        self.r
            .iter()
            .zip(self.z.iter())
            .map(|(&x, &z)| XzPoint::new(x, z))
    }

    /// Two-coordinate polyline, optionally traversed rim to apex
    pub fn to_polyline(&self, name: impl Into<String>, rim_first: bool) -> NamedPolyline {
        let points: Vec<XzPoint> = if rim_first {
            self.points().rev().collect()
        } else {
            self.points().collect()
        };
        NamedPolyline::xz(name, points)
    }
}

/// Point of a two-coordinate record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct XzPoint {
    pub x: f64,
    pub z: f64,
}

impl XzPoint {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Point of a three-coordinate record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct XzwPoint {
    pub x: f64,
    pub z: f64,
    pub w: f64,
}

impl XzwPoint {
    pub fn new(x: f64, z: f64, w: f64) -> Self {
        Self { x, z, w }
    }
}

/// Record layout of a polyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateKind {
    /// `X <x> Z <z>`
    Xz,
    /// `X <x> Z <z> W <w>`
    Xzw,
}

impl fmt::Display for CoordinateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xz => write!(f, "XZ"),
            Self::Xzw => write!(f, "XZW"),
        }
    }
}

/// Points of a polyline, tagged by record layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Points {
    Xz(Vec<XzPoint>),
    Xzw(Vec<XzwPoint>),
}

impl Points {
    pub fn kind(&self) -> CoordinateKind {
        match self {
            Self::Xz(_) => CoordinateKind::Xz,
            Self::Xzw(_) => CoordinateKind::Xzw,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Xz(points) => points.len(),
            Self::Xzw(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Labelled polyline of a JFL document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPolyline {
    pub name: String,
    pub points: Points,
}

impl NamedPolyline {
    /// Two-coordinate polyline
    pub fn xz(name: impl Into<String>, points: Vec<XzPoint>) -> Self {
        Self {
            name: name.into(),
            points: Points::Xz(points),
        }
    }

    /// Three-coordinate polyline
    pub fn xzw(name: impl Into<String>, points: Vec<XzwPoint>) -> Self {
        Self {
            name: name.into(),
            points: Points::Xzw(points),
        }
    }

    pub fn kind(&self) -> CoordinateKind {
        self.points.kind()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// X coordinates in traversal order
    pub fn xs(&self) -> Vec<f64> {
        match &self.points {
            Points::Xz(points) => points.iter().map(|p| p.x).collect(),
            Points::Xzw(points) => points.iter().map(|p| p.x).collect(),
        }
    }

    /// Z coordinates in traversal order
    pub fn zs(&self) -> Vec<f64> {
        match &self.points {
            Points::Xz(points) => points.iter().map(|p| p.z).collect(),
            Points::Xzw(points) => points.iter().map(|p| p.z).collect(),
        }
    }

    /// Points with `x_min <= x <= x_max`, order preserved
    pub fn window(&self, x_min: f64, x_max: f64) -> Self {
        let inside = |x: f64| x >= x_min && x <= x_max;
        let points = match &self.points {
            Points::Xz(points) => {
                Points::Xz(points.iter().copied().filter(|p| inside(p.x)).collect())
            }
            Points::Xzw(points) => {
                Points::Xzw(points.iter().copied().filter(|p| inside(p.x)).collect())
            }
        };
        Self {
            name: self.name.clone(),
            points,
        }
    }
}

/// Fixed boilerplate of the JFL protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolFormat {
    /// Literal header block, emitted verbatim
    pub header: String,
    /// Footer token closing the file
    pub footer: String,
    /// Marker line preceding three-coordinate segments
    pub three_coord_marker: String,
    /// Emit the segment label after the marker of a three-coordinate segment
    ///
    /// Off by default: the marker alone routes the records into the segment
    /// written before it. A labeled segment reopens its label on parsing, so
    /// only enable this when three-coordinate segments have labels of their own.
    pub label_xzw_segments: bool,
}

impl Default for ProtocolFormat {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
            three_coord_marker: DEFAULT_THREE_COORD_MARKER.to_string(),
            label_xzw_segments: false,
        }
    }
}

/// Ordered collection of named polylines plus protocol boilerplate
///
/// Polylines are keyed by `(name, kind)`; a label can carry both a
/// two-coordinate and a three-coordinate polyline. Insertion order is the
/// order in which segments are written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub format: ProtocolFormat,
    polylines: Vec<NamedPolyline>,
}

impl ProfileDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: ProtocolFormat) -> Self {
        Self {
            format,
            polylines: Vec::new(),
        }
    }

    /// Add a polyline, replacing one with the same name and kind in place
    pub fn insert(&mut self, polyline: NamedPolyline) {
        match self
            .polylines
            .iter_mut()
            .find(|p| p.name == polyline.name && p.kind() == polyline.kind())
        {
            Some(existing) => *existing = polyline,
            None => self.polylines.push(polyline),
        }
    }

    pub fn get(&self, name: &str, kind: CoordinateKind) -> Option<&NamedPolyline> {
        self.polylines
            .iter()
            .find(|p| p.name == name && p.kind() == kind)
    }

    /// Remove and return a polyline
    pub fn remove(&mut self, name: &str, kind: CoordinateKind) -> Option<NamedPolyline> {
        let index = self
            .polylines
            .iter()
            .position(|p| p.name == name && p.kind() == kind)?;
        Some(self.polylines.remove(index))
    }

    /// Polylines in document order
    pub fn iter(&self) -> std::slice::Iter<'_, NamedPolyline> {
        self.polylines.iter()
    }

    /// Distinct labels in order of first appearance
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for polyline in &self.polylines {
            if !labels.contains(&polyline.name.as_str()) {
                labels.push(&polyline.name);
            }
        }
        labels
    }

    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Part of a polyline whose x lies in `[x_min, x_max]`
    pub fn window(
        &self,
        name: &str,
        kind: CoordinateKind,
        x_min: f64,
        x_max: f64,
    ) -> Option<NamedPolyline> {
        self.get(name, kind).map(|p| p.window(x_min, x_max))
    }
}

impl<'a> IntoIterator for &'a ProfileDocument {
    type Item = &'a NamedPolyline;
    type IntoIter = std::slice::Iter<'a, NamedPolyline>;

    fn into_iter(self) -> Self::IntoIter {
        self.polylines.iter()
    }
}

impl FromIterator<NamedPolyline> for ProfileDocument {
    fn from_iter<I: IntoIterator<Item = NamedPolyline>>(iter: I) -> Self {
        let mut document = Self::new();
        for polyline in iter {
            document.insert(polyline);
        }
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_rejects_length_mismatch() {
        assert!(Profile::from_samples(vec![0.0, 1.0], vec![0.0]).is_err());
    }

    #[test]
    fn test_profile_to_polyline_orientation() {
        let profile = Profile::from_samples(vec![0.0, 1.0, 2.0], vec![0.0, 0.1, 0.4]).unwrap();

        let forward = profile.to_polyline("E", false);
        assert_eq!(forward.xs(), vec![0.0, 1.0, 2.0]);

        let reversed = profile.to_polyline("F", true);
        assert_eq!(reversed.xs(), vec![2.0, 1.0, 0.0]);
        assert_eq!(reversed.zs(), vec![0.4, 0.1, 0.0]);
    }

    #[test]
    fn test_document_keeps_insertion_order_and_replaces_in_place() {
        let mut doc = ProfileDocument::new();
        doc.insert(NamedPolyline::xz("F", vec![XzPoint::new(1.0, 0.0)]));
        doc.insert(NamedPolyline::xz("B", vec![XzPoint::new(2.0, 0.0)]));
        doc.insert(NamedPolyline::xzw("F", vec![XzwPoint::new(1.0, 0.0, 0.5)]));
        doc.insert(NamedPolyline::xz("F", vec![XzPoint::new(3.0, 0.0)]));

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.labels(), vec!["F", "B"]);
        let first = doc.iter().next().unwrap();
        assert_eq!(first.xs(), vec![3.0]);
        assert!(doc.get("F", CoordinateKind::Xzw).is_some());
    }

    #[test]
    fn test_window_filters_by_x() {
        let polyline = NamedPolyline::xz(
            "F",
            (0..10).map(|i| XzPoint::new(i as f64, 0.0)).collect(),
        );
        let doc: ProfileDocument = std::iter::once(polyline).collect();

        let zoomed = doc.window("F", CoordinateKind::Xz, 2.0, 4.5).unwrap();
        assert_eq!(zoomed.xs(), vec![2.0, 3.0, 4.0]);
        assert!(doc.window("B", CoordinateKind::Xz, 0.0, 1.0).is_none());
    }
}
