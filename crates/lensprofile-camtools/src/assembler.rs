//! Profile assembly
//!
//! Turns the three stitched surfaces into the directed polylines of a JFL
//! document. Front and back are stitched apex to rim but cut rim to apex,
//! so they are reversed. The edge joins the reversed end of one surface to
//! the start of the other and keeps its stitched order.

use lensprofile_core::{Profile, ProfileDocument, ProtocolFormat, SurfaceLabel};

/// Whether a surface is exported rim first
pub fn exports_rim_first(label: SurfaceLabel) -> bool {
    match label {
        SurfaceLabel::Front | SurfaceLabel::Back => true,
        SurfaceLabel::Edge => false,
    }
}

/// Assemble with the default protocol boilerplate
pub fn assemble(front: &Profile, back: &Profile, edge: &Profile) -> ProfileDocument {
    assemble_with_format(ProtocolFormat::default(), front, back, edge)
}

/// Assemble into a document using `format`
pub fn assemble_with_format(
    format: ProtocolFormat,
    front: &Profile,
    back: &Profile,
    edge: &Profile,
) -> ProfileDocument {
    let mut document = ProfileDocument::with_format(format);
    for (label, profile) in [
        (SurfaceLabel::Front, front),
        (SurfaceLabel::Back, back),
        (SurfaceLabel::Edge, edge),
    ] {
        document.insert(profile.to_polyline(label.protocol_label(), exports_rim_first(label)));
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use lensprofile_core::CoordinateKind;

    fn ramp(start: f64, n: usize) -> Profile {
        let r: Vec<f64> = (0..n).map(|i| start + i as f64).collect();
        let z = r.iter().map(|r| r * 0.1).collect();
        Profile::from_samples(r, z).unwrap()
    }

    #[test]
    fn test_labels_and_order() {
        let doc = assemble(&ramp(0.0, 3), &ramp(0.0, 3), &ramp(1.0, 2));
        assert_eq!(doc.labels(), vec!["F", "B", "E"]);
        assert!(doc.iter().all(|p| p.kind() == CoordinateKind::Xz));
    }

    #[test]
    fn test_front_and_back_reversed_edge_kept() {
        let doc = assemble(&ramp(0.0, 3), &ramp(0.0, 4), &ramp(1.0, 2));
        assert_eq!(
            doc.get("F", CoordinateKind::Xz).unwrap().xs(),
            vec![2.0, 1.0, 0.0]
        );
        assert_eq!(
            doc.get("B", CoordinateKind::Xz).unwrap().xs(),
            vec![3.0, 2.0, 1.0, 0.0]
        );
        assert_eq!(
            doc.get("E", CoordinateKind::Xz).unwrap().xs(),
            vec![1.0, 2.0]
        );
    }
}
