use lensprofile_camtools::{stitch, BOUNDARY_TOLERANCE};
use lensprofile_core::{SegmentSpec, StartPoint, SurfaceSpec};
use proptest::prelude::*;

const STEP: f64 = 0.01;

#[derive(Debug, Clone)]
enum Kind {
    Standard(f64, f64),
    Asphere(f64, f64, Vec<f64>),
    Offset(f64, f64, f64),
    Line(f64),
}

fn radius() -> impl Strategy<Value = f64> {
    prop_oneof![-60.0f64..-5.0, 5.0f64..60.0]
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        (radius(), -2.0f64..2.0).prop_map(|(r, k)| Kind::Standard(r, k)),
        (
            radius(),
            -2.0f64..2.0,
            prop::collection::vec(-1e-3f64..1e-3, 0..4)
        )
            .prop_map(|(r, k, a)| Kind::Asphere(r, k, a)),
        (radius(), -1.0f64..1.0, 0.0f64..2.0).prop_map(|(r, k, c)| Kind::Offset(r, k, c)),
        (-1.0f64..1.0).prop_map(Kind::Line),
    ]
}

fn surface() -> impl Strategy<Value = SurfaceSpec> {
    (
        -1.0f64..1.0,
        prop::collection::vec((kind(), 0.05f64..1.0), 1..5),
    )
        .prop_map(|(z_start, parts)| {
            let mut semi_diameter = 0.0;
            let segments = parts
                .into_iter()
                .map(|(kind, width)| {
                    semi_diameter += width;
                    match kind {
                        Kind::Standard(r, k) => SegmentSpec::standard(r, k, semi_diameter),
                        Kind::Asphere(r, k, a) => SegmentSpec::even_asphere(r, k, a, semi_diameter),
                        Kind::Offset(r, k, c) => SegmentSpec::offset_circle(r, k, c, semi_diameter),
                        Kind::Line(end_z) => SegmentSpec::line(end_z, semi_diameter),
                    }
                    .unwrap()
                })
                .collect();
            SurfaceSpec {
                start_point: StartPoint::new(0.0, z_start),
                segments,
            }
        })
}

fn outer(surface: &SurfaceSpec) -> f64 {
    surface.segments.last().unwrap().semi_diameter()
}

proptest! {
    #[test]
    fn stitched_profile_is_continuous_at_boundaries(surface in surface()) {
        let profile = stitch(&surface, outer(&surface), STEP).unwrap();
        let (r, z) = (profile.r(), profile.z());

        prop_assert_eq!(z[0], surface.start_point.z);
        prop_assert!(z.iter().all(|v| v.is_finite()));

        for segment in &surface.segments {
            let boundary = segment.semi_diameter() + BOUNDARY_TOLERANCE;
            if let Some(i) = (1..r.len()).find(|&i| r[i - 1] <= boundary && r[i] > boundary) {
                prop_assert_eq!(z[i], z[i - 1]);
            }
        }
    }

    #[test]
    fn stitched_radii_are_uniform(surface in surface()) {
        let profile = stitch(&surface, outer(&surface), STEP).unwrap();
        prop_assert_eq!(profile.r().len(), profile.z().len());
        for pair in profile.r().windows(2) {
            prop_assert!(pair[1] > pair[0]);
            prop_assert!(((pair[1] - pair[0]) - STEP).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_conic_reduces_to_sphere(radius in radius(), semi in 1.0f64..4.0) {
        let surface = SurfaceSpec::new(
            StartPoint::new(0.0, 0.0),
            vec![SegmentSpec::standard(radius, 0.0, semi).unwrap()],
        )
        .unwrap();
        let profile = stitch(&surface, semi, STEP).unwrap();

        let c = 1.0 / radius;
        let sphere = |r: f64| c * r * r / (1.0 + (1.0 - c * c * r * r).sqrt());
        let (r, z) = (profile.r(), profile.z());
        prop_assert_eq!(z[1], z[0]);
        for i in 1..r.len() {
            let expected = sphere(r[i]) - sphere(r[1]);
            prop_assert!(((z[i] - z[1]) - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn test_end_to_end_front_surface() {
    let front = SurfaceSpec::new(
        StartPoint::new(0.0, 0.0),
        vec![SegmentSpec::standard(-12.0, 0.0, 5.3).unwrap()],
    )
    .unwrap();

    let step = 0.0025;
    let profile = stitch(&front, 5.3, step).unwrap();

    assert_eq!(profile.z()[0], 0.0);
    let last = profile.last().unwrap();
    assert!((5.3 - last.x) <= step + 1e-12);
    assert!(last.x < 5.3);
    // concave front: sag is negative away from the apex
    assert!(last.z < 0.0);
}

#[test]
fn test_domain_clamp_in_stitched_profile() {
    // R = 1, k = 0: the discriminant is negative for r > 1
    let surface = SurfaceSpec::new(
        StartPoint::new(0.0, 0.0),
        vec![SegmentSpec::standard(1.0, 0.0, 1.5).unwrap()],
    )
    .unwrap();
    let profile = stitch(&surface, 1.5, 0.1).unwrap();
    let (r, z) = (profile.r(), profile.z());
    assert!(z.iter().all(|v| v.is_finite()));

    // the segment is anchored at its first sample, r = 0.1
    let anchor = 0.01 / (1.0 + 0.99f64.sqrt());
    for i in 1..r.len() {
        if r[i] > 1.0 + 1e-9 {
            // clamped discriminant: the sag collapses to c * r^2
            assert!(((z[i] - z[1]) - (r[i] * r[i] - anchor)).abs() < 1e-12);
        }
    }
}

#[test]
fn test_multi_segment_surface_with_fillet() {
    let surface = SurfaceSpec::new(
        StartPoint::new(0.0, 0.2),
        vec![
            SegmentSpec::standard(-8.0, -1.0, 3.0).unwrap(),
            SegmentSpec::offset_circle(1.5, 0.0, 3.0, 3.5).unwrap(),
            SegmentSpec::line(1.0, 5.3).unwrap(),
        ],
    )
    .unwrap();
    let profile = stitch(&surface, 5.3, 0.0025).unwrap();

    assert_eq!(profile.z()[0], 0.2);
    let last = profile.last().unwrap();
    // the line ends on its target sag one step before its SemiDiameter
    assert!((last.z - 1.0).abs() < 0.01);
}
