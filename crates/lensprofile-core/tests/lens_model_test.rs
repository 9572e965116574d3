use lensprofile_core::{
    Error, LensSpec, ProfileError, SegmentSpec, SpecError, SurfaceLabel, SurfaceType,
};

#[test]
fn test_segment_serde_uses_schema_names() {
    let json = r#"{"type": "OffsetCircle",
                   "params": {"Radius": 1.5, "Conic": 0.0, "Center": 3.0, "SemiDiameter": 3.5}}"#;
    let segment: SegmentSpec = serde_json::from_str(json).unwrap();

    assert_eq!(segment.surface_type(), SurfaceType::OffsetCircle);
    assert_eq!(segment.semi_diameter(), 3.5);
    assert_eq!(
        segment,
        SegmentSpec::offset_circle(1.5, 0.0, 3.0, 3.5).unwrap()
    );
}

#[test]
fn test_constructors_reject_bad_parameters() {
    assert!(matches!(
        SegmentSpec::standard(0.0, 0.0, 1.0),
        Err(SpecError::InvalidParameter { .. })
    ));
    assert!(matches!(
        SegmentSpec::line(f64::NAN, 1.0),
        Err(SpecError::InvalidParameter { .. })
    ));
    assert!(matches!(
        SegmentSpec::standard(10.0, 0.0, -1.0),
        Err(SpecError::InvalidParameter { .. })
    ));
}

#[test]
fn test_default_lens_layout() {
    let lens = LensSpec::with_defaults(0.2, 10.6).unwrap();
    assert!((lens.semidiameter() - 5.3).abs() < 1e-12);
    assert_eq!(lens.back.start_point.z, 0.2);
    assert!((lens.edge.start_point.r - 4.3).abs() < 1e-12);
    assert_eq!(lens.edge.start_point.z, 3.0);
    for label in SurfaceLabel::ALL {
        let surface = lens.surface(label);
        assert_eq!(surface.segments.len(), 1);
        assert_eq!(surface.segments[0].semi_diameter(), lens.semidiameter());
    }
    assert!(lens.validate().is_ok());
}

#[test]
fn test_lens_validation_names_the_surface() {
    let mut lens = LensSpec::with_defaults(0.2, 10.6).unwrap();
    lens.surface_mut(SurfaceLabel::Edge).segments.insert(
        0,
        SegmentSpec::line(3.1, 5.3).unwrap(),
    );

    let err = lens.validate().unwrap_err();
    assert_eq!(err.failed_surface(), Some(SurfaceLabel::Edge));
    assert!(matches!(
        err,
        Error::Surface {
            source: ProfileError::OutOfOrderSegments { segment: 1, .. },
            ..
        }
    ));
    assert!(err.to_string().starts_with("edge surface:"));
}
