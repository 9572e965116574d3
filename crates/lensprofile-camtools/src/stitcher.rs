//! Segment stitching
//!
//! Samples the radius domain of one surface on a uniform grid and hands
//! each segment the samples it owns, `(previous boundary, SemiDiameter]`.
//! Each segment is anchored at the sag where the previous one ended, which
//! keeps the composite curve continuous.

use lensprofile_core::{Profile, ProfileError, SurfaceSpec};
use tracing::debug;

use crate::sag::{evaluate, BOUNDARY_TOLERANCE};

/// Relative guard keeping `outer_radius` out of the grid when it falls on a step
const COUNT_GUARD: f64 = 1e-9;

/// Largest radius grid a single surface may be sampled on
pub const MAX_SAMPLES: usize = 10_000_000;

/// Uniform radius grid from `start` up to, excluding, `outer_radius`
pub fn sample_radii(start: f64, outer_radius: f64, step: f64) -> Result<Vec<f64>, ProfileError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(ProfileError::InvalidSampling(format!(
            "step {} must be a finite value > 0",
            step
        )));
    }
    if !start.is_finite() || !outer_radius.is_finite() || outer_radius <= start {
        return Err(ProfileError::InvalidSampling(format!(
            "outer radius {} must be greater than the start radius {}",
            outer_radius, start
        )));
    }

    let span = ((outer_radius - start) / step - COUNT_GUARD).ceil();
    if span > MAX_SAMPLES as f64 {
        return Err(ProfileError::InvalidSampling(format!(
            "step {} yields {} samples over [{}, {}), limit is {}",
            step, span, start, outer_radius, MAX_SAMPLES
        )));
    }
    let count = (span as usize).max(1);
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}

/// Stitch the segments of a surface into one continuous profile
///
/// Segments are processed in the order given. A segment whose interval
/// holds no sample is skipped and does not move the running boundary.
/// Every sample after the start point must be claimed by some segment.
pub fn stitch(surface: &SurfaceSpec, outer_radius: f64, step: f64) -> Result<Profile, ProfileError> {
    surface.validate()?;

    let start = surface.start_point;
    let r = sample_radii(start.r, outer_radius, step)?;
    let mut z = vec![0.0; r.len()];
    z[0] = start.z;

    let (mut r0, mut z0) = (start.r, start.z);
    let mut covered = 1;

    for (index, segment) in surface.segments.iter().enumerate() {
        let semi_diameter = segment.semi_diameter();
        let lo = r.partition_point(|&x| x <= r0 + BOUNDARY_TOLERANCE);
        let hi = r.partition_point(|&x| x <= semi_diameter + BOUNDARY_TOLERANCE);

        if lo >= hi {
            debug!(
                segment = index,
                semi_diameter, "Segment interval holds no samples, skipping"
            );
            continue;
        }

        let sag = evaluate(segment, &r[lo..hi], z0)
            .map_err(|err| ProfileError::from_sag(index, err))?;
        z[lo..hi].copy_from_slice(&sag);

        r0 = semi_diameter;
        z0 = sag[sag.len() - 1];
        covered = hi;

        debug!(
            segment = index,
            surface_type = %segment.surface_type(),
            samples = hi - lo,
            "Stitched segment"
        );
    }

    if covered < r.len() {
        return Err(ProfileError::UncoveredDomain {
            first_uncovered: r[covered],
            outer_radius,
        });
    }

    Profile::from_samples(r, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lensprofile_core::{SegmentSpec, StartPoint};

    #[test]
    fn test_sample_radii_excludes_outer_radius() {
        let r = sample_radii(0.0, 1.0, 0.25).unwrap();
        assert_eq!(r, vec![0.0, 0.25, 0.5, 0.75]);

        let r = sample_radii(0.0, 1.1, 0.25).unwrap();
        assert_eq!(r.len(), 5);
    }

    #[test]
    fn test_sample_radii_rejects_bad_step() {
        assert!(matches!(
            sample_radii(0.0, 1.0, 0.0),
            Err(ProfileError::InvalidSampling(_))
        ));
        assert!(matches!(
            sample_radii(0.0, 1.0, f64::NAN),
            Err(ProfileError::InvalidSampling(_))
        ));
        assert!(matches!(
            sample_radii(2.0, 1.0, 0.1),
            Err(ProfileError::InvalidSampling(_))
        ));
    }

    #[test]
    fn test_sample_radii_rejects_oversized_grid() {
        assert!(matches!(
            sample_radii(0.0, 5.3, 1e-12),
            Err(ProfileError::InvalidSampling(_))
        ));
    }

    #[test]
    fn test_thin_segment_is_skipped() {
        // second segment ends before the next sample at r = 0.75
        let surface = SurfaceSpec::new(
            StartPoint::new(0.0, 0.0),
            vec![
                SegmentSpec::line(0.25, 0.5).unwrap(),
                SegmentSpec::line(9.0, 0.6).unwrap(),
                SegmentSpec::line(0.5, 1.0).unwrap(),
            ],
        )
        .unwrap();

        let profile = stitch(&surface, 1.0, 0.25).unwrap();
        assert_eq!(profile.r(), &[0.0, 0.25, 0.5, 0.75]);
        assert_eq!(profile.z(), &[0.0, 0.0, 0.25, 0.25]);
    }

    #[test]
    fn test_uncovered_tail_is_an_error() {
        let surface = SurfaceSpec::new(
            StartPoint::new(0.0, 0.0),
            vec![SegmentSpec::standard(10.0, 0.0, 0.5).unwrap()],
        )
        .unwrap();

        let err = stitch(&surface, 1.0, 0.25).unwrap_err();
        assert_eq!(
            err,
            ProfileError::UncoveredDomain {
                first_uncovered: 0.75,
                outer_radius: 1.0
            }
        );
    }

    #[test]
    fn test_out_of_order_segments_are_reported() {
        let surface = SurfaceSpec {
            start_point: StartPoint::default(),
            segments: vec![
                SegmentSpec::line(0.1, 2.0).unwrap(),
                SegmentSpec::line(0.2, 1.0).unwrap(),
            ],
        };
        assert!(matches!(
            stitch(&surface, 2.0, 0.1),
            Err(ProfileError::OutOfOrderSegments { segment: 1, .. })
        ));
    }

    #[test]
    fn test_degenerate_line_carries_segment_index() {
        // the first segment claims up to 0.5, the line then owns only r = 0.75
        let surface = SurfaceSpec::new(
            StartPoint::new(0.0, 0.0),
            vec![
                SegmentSpec::standard(10.0, 0.0, 0.5).unwrap(),
                SegmentSpec::line(0.3, 0.75).unwrap(),
            ],
        )
        .unwrap();
        let err = stitch(&surface, 0.8, 0.25).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::DegenerateSegment { segment: 1, .. }
        ));
    }
}
