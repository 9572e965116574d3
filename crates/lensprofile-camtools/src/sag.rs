//! Surface sag evaluation
//!
//! Maps the radii owned by one segment to sag values. Every primitive
//! computes an unanchored sag `core(r)` and is then shifted so that its first
//! sample lands exactly on the anchor sag `z0` handed over by the previous
//! segment. That shift is the whole continuity mechanism: a segment never
//! needs to know the shape of its neighbour, only where it ended.
//!
//! # Conic domain clamp
//!
//! The conic discriminant `1 - (1 + k) c² r²` goes negative past the point
//! where the conic turns over. It is clamped to zero before the square root,
//! so such samples evaluate to `c r²` instead of NaN. This holds for every
//! conic-based primitive (Standard, EvenAsphere base term, OffsetCircle).

use lensprofile_core::{SagError, SegmentSpec, SpecError};

/// Absolute tolerance for comparing sampled radii with segment boundaries
pub const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Conic sag with the discriminant clamped at zero
pub fn conic_sag(curvature: f64, conic: f64, r: f64) -> f64 {
    let r2 = r * r;
    let delta = (1.0 - (1.0 + conic) * curvature * curvature * r2).max(0.0);
    curvature * r2 / (1.0 + delta.sqrt())
}

/// Even polynomial `sum a[i] * r^(2 (i + 1))`
pub fn even_terms(coefficients: &[f64], r: f64) -> f64 {
    let r2 = r * r;
    let mut power = r2;
    let mut sum = 0.0;
    for &a in coefficients {
        sum += a * power;
        power *= r2;
    }
    sum
}

/// Shift `core` so the sample at `r_min` equals `z0`
fn anchored(r: &[f64], r_min: f64, z0: f64, core: impl Fn(f64) -> f64) -> Vec<f64> {
    let base = core(r_min);
    r.iter().map(|&r| z0 + (core(r) - base)).collect()
}

/// Evaluate a segment over its radii, anchored at `z0`
///
/// `r` is expected to lie in the segment's interval
/// `(previous boundary, semi_diameter]`. An empty `r` yields an empty
/// result.
pub fn evaluate(segment: &SegmentSpec, r: &[f64], z0: f64) -> Result<Vec<f64>, SagError> {
    segment.validate()?;

    let Some(r_min) = r.iter().copied().reduce(f64::min) else {
        return Ok(Vec::new());
    };

    let z = match segment {
        SegmentSpec::Standard(p) => {
            let c = 1.0 / p.radius;
            anchored(r, r_min, z0, |r| conic_sag(c, p.conic, r))
        }
        SegmentSpec::EvenAsphere(p) => {
            if p.asphere_params.len() != p.asphere_term {
                return Err(SpecError::AsphereTermMismatch {
                    expected: p.asphere_term,
                    actual: p.asphere_params.len(),
                }
                .into());
            }
            let c = 1.0 / p.radius;
            anchored(r, r_min, z0, |r| {
                conic_sag(c, p.conic, r) + even_terms(&p.asphere_params, r)
            })
        }
        SegmentSpec::OffsetCircle(p) => {
            let c = 1.0 / p.radius;
            anchored(r, r_min, z0, |r| conic_sag(c, p.conic, r - p.center))
        }
        SegmentSpec::Line(p) => {
            let width = p.semi_diameter - r_min;
            if width.abs() <= BOUNDARY_TOLERANCE {
                return Err(SagError::DegenerateSegment { radius: r_min });
            }
            let rise = p.end_z - z0;
            r.iter().map(|&r| z0 + rise * (r - r_min) / width).collect()
        }
    };

    Ok(z)
}
