//! Curve analysis
//!
//! Local slope and radius of curvature of a sampled profile curve, used to
//! check a generated or parsed polyline against its design radii.
//!
//! All functions take the abscissa `x` (radial coordinate) first and the
//! sag `z` second. Flat regions give an infinite radius; callers must
//! tolerate `inf` (and `NaN` from non-finite input).

use lensprofile_core::{AnalysisError, NamedPolyline};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn check_samples(x: &[f64], z: &[f64], required: usize) -> Result<(), AnalysisError> {
    if x.len() != z.len() {
        return Err(AnalysisError::LengthMismatch {
            x: x.len(),
            z: z.len(),
        });
    }
    if x.len() < required {
        return Err(AnalysisError::TooFewSamples {
            required,
            actual: x.len(),
        });
    }
    Ok(())
}

/// Derivative of `f` over non-uniform samples `x`
///
/// Second order central differences inside, one-sided differences at the
/// two ends. Needs at least two samples and distinct neighbouring `x`.
pub fn gradient(x: &[f64], f: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    check_samples(x, f, 2)?;
    if let Some(index) = (1..x.len()).find(|&i| x[i] == x[i - 1]) {
        return Err(AnalysisError::RepeatedAbscissa { index });
    }

    let n = x.len();
    let mut out = vec![0.0; n];
    out[0] = (f[1] - f[0]) / (x[1] - x[0]);
    out[n - 1] = (f[n - 1] - f[n - 2]) / (x[n - 1] - x[n - 2]);

    for i in 1..n - 1 {
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        let a = -h1 / (h0 * (h0 + h1));
        let b = (h1 - h0) / (h0 * h1);
        let c = h0 / (h1 * (h0 + h1));
        out[i] = a * f[i - 1] + b * f[i] + c * f[i + 1];
    }
    Ok(out)
}

/// Slope `dz/dx`
pub fn first_derivative(x: &[f64], z: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    gradient(x, z)
}

/// Second derivative `d²z/dx²`, the gradient of the gradient
pub fn second_derivative(x: &[f64], z: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    gradient(x, &gradient(x, z)?)
}

/// Radius of curvature from precomputed derivatives
///
/// `(1 + z'^2)^(3/2) / |z''|`, `+inf` where `z''` is zero.
pub fn curvature_radius_from_derivatives(
    slope: &[f64],
    second: &[f64],
) -> Result<Vec<f64>, AnalysisError> {
    if slope.len() != second.len() {
        return Err(AnalysisError::LengthMismatch {
            x: slope.len(),
            z: second.len(),
        });
    }
    Ok(slope
        .iter()
        .zip(second)
        .map(|(&d1, &d2)| {
            if d2 == 0.0 {
                f64::INFINITY
            } else {
                (1.0 + d1 * d1).powf(1.5) / d2.abs()
            }
        })
        .collect())
}

/// Radius of curvature by finite differences
pub fn curvature_radius(x: &[f64], z: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    let slope = first_derivative(x, z)?;
    let second = gradient(x, &slope)?;
    curvature_radius_from_derivatives(&slope, &second)
}

/// Axial radius between consecutive samples
///
/// Radius of the circle centred on the optical axis that passes through
/// points `(x[i-1], z[i-1])` and `(x[i], z[i])`:
///
/// `R = sqrt(xn^4 - 2 xn^2 (xp^2 - dz^2) + (xp^2 + dz^2)^2) / (2 dz)`
///
/// The sign follows `dz`. A zero `dz` gives `+inf`. The first sample has no
/// backward neighbour and takes the value of the second.
pub fn axial_radius(x: &[f64], z: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    check_samples(x, z, 2)?;

    let mut out = Vec::with_capacity(x.len());
    out.push(0.0);
    for i in 1..x.len() {
        let (xn, xp) = (x[i], x[i - 1]);
        let dz = z[i] - z[i - 1];
        if dz == 0.0 {
            out.push(f64::INFINITY);
            continue;
        }
        let (xn2, xp2, dz2) = (xn * xn, xp * xp, dz * dz);
        let radicand = xn2 * xn2 - 2.0 * xn2 * (xp2 - dz2) + (xp2 + dz2).powi(2);
        out.push(radicand.sqrt() / (2.0 * dz));
    }
    out[0] = out[1];
    Ok(out)
}

/// Per-sample analysis of one polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveAnalysis {
    pub name: String,
    pub x: Vec<f64>,
    pub z: Vec<f64>,
    pub slope: Vec<f64>,
    pub second_derivative: Vec<f64>,
    pub curvature_radius: Vec<f64>,
    pub axial_radius: Vec<f64>,
}

impl CurveAnalysis {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Finite curvature radii only
    pub fn finite_curvature_radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.curvature_radius.iter().copied().filter(|r| r.is_finite())
    }

    /// Median of the finite curvature radii
    pub fn median_curvature_radius(&self) -> Option<f64> {
        let mut radii: Vec<f64> = self.finite_curvature_radii().collect();
        if radii.is_empty() {
            return None;
        }
        radii.sort_by(f64::total_cmp);
        let mid = radii.len() / 2;
        Some(if radii.len() % 2 == 0 {
            (radii[mid - 1] + radii[mid]) / 2.0
        } else {
            radii[mid]
        })
    }
}

/// Slope, second derivative and both radius estimates of a polyline
pub fn analyze(polyline: &NamedPolyline) -> Result<CurveAnalysis, AnalysisError> {
    let x = polyline.xs();
    let z = polyline.zs();

    let slope = first_derivative(&x, &z)?;
    let second = gradient(&x, &slope)?;
    let curvature = curvature_radius_from_derivatives(&slope, &second)?;
    let axial = axial_radius(&x, &z)?;

    debug!(
        name = %polyline.name,
        samples = x.len(),
        "Analysed polyline"
    );

    Ok(CurveAnalysis {
        name: polyline.name.clone(),
        x,
        z,
        slope,
        second_derivative: second,
        curvature_radius: curvature,
        axial_radius: axial,
    })
}
