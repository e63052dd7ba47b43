//! Least-squares polynomial in one variable.
//!
//! The abscissa is centred and scaled to roughly `[-1, 1]` before building
//! the Vandermonde matrix; rectified coordinates can reach several hundred
//! units and a raw cubic basis would be badly conditioned.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

const SVD_EPS: f64 = 1e-12;

/// `p(t) = Σ c_k · ((t - offset) / scale)^k`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Polynomial {
    coefficients: Vec<f64>,
    offset: f64,
    scale: f64,
}

impl Polynomial {
    /// Ordinary least squares fit of `values ≈ p(abscissa)`.
    ///
    /// Returns `None` when fewer than `degree + 1` samples are given, the
    /// inputs differ in length, or the solve fails. Rank-deficient systems
    /// (e.g. all samples on one abscissa) get the minimum-norm solution.
    pub fn fit(abscissa: &[f32], values: &[f32], degree: usize) -> Option<Self> {
        let n = abscissa.len();
        if n != values.len() || n < degree + 1 {
            return None;
        }

        let offset = abscissa.iter().map(|&t| t as f64).sum::<f64>() / n as f64;
        let spread = abscissa
            .iter()
            .map(|&t| (t as f64 - offset).abs())
            .fold(0.0f64, f64::max);
        let scale = if spread > SVD_EPS { spread } else { 1.0 };

        let cols = degree + 1;
        let mut a = DMatrix::<f64>::zeros(n, cols);
        for (r, &t) in abscissa.iter().enumerate() {
            let u = (t as f64 - offset) / scale;
            let mut pow = 1.0;
            for c in 0..cols {
                a[(r, c)] = pow;
                pow *= u;
            }
        }
        let b = DVector::from_iterator(n, values.iter().map(|&v| v as f64));

        let svd = a.svd(true, true);
        let coeffs = svd.solve(&b, SVD_EPS).ok()?;
        if coeffs.iter().any(|c| !c.is_finite()) {
            return None;
        }
        Some(Self {
            coefficients: coeffs.iter().copied().collect(),
            offset,
            scale,
        })
    }

    /// Evaluate with Horner's scheme.
    pub fn eval(&self, t: f32) -> f32 {
        let u = (t as f64 - self.offset) / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0f64, |acc, &c| acc * u + c) as f32
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Coefficients in the normalised basis, constant term first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Root mean square of `values - p(abscissa)`.
    pub fn rms_residual(&self, abscissa: &[f32], values: &[f32]) -> f32 {
        if abscissa.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = abscissa
            .iter()
            .zip(values)
            .map(|(&t, &v)| {
                let r = (v - self.eval(t)) as f64;
                r * r
            })
            .sum();
        (sum_sq / abscissa.len() as f64).sqrt() as f32
    }
}
