//! Dense polynomial kernel for relative-volume computations.
//!
//! The cylinder-intersection volume recurrence only ever needs two
//! operations on low-degree polynomials: Horner evaluation and an in-place
//! antiderivative. Polynomials are plain coefficient slices with the
//! constant term at index 0; the caller tracks the degree.

use crate::scalar::RealScalar;

/// Evaluate `Σ_{i=0..=degree} p[i]·xⁱ` by Horner's rule.
pub fn eval_poly<F: RealScalar>(degree: usize, p: &[F], x: F) -> F {
    let mut acc = F::zero();
    for i in (0..=degree).rev() {
        acc = acc * x + p[i];
    }
    acc
}

/// Replace `p` with its antiderivative (constant of integration 0).
///
/// The degree grows by one: `p[i+1] = p[i]/(i+1)`, so the slice must have
/// room for `degree + 2` coefficients.
pub fn integrate_poly<F: RealScalar>(degree: usize, p: &mut [F]) {
    for i in (0..=degree).rev() {
        p[i + 1] = p[i] / F::from_f64((i + 1) as f64);
    }
    p[0] = F::zero();
}
