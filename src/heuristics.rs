//! Radius and cost heuristics around enumeration.
//!
//! Helpers callers typically need right before invoking the pruner: the
//! Gaussian-heuristic radius used to pick `enumeration_radius`, the exact
//! unit-ball volume it is built on, and the node-count estimate of an
//! *unpruned* enumeration, which is the baseline pruned costs are compared
//! against.

use std::f64::consts::PI;

/// Volume of the unit Euclidean `k`-ball, `π^{k/2} / Γ(k/2 + 1)`.
///
/// Computed by the exact product recurrence (π powers times rational
/// factors) rather than through `Γ`, so small dimensions come out exact up
/// to rounding.
pub fn unit_ball_volume(k: usize) -> f64 {
    let mut volume = PI.powi((k / 2) as i32);
    if k % 2 == 0 {
        for i in 1..=(k / 2) {
            volume /= i as f64;
        }
    } else {
        for i in 0..=(k / 2) {
            volume *= 2.0 / (2 * i + 1) as f64;
        }
    }
    volume
}

/// Squared Gaussian-heuristic radius for a basis with the given squared
/// Gram-Schmidt norms (caller order).
///
/// The Gaussian heuristic predicts the shortest vector length as
/// `(vol(L) / V_n)^{1/n}`; enumeration radii are squared lengths, so the
/// square is returned. Works in the log domain to survive very unbalanced
/// shapes.
pub fn gaussian_heuristic_sq(gs_sq_norms: &[f64]) -> f64 {
    let n = gs_sq_norms.len();
    if n == 0 {
        return 0.0;
    }
    let log_det: f64 = gs_sq_norms.iter().map(|&r| 0.5 * r.ln()).sum();
    let log_gh = (log_det - unit_ball_volume(n).ln()) / n as f64;
    (2.0 * log_gh).exp()
}

/// Estimated node count of unpruned enumeration at squared radius
/// `radius_sq` over the given squared Gram-Schmidt norms (caller order).
///
/// Sums, from the last level upward, the Gaussian-heuristic point count of
/// each projected sublattice: `Σ_k √(∏ radius_sq/r_i) · V_k`.
pub fn full_enum_cost(radius_sq: f64, gs_sq_norms: &[f64]) -> f64 {
    let n = gs_sq_norms.len();
    let mut det = 1.0;
    let mut cost = 0.0;
    for i in (0..n).rev() {
        det *= radius_sq / gs_sq_norms[i];
        cost += det.sqrt() * unit_ball_volume(n - i);
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_ball_volume_small_dims() {
        assert_eq!(unit_ball_volume(0), 1.0);
        assert_eq!(unit_ball_volume(1), 2.0);
        assert!((unit_ball_volume(2) - PI).abs() < 1e-14);
        assert!((unit_ball_volume(3) - 4.0 * PI / 3.0).abs() < 1e-14);
        assert!((unit_ball_volume(4) - PI * PI / 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_unit_ball_volume_peaks_at_five() {
        // V_k is maximal at k = 5 and decays afterwards
        let vols: Vec<f64> = (0..30).map(unit_ball_volume).collect();
        let max_k = (0..30).max_by(|&a, &b| vols[a].total_cmp(&vols[b])).unwrap();
        assert_eq!(max_k, 5);
        assert!(vols[29] < vols[10]);
    }

    #[test]
    fn test_gaussian_heuristic_unit_lattice() {
        // for Z^n, vol = 1, so GH² = V_n^{-2/n}
        let n = 20;
        let gs = vec![1.0; n];
        let expected = unit_ball_volume(n).powf(-2.0 / n as f64);
        let got = gaussian_heuristic_sq(&gs);
        assert!((got - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_gaussian_heuristic_scales_with_volume() {
        // scaling all squared norms by c² scales GH² by c²
        let gs: Vec<f64> = (0..16).map(|i| 0.9f64.powi(i)).collect();
        let scaled: Vec<f64> = gs.iter().map(|&r| 4.0 * r).collect();
        let a = gaussian_heuristic_sq(&gs);
        let b = gaussian_heuristic_sq(&scaled);
        assert!((b / a - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_full_enum_cost_grows_with_radius() {
        let gs: Vec<f64> = (0..24).map(|i| 0.95f64.powi(23 - i)).collect();
        let r = gaussian_heuristic_sq(&gs);
        let small = full_enum_cost(r, &gs);
        let large = full_enum_cost(4.0 * r, &gs);
        assert!(small.is_finite() && small > 0.0);
        assert!(large > small);
    }
}
