//! Pruning-coefficient optimizer for SVP enumeration.
//!
//! Given the Gram-Schmidt shape of a lattice basis, an enumeration radius,
//! a preprocessing cost and a target success probability, compute the
//! monotone bounding profile that minimizes the expected total cost of
//! retry-amortized pruned enumeration (extreme pruning in the sense of
//! Gama-Nguyen-Regev).
//!
//! # Model
//!
//! The expected node count of a pruned enumeration and its success
//! probability are both integrals over nested cylinder intersections.
//! Those integrals reduce to a polynomial recurrence (integrate, evaluate
//! at the scaled bound, repeat), scaled by `k!` and by unit-ball volumes.
//! The optimizer then runs a projected gradient descent on the bounding
//! profile: central finite differences in log-cost space, projection onto
//! the monotone feasible region after every perturbation, and a geometric
//! line search that keeps extending the step while the amortized cost
//! drops.
//!
//! # Conventions
//!
//! - `r` holds squared Gram-Schmidt norms, *reversed* from caller order
//!   and renormalized to unit geometric mean so partial volumes stay in
//!   range at any dimension.
//! - `pv` holds partial volumes (not squared).
//! - Bounding profiles are squared radius fractions. Externally they are a
//!   `pr[0..n]` buffer with `pr[0] = 1`, non-increasing, odd/even pairs
//!   equal; internally only every other entry is kept, reversed, in
//!   `b[0..d]` with `b[d-1] = 1` non-decreasing.
//!
//! # References
//!
//! - Gama, Nguyen, Regev: "Lattice Enumeration Using Extreme Pruning"
//!   (EUROCRYPT 2010)
//! - Y. Chen: "Réduction de réseau et sécurité concrète du chiffrement
//!   complètement homomorphe" (PhD thesis, 2013), chapter on pruned
//!   enumeration

use crate::error::PruningError;
use crate::poly::{eval_poly, integrate_poly};
use crate::scalar::RealScalar;
use crate::tables::{BALL_VOL_DEC, FACTORIAL_DEC, MAX_N};

/// Read-only view of a Gram-Schmidt object.
///
/// The pruner only reads the diagonal `(i, i)` entries, which are the
/// squared norms of the orthogonalized basis vectors. Any GSO
/// representation (QR, MGS, rotor-tracked) can implement this.
pub trait GsoSource {
    /// Number of basis vectors in the orthogonalization.
    fn dimension(&self) -> usize;

    /// Entry `(row, col)` of the R matrix; `(i, i)` is `‖b*_i‖²`.
    fn get_r(&self, row: usize, col: usize) -> f64;
}

/// Counters from the most recent optimization run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescentStats {
    /// Completed descent rounds (gradient + line search).
    pub rounds: usize,
    /// Accepted line-search steps across all rounds.
    pub line_search_steps: usize,
}

/// Pruning-coefficient optimizer over a generic real scalar.
///
/// Lifecycle: construct with defaults, load a basis shape, set the three
/// public configuration scalars, then query costs or optimize. The
/// instance is reusable across basis loads. Not internally synchronized;
/// independent instances may run on different threads.
pub struct Pruner<F: RealScalar> {
    /// Squared radius of the enumeration ball (caller scale).
    pub enumeration_radius: F,
    /// Success probability the retry amortization aims for.
    pub target_success_proba: F,
    /// Cost of one preprocessing round, amortized over retries.
    pub preproc_cost: F,

    n: usize,
    d: usize,
    r: Vec<F>,
    pv: Vec<F>,
    renormalization_factor: F,

    factorial: Vec<F>,
    ball_vol: Vec<F>,

    epsilon: F,
    min_step: F,
    min_cf_decrease: F,
    step_factor: F,
    shell_ratio: F,
    symmetry_factor: F,

    stats: DescentStats,
}

impl<F: RealScalar> Default for Pruner<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: RealScalar> Pruner<F> {
    /// Create a pruner with default numeric configuration and no basis.
    pub fn new() -> Self {
        let factorial = FACTORIAL_DEC.iter().map(|s| F::from_decimal_str(s)).collect();
        let ball_vol = BALL_VOL_DEC.iter().map(|s| F::from_decimal_str(s)).collect();
        Pruner {
            enumeration_radius: F::zero(),
            target_success_proba: F::from_f64(0.90),
            preproc_cost: F::zero(),
            n: 0,
            d: 0,
            r: Vec::new(),
            pv: Vec::new(),
            renormalization_factor: F::one(),
            factorial,
            ball_vol,
            epsilon: F::from_f64(2f64.powi(-13)),
            min_step: F::from_f64(2f64.powi(-12)),
            min_cf_decrease: F::from_f64(0.9999),
            step_factor: F::from_f64(std::f64::consts::SQRT_2),
            shell_ratio: F::from_f64(0.995),
            symmetry_factor: F::from_f64(2.0),
            stats: DescentStats::default(),
        }
    }

    /// Load a basis shape from squared Gram-Schmidt norms in caller order
    /// (index 0 = first GS vector).
    pub fn load_basis_shape(&mut self, gs_sq_norms: &[f64]) -> Result<(), PruningError> {
        let n = gs_sq_norms.len();
        if n / 2 == 0 || n > MAX_N {
            return Err(PruningError::InvalidDimension(n));
        }
        self.n = n;
        self.d = n / 2;
        self.r.clear();
        self.r.extend(gs_sq_norms.iter().rev().map(|&x| F::from_f64(x)));
        self.renormalize_shape();
        Ok(())
    }

    /// Load a basis shape from a Gram-Schmidt object, restricted to the
    /// window `[beginning, end)`; `end = None` means the full dimension.
    pub fn load_basis_shape_gso<G: GsoSource>(
        &mut self,
        gso: &G,
        beginning: usize,
        end: Option<usize>,
    ) -> Result<(), PruningError> {
        let end = end.unwrap_or_else(|| gso.dimension());
        let n = end.saturating_sub(beginning);
        if n / 2 == 0 || n > MAX_N {
            return Err(PruningError::InvalidDimension(n));
        }
        self.n = n;
        self.d = n / 2;
        self.r.clear();
        for i in 0..n {
            // diagonal reads, already in reversed order
            self.r.push(F::from_f64(gso.get_r(end - 1 - i, end - 1 - i)));
        }
        self.renormalize_shape();
        Ok(())
    }

    /// Rescale `r` to unit geometric mean and rebuild partial volumes.
    ///
    /// Without the rescaling, `pv` overflows for large bases of large
    /// norms and underflows for small ones.
    fn renormalize_shape(&mut self) {
        let mut logvol = F::zero();
        for &ri in &self.r {
            logvol += ri.ln();
        }
        self.renormalization_factor = (-logvol / F::from_f64(self.n as f64)).exp();
        for ri in &mut self.r {
            *ri = *ri * self.renormalization_factor;
        }
        self.pv.clear();
        let mut acc = F::one();
        for i in 0..2 * self.d {
            acc *= self.r[i].sqrt();
            self.pv.push(acc);
        }
    }

    /// Optimize the pruning coefficients in `pr` in place.
    ///
    /// With `reset` the descent starts from the default ramp; otherwise it
    /// starts from the caller-supplied coefficients (which must be well
    /// formed). On return `pr` obeys the output layout: `pr[0] = 1`,
    /// non-increasing, entries in [0.1, 1], odd/even pairs equal.
    pub fn optimize_pruning_coeffs(
        &mut self,
        pr: &mut [f64],
        reset: bool,
    ) -> Result<(), PruningError> {
        self.check_loaded()?;
        assert_eq!(pr.len(), self.n, "pruning buffer length must match the loaded dimension");
        let mut b = Vec::with_capacity(self.d);
        if reset {
            self.init_pruning_coeffs(&mut b);
        } else {
            self.load_pruning_coeffs(pr, &mut b)?;
        }
        self.descent(&mut b);
        self.save_pruning_coeffs(pr, &b);
        Ok(())
    }

    /// Single-attempt SVP success probability of the coefficients in `pr`.
    pub fn get_svp_success_proba(&self, pr: &[f64]) -> Result<f64, PruningError> {
        self.check_loaded()?;
        let mut b = Vec::with_capacity(self.d);
        self.load_pruning_coeffs(pr, &mut b)?;
        Ok(self.svp_success_proba(&b).to_f64())
    }

    /// Expected node count of one enumeration attempt with `pr`.
    pub fn get_enum_cost(&self, pr: &[f64]) -> Result<f64, PruningError> {
        self.check_loaded()?;
        let mut b = Vec::with_capacity(self.d);
        self.load_pruning_coeffs(pr, &mut b)?;
        Ok(self.cost(&b).to_f64())
    }

    /// Retry-amortized total cost of reaching the target success
    /// probability with `pr`.
    pub fn get_enum_cost_with_retrials(&self, pr: &[f64]) -> Result<f64, PruningError> {
        self.check_loaded()?;
        let mut b = Vec::with_capacity(self.d);
        self.load_pruning_coeffs(pr, &mut b)?;
        Ok(self.cost_factor(&b).to_f64())
    }

    /// Counters from the most recent `optimize_pruning_coeffs` call.
    pub fn descent_stats(&self) -> DescentStats {
        self.stats
    }

    /// Loaded working dimension (0 before the first load).
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Renormalized squared GS norms, reversed from caller order.
    pub fn gs_shape(&self) -> &[F] {
        &self.r
    }

    /// Partial volumes `pv[i] = ∏_{k≤i} √r[k]`.
    pub fn partial_volumes(&self) -> &[F] {
        &self.pv
    }

    /// Geometric renormalization factor applied to `r` at load time.
    pub fn renormalization(&self) -> F {
        self.renormalization_factor
    }

    fn check_loaded(&self) -> Result<(), PruningError> {
        if self.d == 0 {
            return Err(PruningError::NoBasisLoaded);
        }
        Ok(())
    }

    /// Read the even-compacted internal profile out of a caller buffer.
    fn load_pruning_coeffs(&self, pr: &[f64], b: &mut Vec<F>) -> Result<(), PruningError> {
        assert_eq!(pr.len(), self.n, "pruning buffer length must match the loaded dimension");
        b.clear();
        for i in 0..self.d {
            b.push(F::from_f64(pr[self.n - 1 - 2 * i]));
        }
        if self.enforce(b, 0) {
            return Err(PruningError::IllFormedPruning);
        }
        Ok(())
    }

    /// Write the internal profile back out, mirroring pairs.
    fn save_pruning_coeffs(&self, pr: &mut [f64], b: &[F]) {
        for i in 0..self.d {
            let v = b[i].to_f64();
            pr[self.n - 1 - 2 * i] = v;
            pr[self.n - 2 - 2 * i] = v;
        }
        pr[0] = 1.0;
    }

    /// Default starting profile: a ramp from 0.1 up to 1.
    fn init_pruning_coeffs(&self, b: &mut Vec<F>) {
        b.clear();
        for i in 0..self.d {
            b.push(F::from_f64(0.1) + F::from_f64(i as f64) / F::from_f64(self.d as f64));
        }
        self.enforce(b, 0);
    }

    /// Project `b` onto the feasible region: entries in [0.1, 1], last
    /// entry pinned at 1, non-decreasing. Returns whether a bound or
    /// monotonicity violation had to be fixed (the 0.1 floor clamps
    /// silently).
    ///
    /// `j` is the coordinate last perturbed; the forward sweep starts
    /// there and the backward sweep ends there, keeping the projection
    /// local instead of re-flattening the whole vector.
    fn enforce(&self, b: &mut [F], j: usize) -> bool {
        let d = self.d;
        let one = F::one();
        let floor = F::from_f64(0.1);
        let mut clamped = false;
        if b[d - 1] < one {
            clamped = true;
        }
        b[d - 1] = one;
        for i in 0..d {
            if b[i] > one {
                b[i] = one;
                clamped = true;
            }
            if b[i] <= floor {
                b[i] = floor;
            }
        }
        for i in j..d - 1 {
            if b[i + 1] < b[i] {
                b[i + 1] = b[i];
                clamped = true;
            }
        }
        for i in (0..j).rev() {
            if b[i + 1] < b[i] {
                b[i] = b[i + 1];
                clamped = true;
            }
        }
        clamped
    }

    /// Relative volume of the `rd`-dimensional cylinder intersection cut
    /// out by the first `rd` bounds, as a fraction of the ball volume.
    ///
    /// One antiderivative-then-evaluate pass per level; the final constant
    /// term times `rd!` is the volume ratio, with the sign flipped on odd
    /// `rd` because each pass negates the constant.
    fn relative_volume(&self, rd: usize, b: &[F]) -> F {
        let mut p = vec![F::zero(); rd + 1];
        p[0] = F::one();
        let mut ld = 0;
        for i in (0..rd).rev() {
            integrate_poly(ld, &mut p);
            ld += 1;
            p[0] = -eval_poly(ld, &p, b[i] / b[rd - 1]);
        }
        if rd % 2 == 1 {
            -p[0] * self.factorial[rd]
        } else {
            p[0] * self.factorial[rd]
        }
    }

    /// Expected node count of one enumeration attempt with profile `b`.
    ///
    /// Sums the Gaussian-heuristic point count of every level: radius
    /// power times relative volume times ball volume over the partial
    /// volume of the sublattice. Odd levels come from the recurrence, even
    /// levels are interpolated geometrically between their neighbors.
    fn cost(&self, b: &[F]) -> F {
        let d = self.d;
        let mut rv = vec![F::zero(); 2 * d];
        for i in 0..d {
            rv[2 * i + 1] = self.relative_volume(i + 1, b);
        }
        rv[0] = F::one();
        for i in 1..d {
            rv[2 * i] = (rv[2 * i - 1] * rv[2 * i + 1]).sqrt();
        }

        let normalized_radius = (self.enumeration_radius * self.renormalization_factor).sqrt();
        let mut total = F::zero();
        for i in 0..2 * d {
            let term = normalized_radius.powi(1 + i as i32)
                * rv[i]
                * self.ball_vol[i + 1]
                * b[i / 2].powi(1 + i as i32).sqrt()
                / self.pv[i];
            total += term;
        }
        total / self.symmetry_factor
    }

    /// Single-attempt success probability of profile `b`.
    ///
    /// Shell estimator: compare the success volume at radius 1 with the
    /// volume at the slightly smaller `shell_ratio` radius; the normalized
    /// difference is the fraction of the success volume sitting in the
    /// outer shell, where the shortest vector lives under the Gaussian
    /// heuristic.
    fn svp_success_proba(&self, b: &[F]) -> F {
        let d = self.d;
        let dx = self.shell_ratio;

        let mut b_shell = Vec::with_capacity(d);
        for i in 0..d {
            let mut s = b[i] / (dx * dx);
            if s > F::one() {
                s = F::one();
            }
            b_shell.push(s);
        }

        let vol = self.relative_volume(d, b);
        let dxn = dx.powi(2 * d as i32);
        let dvol = dxn * self.relative_volume(d, &b_shell) - vol;
        dvol / (dxn - F::one())
    }

    /// Retry-amortized total cost of profile `b`.
    ///
    /// Below the target probability, the expected number of independent
    /// (preprocess + enumerate) attempts is `log(1-target)/log(1-p)`.
    fn cost_factor(&self, b: &[F]) -> F {
        let success_proba = self.svp_success_proba(b);
        if success_proba >= self.target_success_proba {
            return self.cost(b);
        }
        // the shell estimator can stray outside (0, 1) at extreme profiles
        let eps = F::from_f64(1e-10);
        let p = success_proba.max(eps).min(F::one() - eps);
        let trials = (F::one() - self.target_success_proba).ln() / (F::one() - p).ln();
        self.cost(b) * trials + self.preproc_cost * (trials - F::one())
    }

    /// Central-difference descent direction in log-cost space.
    ///
    /// `g[i] = (log cf(b⁻) - log cf(b⁺)) / ε`, so `b + step·g` *decreases*
    /// the amortized cost; this is the negated gradient. Each perturbed
    /// point is re-projected locally around coordinate `i` before
    /// evaluation. The last coordinate is pinned, so `g[d-1] = 0`.
    fn descent_direction(&self, b: &[F], g: &mut Vec<F>) {
        let d = self.d;
        g.clear();
        g.resize(d, F::zero());
        let mut bp = vec![F::zero(); d];
        for i in 0..d - 1 {
            bp.copy_from_slice(b);
            bp[i] = bp[i] * (F::one() - self.epsilon);
            self.enforce(&mut bp, i);
            let x = self.cost_factor(&bp);

            bp.copy_from_slice(b);
            bp[i] = bp[i] * (F::one() + self.epsilon);
            self.enforce(&mut bp, i);
            let y = self.cost_factor(&bp);

            g[i] = (x.ln() - y.ln()) / self.epsilon;
        }
    }

    /// One descent round: normalized direction plus geometric line search.
    ///
    /// The candidate point is *not* reset between iterations; every
    /// accepted step extends the previous one along the same direction
    /// with a √2-growing step, until the amortized cost stops dropping.
    /// Returns the number of accepted steps, or 0 when the round made no
    /// progress (cost dropped by less than the `min_cf_decrease` factor,
    /// vanishing direction, or a non-finite evaluation).
    fn improve(&self, b: &mut Vec<F>) -> usize {
        let d = self.d;
        let mut cf = self.cost_factor(b);
        let old_cf = cf;
        let mut gradient = Vec::new();
        self.descent_direction(b, &mut gradient);

        let mut newb = b.clone();
        let mut norm = F::zero();
        for i in 0..d {
            norm += gradient[i] * gradient[i];
        }
        // the norm deliberately averages over all d slots, pinned slot
        // included, which shortens the initial step a little
        norm = (norm / F::from_f64(d as f64)).sqrt();
        if !(norm > F::zero()) {
            return 0;
        }
        for gi in gradient.iter_mut() {
            *gi = *gi / norm;
        }

        let mut step = self.min_step;
        let mut steps = 0;
        loop {
            for i in 0..d {
                newb[i] = newb[i] + step * gradient[i];
            }
            self.enforce(&mut newb, 0);
            let new_cf = self.cost_factor(&newb);
            if !(new_cf < cf) {
                break;
            }
            b.copy_from_slice(&newb);
            cf = new_cf;
            step *= self.step_factor;
            steps += 1;
        }

        if cf > old_cf * self.min_cf_decrease {
            return 0;
        }
        steps
    }

    /// Run descent rounds until one makes no progress.
    ///
    /// Terminates without a round cap: every counted round shrinks the
    /// amortized cost by at least the `min_cf_decrease` factor, and the
    /// cost is bounded below by zero.
    fn descent(&mut self, b: &mut Vec<F>) {
        self.stats = DescentStats::default();
        loop {
            let steps = self.improve(b);
            if steps == 0 {
                break;
            }
            self.stats.rounds += 1;
            self.stats.line_search_steps += steps;
        }
    }
}

/// One-call driver: load the GSO window into a fresh double-precision
/// pruner, optimize `pr` from the default ramp, and return the achieved
/// single-attempt success probability.
pub fn auto_prune<G: GsoSource>(
    pr: &mut [f64],
    enumeration_radius: f64,
    preproc_cost: f64,
    target_success_proba: f64,
    gso: &G,
    beginning: usize,
    end: Option<usize>,
) -> Result<f64, PruningError> {
    let mut pruner = Pruner::<f64>::new();
    pruner.enumeration_radius = enumeration_radius;
    pruner.target_success_proba = target_success_proba;
    pruner.preproc_cost = preproc_cost;
    pruner.load_basis_shape_gso(gso, beginning, end)?;
    pruner.optimize_pruning_coeffs(pr, true)?;
    pruner.get_svp_success_proba(pr)
}
