//! # lattice_pruner
//!
//! Pruning-coefficient optimization for lattice SVP enumeration.
//!
//! Pruned enumeration (Gama-Nguyen-Regev "extreme pruning") trades the
//! certainty of finding the shortest vector for a massive reduction in
//! enumeration-tree size, then recovers the success probability by
//! retrying on re-randomized, re-preprocessed bases. Picking the bounding
//! profile well is what makes the trade worthwhile; this crate computes
//! that profile numerically from nothing but the Gram-Schmidt shape of the
//! basis.
//!
//! # What this crate does
//!
//! - Models the expected node count and the single-try success probability
//!   of a pruned enumeration via relative volumes of nested cylinder
//!   intersections (a polynomial recurrence).
//! - Minimizes the retry-amortized total cost (enumeration plus
//!   preprocessing per retry) with a projected gradient descent over the
//!   monotone feasible set of bounding profiles.
//!
//! It does *not* enumerate, orthogonalize, or drive LLL/BKZ; it consumes
//! squared Gram-Schmidt norms (or any [`GsoSource`]) and produces a
//! pruning buffer plus scalar cost/probability estimates.
//!
//! # Example
//!
//! ```
//! use lattice_pruner::{heuristics, Pruner};
//!
//! // a geometric (LLL-shaped) Gram-Schmidt profile
//! let n = 30;
//! let gs_sq_norms: Vec<f64> = (0..n).map(|i| 0.94f64.powi((n - 1 - i) as i32)).collect();
//!
//! let mut pruner = Pruner::<f64>::new();
//! pruner.load_basis_shape(&gs_sq_norms).unwrap();
//! pruner.enumeration_radius = heuristics::gaussian_heuristic_sq(&gs_sq_norms);
//! pruner.target_success_proba = 0.5;
//!
//! let mut pr = vec![1.0; n as usize];
//! pruner.optimize_pruning_coeffs(&mut pr, true).unwrap();
//!
//! let cost = pruner.get_enum_cost_with_retrials(&pr).unwrap();
//! let proba = pruner.get_svp_success_proba(&pr).unwrap();
//! assert!(cost > 0.0 && proba > 0.0 && proba <= 1.0 + 1e-9);
//! ```

pub mod error;
pub mod heuristics;
pub mod poly;
pub mod pruner;
pub mod scalar;
pub mod tables;

pub use error::PruningError;
pub use pruner::{auto_prune, DescentStats, GsoSource, Pruner};
pub use scalar::RealScalar;
pub use tables::{MAX_D, MAX_N};
