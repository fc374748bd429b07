//! Error type for the pruning optimizer.

use thiserror::Error;

use crate::tables::MAX_N;

/// Failures surfaced by the public pruner entry points.
///
/// All variants are terminal for the current call; the pruner instance
/// stays usable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PruningError {
    /// Basis load rejected: the pruner needs at least two Gram-Schmidt
    /// vectors and at most `MAX_N`.
    #[error("basis dimension {0} is outside the supported range [2, {max}]", max = MAX_N)]
    InvalidDimension(usize),

    /// A cost/probability query or an optimization was attempted before
    /// any basis shape was loaded.
    #[error("no basis shape loaded")]
    NoBasisLoaded,

    /// Caller-supplied pruning coefficients violated the layout contract
    /// (start with 1.0, non-increasing, within [0.1, 1]).
    #[error("ill-formed pruning coefficients (must start with 1.0 and be non-increasing within [0.1, 1])")]
    IllFormedPruning,
}
