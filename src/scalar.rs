//! Generic real scalar for the pruning engine.
//!
//! The cost/probability model and the descent optimizer are written against
//! [`RealScalar`] rather than `f64` directly, so the same code can run on
//! native doubles or on a software high-precision float. The trait is a thin
//! layer over [`num_traits::Float`], which already provides the arithmetic,
//! square root, logarithm, exponential and integer powers the model needs;
//! the three extra methods cover the conversions at the API boundary and the
//! parsing of the embedded constant tables.

use std::fmt::{Debug, Display};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use num_traits::Float;

/// Real scalar used for all internal pruner arithmetic.
pub trait RealScalar:
    Float
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
    /// Convert a caller-supplied double (GS norm, radius, probability).
    fn from_f64(x: f64) -> Self;

    /// Round to the nearest double for reporting back to the caller.
    fn to_f64(self) -> f64;

    /// Parse one of the embedded high-precision decimal constants.
    ///
    /// Values above the scalar's range map to its infinity (only
    /// factorial entries past the reachable half dimension overflow an
    /// `f64`).
    fn from_decimal_str(s: &str) -> Self;
}

impl RealScalar for f64 {
    fn from_f64(x: f64) -> Self {
        x
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_decimal_str(s: &str) -> Self {
        // overflowing entries parse to +inf, malformed ones poison as NaN
        s.parse().unwrap_or(f64::NAN)
    }
}
