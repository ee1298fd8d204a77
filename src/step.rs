//! Step-length rule keeping the iterates in the interior of the cone.
//!
//! Given a positive definite iterate `M` and a direction `dM`, the largest
//! `α` such that `M + α dM` stays positive definite is determined by the
//! smallest eigenvalue `λ` of the congruence-transformed direction `L⁻¹ dM
//! L⁻ᵗ`, where `M = L Lᵗ`. If `λ ≥ 0`, the direction never leaves the cone.
//! Otherwise the boundary is hit at `α = −1/λ` and the step is shortened by
//! the safety factor `γ ∈ (0, 1)` to `−γ/λ`.
//!
//! Positive scalars (`τ` and `κ` of the homogeneous embedding) are handled the
//! same way by [`ratio_bound`]. Bounds from multiple variables are combined by
//! [`step_length`].
//!
//! The bound is exact only in exact arithmetic. Close to the boundary the
//! accepted point can still lose definiteness by rounding, so the length is
//! finally passed through [`backtrack`], which shrinks it by `γ` until the
//! new iterate is numerically interior.

use nalgebra::{convert, DMatrix, RealField};

use crate::{
    linalg::{cholesky, min_eigenvalue, LinalgError},
    symmetrize::symmetrize,
};

/// Bound on the step length imposed by a single variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepBound<T> {
    /// The variable stays feasible for any nonnegative step.
    Unconstrained,
    /// The variable stays feasible only up to given step.
    Limited(T),
}

impl<T: RealField + Copy> StepBound<T> {
    /// Returns the more restrictive of two bounds.
    ///
    /// [`StepBound::Unconstrained`] is the identity of this operation. When the
    /// limits are equal, `self` is kept.
    pub fn min(self, other: Self) -> Self {
        match (self, other) {
            (StepBound::Unconstrained, other) => other,
            (this, StepBound::Unconstrained) => this,
            (StepBound::Limited(a), StepBound::Limited(b)) => {
                if b < a {
                    StepBound::Limited(b)
                } else {
                    StepBound::Limited(a)
                }
            }
        }
    }

    /// Converts the bound into a step length in `(0, 1]`.
    pub fn length(self) -> T {
        match self {
            StepBound::Unconstrained => T::one(),
            StepBound::Limited(limit) => limit.min(T::one()),
        }
    }
}

/// Computes the bound for a positive definite matrix iterate `m` moving in
/// the symmetric direction `dm`.
///
/// Fails with [`LinalgError::NotPositiveDefinite`] if `m` is not positive
/// definite.
pub fn psd_bound<T: RealField + Copy>(
    m: &DMatrix<T>,
    dm: &DMatrix<T>,
    gamma: T,
) -> Result<StepBound<T>, LinalgError> {
    let l = cholesky(m)?;

    // L⁻¹ dM L⁻ᵗ = L⁻¹ (L⁻¹ dM)ᵗ for symmetric dM.
    let half = l
        .solve_lower_triangular(dm)
        .ok_or(LinalgError::NotPositiveDefinite)?;
    let u = l
        .solve_lower_triangular(&half.transpose())
        .ok_or(LinalgError::NotPositiveDefinite)?;

    let lambda = min_eigenvalue(&symmetrize(&u), T::default_epsilon())?;

    if lambda >= T::zero() {
        Ok(StepBound::Unconstrained)
    } else {
        Ok(StepBound::Limited(-gamma / lambda))
    }
}

/// Computes the bound for a positive scalar `v` moving in the direction `dv`.
pub fn ratio_bound<T: RealField + Copy>(v: T, dv: T, gamma: T) -> StepBound<T> {
    if dv >= T::zero() {
        StepBound::Unconstrained
    } else {
        StepBound::Limited(-gamma * v / dv)
    }
}

/// Maximum number of shortenings done by [`backtrack`].
pub const MAX_BACKTRACKS: usize = 50;

/// Returns `true` if the symmetric matrix is positive definite with a margin
/// large enough to survive the next factorization.
///
/// The smallest eigenvalue must exceed `10 n ε ‖M‖`.
pub fn is_interior<T: RealField + Copy>(m: &DMatrix<T>) -> bool {
    if cholesky(m).is_err() {
        return false;
    }

    let n: T = convert(m.nrows() as f64);
    let margin = convert::<f64, T>(10.0) * n * T::default_epsilon() * m.norm();

    matches!(min_eigenvalue(m, T::default_epsilon()), Ok(lambda) if lambda > margin)
}

/// Shortens the step length `alpha` by the factor `gamma` until `m + alpha dm`
/// is interior.
///
/// Returns zero if no such length was found in [`MAX_BACKTRACKS`] attempts,
/// in which case the iterate must not move.
pub fn backtrack<T: RealField + Copy>(m: &DMatrix<T>, dm: &DMatrix<T>, alpha: T, gamma: T) -> T {
    let mut alpha = alpha;

    for _ in 0..MAX_BACKTRACKS {
        if is_interior(&(m + dm * alpha)) {
            return alpha;
        }

        alpha *= gamma;
    }

    T::zero()
}

/// Combines the bounds into the final step length in `(0, 1]`.
pub fn step_length<T, I>(bounds: I) -> T
where
    T: RealField + Copy,
    I: IntoIterator<Item = StepBound<T>>,
{
    bounds
        .into_iter()
        .fold(StepBound::Unconstrained, StepBound::min)
        .length()
}
