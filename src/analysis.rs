//! Various analyses for assessing the quality of an iterate.

use getset::CopyGetters;
use nalgebra::{DMatrix, RealField};

use crate::{
    core::{CentralPath, SdpProblem},
    linalg::cholesky,
};

/// Computes the relative duality gap `|p − d| / max(|p|, |d|, 1)` of the
/// primal objective `p` and the dual objective `d`.
pub fn relative_gap<T: RealField + Copy>(primal: T, dual: T) -> T {
    let scale = primal.abs().max(dual.abs()).max(T::one());
    (primal - dual).abs() / scale
}

/// Checks whether a symmetric matrix is positive definite.
pub fn is_positive_definite<T: RealField + Copy>(m: &DMatrix<T>) -> bool {
    cholesky(m).is_ok()
}

/// Diagnostics of an iterate with respect to the problem.
///
/// Unlike the measures tracked by the solvers, the report is computed
/// directly from the problem data and is therefore comparable between
/// different methods.
#[derive(Debug, Clone, Copy, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Report<T: RealField + Copy> {
    /// Primal objective `tr(C X)`.
    primal_objective: T,
    /// Dual objective `bᵗ y`.
    dual_objective: T,
    /// Norm of the primal residual `b − [tr(A_i X)]`.
    primal_infeasibility: T,
    /// Norm of the dual residual `C − S − Σ y_i A_i`.
    dual_infeasibility: T,
    /// Complementarity `tr(X S)`.
    gap: T,
    /// Relative difference of the objectives (see [`relative_gap`]).
    relative_gap: T,
}

impl<T: RealField + Copy> Report<T> {
    /// Analyzes given iterate.
    pub fn new(problem: &SdpProblem<T>, path: &CentralPath<T>) -> Self {
        let primal_objective = problem.primal_objective(path.x());
        let dual_objective = problem.dual_objective(path.y());

        Self {
            primal_objective,
            dual_objective,
            primal_infeasibility: problem.primal_residual(path.x()).norm(),
            dual_infeasibility: problem.dual_residual(path.y(), path.s()).norm(),
            gap: path.complementarity(),
            relative_gap: relative_gap(primal_objective, dual_objective),
        }
    }

    /// Returns `true` if both residuals and the relative gap are below given
    /// tolerance.
    pub fn is_optimal(&self, tolerance: T) -> bool {
        self.primal_infeasibility < tolerance
            && self.dual_infeasibility < tolerance
            && self.relative_gap < tolerance
    }
}
