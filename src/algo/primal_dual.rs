//! Primal-dual path-following method.
//!
//! Starting from a positive definite pair `(X, S)`, the method repeatedly
//! computes the Newton direction towards the point `σμI` of the central path,
//! where `μ = tr(XS)/n` is the current duality gap measure, and moves along it
//! as far as the [step-length rule](crate::step) allows. The primal and dual
//! variables take independent step lengths.
//!
//! The starting point does not need to be feasible, but the method has no way
//! to detect infeasibility and the convergence criterion considers the duality
//! gap only. The residuals are reported in [`PrimalDual::phi`] for diagnostics.
//! For infeasible or badly scaled starting points, the
//! [homogeneous](crate::algo::homogeneous) variant is recommended.
//!
//! # References
//!
//! \[1\] F. Alizadeh, J.-P. A. Haeberly, M. L. Overton: Primal-Dual
//! Interior-Point Methods for Semidefinite Programming: Convergence Rates,
//! Stability and Numerical Results. SIAM Journal on Optimization, 1998.

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{convert, RealField};

use super::Centering;
use crate::{
    core::{CentralPath, SdpProblem, Solver, SolverError, StepStatus},
    newton::{self, Scaling},
    step::{backtrack, psd_bound, step_length},
};

/// Options for [`PrimalDual`] solver.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct PrimalDualOptions<T: RealField + Copy> {
    /// Threshold for the duality gap measure `tr(XS)/n` under which the
    /// method is considered converged. Default: `1e-8`.
    tolerance: T,
    /// Safety factor for the step length in `(0, 1)`. Default: `0.9`.
    gamma: T,
    /// Centering parameter. Default: heuristic (see [`Centering`]).
    centering: Centering<T>,
    /// Maximum number of iterations. Default: `100`.
    max_iters: usize,
    /// Scaling of the search direction. Default: [`Scaling::Aho`].
    scaling: Scaling,
}

impl<T: RealField + Copy> Default for PrimalDualOptions<T> {
    fn default() -> Self {
        Self {
            tolerance: convert(1e-8),
            gamma: convert(0.9),
            centering: Centering::default(),
            max_iters: 100,
            scaling: Scaling::default(),
        }
    }
}

/// Primal-dual path-following solver.
///
/// See [module](self) documentation for more details.
pub struct PrimalDual<'a, T: RealField + Copy> {
    problem: &'a SdpProblem<T>,
    options: PrimalDualOptions<T>,
    path: CentralPath<T>,
    delta: T,
    phi: T,
    iter: usize,
}

impl<'a, T: RealField + Copy> PrimalDual<'a, T> {
    /// Initializes primal-dual solver with default options.
    pub fn new(problem: &'a SdpProblem<T>, initial: CentralPath<T>) -> Result<Self, SolverError> {
        Self::with_options(problem, initial, PrimalDualOptions::default())
    }

    /// Initializes primal-dual solver with given options.
    pub fn with_options(
        problem: &'a SdpProblem<T>,
        initial: CentralPath<T>,
        options: PrimalDualOptions<T>,
    ) -> Result<Self, SolverError> {
        initial.check_dims(problem)?;
        let (delta, phi) = measures(problem, &initial);

        Ok(Self {
            problem,
            options,
            path: initial,
            delta,
            phi,
            iter: 0,
        })
    }

    /// Restarts the method from given point.
    pub fn set_initials(&mut self, initial: CentralPath<T>) -> Result<(), SolverError> {
        initial.check_dims(self.problem)?;
        let (delta, phi) = measures(self.problem, &initial);

        self.path = initial;
        self.delta = delta;
        self.phi = phi;
        self.iter = 0;

        Ok(())
    }

    /// Returns the options of the solver.
    pub fn options(&self) -> &PrimalDualOptions<T> {
        &self.options
    }
}

/// Computes the duality gap measure `tr(XS)/n` and the combined measure `δ +
/// ‖rp‖ + ‖rd‖`.
fn measures<T: RealField + Copy>(problem: &SdpProblem<T>, path: &CentralPath<T>) -> (T, T) {
    let n: T = convert(problem.n() as f64);
    let delta = path.complementarity() / n;

    let rp = problem.primal_residual(path.x());
    let rd = problem.dual_residual(path.y(), path.s());

    (delta, delta + rp.norm() + rd.norm())
}

impl<'a, T: RealField + Copy> Solver<T> for PrimalDual<'a, T> {
    const NAME: &'static str = "Primal-dual";

    type Error = SolverError;

    fn step(&mut self) -> Result<StepStatus, Self::Error> {
        let PrimalDualOptions {
            gamma,
            centering,
            scaling,
            ..
        } = self.options;

        if self.converged() {
            debug!("converged with delta = {}", self.delta);
            return Ok(StepStatus::Converged);
        }

        let sigma = centering.sigma(self.problem.n());
        let direction = newton::primal_dual(self.problem, &self.path, sigma, self.delta, scaling)?;

        let alpha = step_length([psd_bound(self.path.x(), direction.dx(), gamma)?]);
        let alpha = backtrack(self.path.x(), direction.dx(), alpha, gamma);
        let beta = step_length([psd_bound(self.path.s(), direction.ds(), gamma)?]);
        let beta = backtrack(self.path.s(), direction.ds(), beta, gamma);

        let x = self.path.x() + direction.dx() * alpha;
        let y = self.path.y() + direction.dy() * beta;
        let s = self.path.s() + direction.ds() * beta;

        self.path = CentralPath::new(x, y, s);
        self.iter += 1;

        let (delta, phi) = measures(self.problem, &self.path);

        debug!(
            "iteration {}: sigma = {}, alpha = {}, beta = {}, delta = {} -> {}, phi = {}",
            self.iter, sigma, alpha, beta, self.delta, delta, phi
        );

        self.delta = delta;
        self.phi = phi;

        Ok(StepStatus::Advanced)
    }

    fn path(&self) -> &CentralPath<T> {
        &self.path
    }

    fn iter(&self) -> usize {
        self.iter
    }

    fn delta(&self) -> T {
        self.delta
    }

    fn phi(&self) -> T {
        self.phi
    }

    fn converged(&self) -> bool {
        self.delta < self.options.tolerance
    }

    fn max_iters(&self) -> usize {
        self.options.max_iters
    }
}
