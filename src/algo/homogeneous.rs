//! Homogeneous self-dual path-following method.
//!
//! The problem is embedded into a larger self-dual system (see
//! [`Embedding`](crate::newton::Embedding)) with homogenizing variables `τ`
//! and `κ`. The embedded system always has a strictly feasible interior
//! point, so the method can start from any positive definite pair `(X, S)`
//! regardless of feasibility or scaling.
//!
//! In every iteration, the method computes the Newton direction of the
//! embedding, reducing its residuals by the factor `1 − σ` and centering the
//! complementarity pairs `(X, S)` and `(τ, κ)` towards `σμ`, where
//!
//! ```text
//! μ = (tr(XS) + τκ) / (n + 1).
//! ```
//!
//! The step length is the smaller of the primal bound (from `X`, `τ`, `κ`)
//! and the dual bound (from `S`, `τ`, `κ`), preferring the primal bound on a
//! tie. A common step makes the residuals of the embedding shrink by exactly
//! `1 − α(1 − σ)`.
//!
//! The method stops when either the gap measure `μ` or the relative residual
//! measure `φ` falls below the tolerance. The solution of the original problem
//! is then `(X, y, S) / τ`. If `κ` dominates `τ` at that point, the problem is
//! most likely infeasible, see [`HomogeneousSelfDual::infeasibility`].
//!
//! # References
//!
//! \[1\] F. A. Potra, R. Sheng: On Homogeneous Interior-Point Algorithms for
//! Semidefinite Programming. Optimization Methods and Software, 1998.

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{convert, RealField};
use num_traits::{One, Zero};

use super::Centering;
use crate::{
    core::{CentralPath, SdpProblem, Solver, SolverError, StepStatus},
    newton::{self, Embedding, Scaling},
    step::{backtrack, psd_bound, ratio_bound, step_length},
};

/// Options for [`HomogeneousSelfDual`] solver.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct HomogeneousOptions<T: RealField + Copy> {
    /// Threshold for the gap measure and for the relative residual measure
    /// under which the method is considered converged. Default: `1e-8`.
    tolerance: T,
    /// Safety factor for the step length in `(0, 1)`. Default: `0.9`.
    gamma: T,
    /// Centering parameter. Default: heuristic (see [`Centering`]).
    centering: Centering<T>,
    /// Maximum number of iterations. Default: `100`.
    max_iters: usize,
    /// Scaling of the search direction. Default: [`Scaling::Aho`].
    scaling: Scaling,
    /// Initial value of `τ`. Default: `0.1`.
    tau_init: T,
    /// Initial value of `κ`. Default: `0.1`.
    kappa_init: T,
}

impl<T: RealField + Copy> Default for HomogeneousOptions<T> {
    fn default() -> Self {
        Self {
            tolerance: convert(1e-8),
            gamma: convert(0.9),
            centering: Centering::default(),
            max_iters: 100,
            scaling: Scaling::default(),
            tau_init: convert(0.1),
            kappa_init: convert(0.1),
        }
    }
}

/// Kind of infeasibility detected by [`HomogeneousSelfDual`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infeasibility {
    /// The primal problem is infeasible (`bᵗy > 0` with `Σ y_i A_i ⪯ 0`).
    Primal,
    /// The dual problem is infeasible (`tr(CX) < 0` with `tr(A_i X) = 0`).
    Dual,
}

/// Homogeneous self-dual path-following solver.
///
/// See [module](self) documentation for more details.
pub struct HomogeneousSelfDual<'a, T: RealField + Copy> {
    problem: &'a SdpProblem<T>,
    embedding: Embedding<T>,
    options: HomogeneousOptions<T>,
    path: CentralPath<T>,
    tau: T,
    kappa: T,
    delta: T,
    phi_primal: T,
    phi_dual: T,
    primal_norm_init: T,
    dual_norm_init: T,
    iter: usize,
}

impl<'a, T: RealField + Copy> HomogeneousSelfDual<'a, T> {
    /// Initializes homogeneous self-dual solver with default options.
    pub fn new(problem: &'a SdpProblem<T>, initial: CentralPath<T>) -> Result<Self, SolverError> {
        Self::with_options(problem, initial, HomogeneousOptions::default())
    }

    /// Initializes homogeneous self-dual solver with given options.
    pub fn with_options(
        problem: &'a SdpProblem<T>,
        initial: CentralPath<T>,
        options: HomogeneousOptions<T>,
    ) -> Result<Self, SolverError> {
        initial.check_dims(problem)?;
        Ok(Self::init(problem, initial, options))
    }

    /// Initializes homogeneous self-dual solver with default options, starting
    /// from `X = S = I`, `y = 0`.
    pub fn with_identity(problem: &'a SdpProblem<T>) -> Self {
        let initial = CentralPath::identity(problem.n(), problem.p());
        Self::init(problem, initial, HomogeneousOptions::default())
    }

    fn init(
        problem: &'a SdpProblem<T>,
        initial: CentralPath<T>,
        options: HomogeneousOptions<T>,
    ) -> Self {
        let mut solver = Self {
            problem,
            embedding: Embedding::new(problem),
            tau: options.tau_init,
            kappa: options.kappa_init,
            options,
            path: initial,
            delta: T::zero(),
            phi_primal: T::one(),
            phi_dual: T::one(),
            primal_norm_init: T::one(),
            dual_norm_init: T::one(),
            iter: 0,
        };

        solver.restart();
        solver
    }

    /// Restarts the method from given point. The homogenizing variables are
    /// reset to their initial values from the options.
    pub fn set_initials(&mut self, initial: CentralPath<T>) -> Result<(), SolverError> {
        initial.check_dims(self.problem)?;
        self.path = initial;
        self.restart();
        Ok(())
    }

    fn restart(&mut self) {
        self.tau = self.options.tau_init;
        self.kappa = self.options.kappa_init;
        self.iter = 0;

        let (primal_norm, dual_norm) = self.residual_norms();

        // A zero initial residual would make the ratio undefined.
        self.primal_norm_init = if primal_norm.is_zero() {
            T::one()
        } else {
            primal_norm
        };
        self.dual_norm_init = if dual_norm.is_zero() {
            T::one()
        } else {
            dual_norm
        };

        self.update_measures(primal_norm, dual_norm);
    }

    fn residual_norms(&self) -> (T, T) {
        let residuals = self.embedding.residuals(&self.path, self.tau, self.kappa);
        (residuals.primal().norm(), residuals.dual().norm())
    }

    fn update_measures(&mut self, primal_norm: T, dual_norm: T) {
        let n1: T = convert((self.problem.n() + 1) as f64);

        self.delta = (self.path.complementarity() + self.tau * self.kappa) / n1;
        self.phi_primal = primal_norm / self.primal_norm_init;
        self.phi_dual = dual_norm / self.dual_norm_init;
    }

    /// Returns the options of the solver.
    pub fn options(&self) -> &HomogeneousOptions<T> {
        &self.options
    }

    /// Current value of the homogenizing variable `τ`.
    pub fn tau(&self) -> T {
        self.tau
    }

    /// Current value of the homogenizing variable `κ`.
    pub fn kappa(&self) -> T {
        self.kappa
    }

    /// Norm of the primal residual of the embedding relative to its initial
    /// value.
    pub fn phi_primal(&self) -> T {
        self.phi_primal
    }

    /// Norm of the dual residual of the embedding relative to its initial
    /// value.
    pub fn phi_dual(&self) -> T {
        self.phi_dual
    }

    /// Returns `true` if `κ > τ`, which indicates that the problem is
    /// infeasible rather than solved.
    pub fn is_infeasible(&self) -> bool {
        self.kappa > self.tau
    }

    /// Classifies the infeasibility of the problem if the current iterate
    /// indicates one.
    pub fn infeasibility(&self) -> Option<Infeasibility> {
        if !self.is_infeasible() {
            return None;
        }

        if self.problem.dual_objective(self.path.y()) > T::zero() {
            Some(Infeasibility::Primal)
        } else if self.problem.primal_objective(self.path.x()) < T::zero() {
            Some(Infeasibility::Dual)
        } else {
            None
        }
    }
}

impl<'a, T: RealField + Copy> Solver<T> for HomogeneousSelfDual<'a, T> {
    const NAME: &'static str = "Homogeneous self-dual";

    type Error = SolverError;

    fn step(&mut self) -> Result<StepStatus, Self::Error> {
        let HomogeneousOptions {
            gamma,
            centering,
            scaling,
            ..
        } = self.options;

        if self.converged() {
            debug!(
                "converged with delta = {}, phi = {}, tau = {}, kappa = {}",
                self.delta,
                self.phi(),
                self.tau,
                self.kappa
            );
            return Ok(StepStatus::Converged);
        }

        let sigma = centering.sigma(self.problem.n());
        let direction = newton::homogeneous(
            &self.embedding,
            &self.path,
            self.tau,
            self.kappa,
            sigma,
            self.delta,
            scaling,
        )?;

        let tau_bound = ratio_bound(self.tau, direction.dtau(), gamma);
        let kappa_bound = ratio_bound(self.kappa, direction.dkappa(), gamma);

        let alpha_primal = step_length([
            psd_bound(self.path.x(), direction.dx(), gamma)?,
            tau_bound,
            kappa_bound,
        ]);
        let alpha_dual = step_length([
            psd_bound(self.path.s(), direction.ds(), gamma)?,
            tau_bound,
            kappa_bound,
        ]);

        let alpha = if alpha_dual < alpha_primal {
            alpha_dual
        } else {
            alpha_primal
        };
        let alpha = backtrack(self.path.x(), direction.dx(), alpha, gamma);
        let alpha = backtrack(self.path.s(), direction.ds(), alpha, gamma);

        let x = self.path.x() + direction.dx() * alpha;
        let y = self.path.y() + direction.dy() * alpha;
        let s = self.path.s() + direction.ds() * alpha;

        self.path = CentralPath::new(x, y, s);
        self.tau += direction.dtau() * alpha;
        self.kappa += direction.dkappa() * alpha;
        self.iter += 1;

        let (primal_norm, dual_norm) = self.residual_norms();
        self.update_measures(primal_norm, dual_norm);

        debug!(
            "iteration {}: sigma = {}, alpha = {} (primal = {}, dual = {}), delta = {}, phi = {}, tau = {}, kappa = {}",
            self.iter,
            sigma,
            alpha,
            alpha_primal,
            alpha_dual,
            self.delta,
            self.phi(),
            self.tau,
            self.kappa
        );

        Ok(StepStatus::Advanced)
    }

    fn path(&self) -> &CentralPath<T> {
        &self.path
    }

    fn solution(&self) -> CentralPath<T> {
        self.path.scaled(T::one() / self.tau)
    }

    fn iter(&self) -> usize {
        self.iter
    }

    fn delta(&self) -> T {
        self.delta
    }

    fn phi(&self) -> T {
        self.phi_primal.max(self.phi_dual)
    }

    fn converged(&self) -> bool {
        let tolerance = self.options.tolerance;
        self.delta < tolerance || self.phi() < tolerance
    }

    fn max_iters(&self) -> usize {
        self.options.max_iters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use nalgebra::{dmatrix, dvector};

    use crate::{
        algo::PrimalDual,
        analysis::relative_gap,
        core::Termination,
        linalg::{min_eigenvalue, LinalgError},
        step::is_interior,
        testing::*,
    };

    #[test]
    fn badly_scaled_start_matches_primal_dual() {
        let problem = Trivial.problem();

        let mut reference = PrimalDual::new(&problem, CentralPath::identity(1, 1)).unwrap();
        assert_eq!(reference.search().unwrap(), Termination::Converged);

        let initial = CentralPath::scaled_identity(1, 1, 1000.0);
        let mut solver = HomogeneousSelfDual::new(&problem, initial).unwrap();
        assert_eq!(solver.search().unwrap(), Termination::Converged);
        assert!(!solver.is_infeasible());

        let expected = reference.solution();
        let actual = solver.solution();

        assert_abs_diff_eq!(actual.x()[(0, 0)], expected.x()[(0, 0)], epsilon = 1e-6);
        assert_abs_diff_eq!(actual.y()[0], expected.y()[0], epsilon = 1e-6);
        assert_abs_diff_eq!(actual.s()[(0, 0)], expected.s()[(0, 0)], epsilon = 1e-6);
    }

    #[test]
    fn residuals_decrease_and_homogenizing_variables_stay_positive() {
        let f = MaxCut::cycle(5);
        let problem = f.problem();

        for scaling in [Scaling::Aho, Scaling::Hkm] {
            let mut options = HomogeneousOptions::default();
            options.set_scaling(scaling);

            let initial = CentralPath::identity(problem.n(), problem.p());
            let mut solver = HomogeneousSelfDual::with_options(&problem, initial, options).unwrap();
            let mut phi = solver.phi();

            assert_abs_diff_eq!(phi, 1.0);

            while solver.step().unwrap() == StepStatus::Advanced {
                let path = solver.path();

                assert!(min_eigenvalue(path.x(), 1e-15).unwrap() > 0.0);
                assert!(min_eigenvalue(path.s(), 1e-15).unwrap() > 0.0);
                assert!(solver.tau() > 0.0);
                assert!(solver.kappa() > 0.0);

                assert!(solver.phi() <= phi * (1.0 + 1e-9));
                phi = solver.phi();

                assert!(solver.iter() < 100);
            }

            assert!(!solver.is_infeasible());
            assert_abs_diff_eq!(
                problem.primal_objective(solver.solution().x()),
                f.optimum(),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn random_problems() {
        for seed in 0..5 {
            let f = RandomSdp::new(3, 3, seed);
            let problem = f.problem();

            for scale in [1.0, 1000.0] {
                let initial = CentralPath::scaled_identity(problem.n(), problem.p(), scale);
                let mut solver = HomogeneousSelfDual::new(&problem, initial).unwrap();

                assert_eq!(solver.search().unwrap(), Termination::Converged);
                assert!(!solver.is_infeasible());
                assert_eq!(solver.infeasibility(), None);

                let solution = solver.solution();
                let gap = relative_gap(
                    problem.primal_objective(solution.x()),
                    problem.dual_objective(solution.y()),
                );
                assert!(gap < 1e-6, "seed {}: relative gap {}", seed, gap);
            }
        }
    }

    #[test]
    fn random_problem_iterates_are_interior() {
        let f = RandomSdp::new(3, 3, 2);
        let problem = f.problem();

        let initial = CentralPath::identity(problem.n(), problem.p());
        let mut solver = HomogeneousSelfDual::new(&problem, initial).unwrap();

        while solver.step().unwrap() == StepStatus::Advanced {
            assert!(is_interior(solver.path().x()));
            assert!(is_interior(solver.path().s()));
            assert!(solver.iter() < solver.max_iters());
        }
    }

    #[test]
    fn min_eigenvalue_problem() {
        let f = MinEigenvalue::default();
        let problem = f.problem();
        let mut solver = HomogeneousSelfDual::with_identity(&problem);

        assert_eq!(solver.search().unwrap(), Termination::Converged);
        assert_abs_diff_eq!(solver.solution().y()[0], f.optimum(), epsilon = 1e-6);
    }

    #[test]
    fn primal_infeasible() {
        // X = −1 is the only point satisfying the constraint.
        let problem = SdpProblem::new(vec![dmatrix![1.0]], dvector![-1.0], dmatrix![1.0]).unwrap();
        let mut solver = HomogeneousSelfDual::with_identity(&problem);

        solver.search().unwrap();

        assert!(solver.is_infeasible());
        assert_eq!(solver.infeasibility(), Some(Infeasibility::Primal));
    }

    #[test]
    fn dual_infeasible() {
        // The primal objective is unbounded along X = diag(1, t).
        let problem = SdpProblem::new(
            vec![dmatrix![1.0, 0.0; 0.0, 0.0]],
            dvector![1.0],
            dmatrix![0.0, 0.0; 0.0, -1.0],
        )
        .unwrap();
        let mut solver = HomogeneousSelfDual::with_identity(&problem);

        solver.search().unwrap();

        assert!(solver.is_infeasible());
        assert_eq!(solver.infeasibility(), Some(Infeasibility::Dual));
    }

    #[test]
    fn duplicated_constraints() {
        let problem = DuplicatedConstraints.problem();
        let mut solver = HomogeneousSelfDual::with_identity(&problem);

        assert_eq!(
            solver.search(),
            Err(SolverError::Linalg(LinalgError::Singular))
        );
    }

    #[test]
    fn restart_resets_homogenizing_variables() {
        let problem = Trivial.problem();
        let mut options = HomogeneousOptions::default();
        options.set_tau_init(0.5).set_kappa_init(0.2);

        let mut solver =
            HomogeneousSelfDual::with_options(&problem, CentralPath::identity(1, 1), options)
                .unwrap();
        assert_eq!(solver.tau(), 0.5);
        assert_eq!(solver.kappa(), 0.2);
        assert_abs_diff_eq!(solver.delta(), 0.55);

        solver.search().unwrap();
        assert!(solver.iter() > 0);

        solver
            .set_initials(CentralPath::scaled_identity(1, 1, 2.0))
            .unwrap();
        assert_eq!(solver.iter(), 0);
        assert_eq!(solver.tau(), 0.5);
        assert_eq!(solver.kappa(), 0.2);
        assert_abs_diff_eq!(solver.phi(), 1.0);
    }
}
