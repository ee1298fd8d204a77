//! High-level API for solving.
//!
//! This module contains the "driver" that encapsulates the state of the
//! method and provides a simple API to run the iterative process.
//!
//! The simplest way of using the driver is to initialize it with the defaults,
//! which uses the [homogeneous self-dual](crate::algo::homogeneous) method
//! started from `X = S = I`, `y = 0`:
//!
//! ```rust
//! use sdpath::nalgebra as na;
//! use sdpath::{SdpProblem, SolverDriver};
//! use na::{dmatrix, dvector};
//!
//! let problem = SdpProblem::<f64>::new(
//!     vec![dmatrix![1.0, 0.0; 0.0, 0.0], dmatrix![0.0, 0.0; 0.0, 1.0]],
//!     dvector![1.0, 1.0],
//!     dmatrix![1.0, 0.5; 0.5, 1.0],
//! )
//! .unwrap();
//!
//! let mut solver = SolverDriver::new(&problem);
//! ```
//!
//! If you need to specify additional settings, use the builder:
//!
//! ```rust
//! use sdpath::nalgebra as na;
//! use sdpath::{algo::PrimalDual, CentralPath, SdpProblem, SolverDriver};
//! use na::{dmatrix, dvector};
//!
//! # let problem = SdpProblem::<f64>::new(
//! #     vec![dmatrix![1.0, 0.0; 0.0, 0.0], dmatrix![0.0, 0.0; 0.0, 1.0]],
//! #     dvector![1.0, 1.0],
//! #     dmatrix![1.0, 0.5; 0.5, 1.0],
//! # )
//! # .unwrap();
//! #
//! let mut solver = SolverDriver::builder(&problem)
//!     .with_initial(CentralPath::scaled_identity(2, 2, 10.0))
//!     .with_algo(PrimalDual::new)
//!     .build()
//!     .expect("valid initial point");
//! ```
//!
//! Once you have the solver, you can run the method until convergence:
//!
//! ```rust
//! # use sdpath::nalgebra as na;
//! # use sdpath::{SdpProblem, SolverDriver};
//! # use na::{dmatrix, dvector};
//! #
//! # let problem = SdpProblem::<f64>::new(
//! #     vec![dmatrix![1.0, 0.0; 0.0, 0.0], dmatrix![0.0, 0.0; 0.0, 1.0]],
//! #     dvector![1.0, 1.0],
//! #     dmatrix![1.0, 0.5; 0.5, 1.0],
//! # )
//! # .unwrap();
//! #
//! # let mut solver = SolverDriver::new(&problem);
//! #
//! let solution = solver.solve().expect("no solver error");
//! assert!(solution.termination().is_converged());
//!
//! let x = solution.path().x();
//! assert!((problem.primal_objective(x) - 1.0).abs() < 1e-6);
//! ```
//!
//! or with a custom stopping condition:
//!
//! ```rust
//! # use sdpath::nalgebra as na;
//! # use sdpath::{SdpProblem, SolverDriver};
//! # use na::{dmatrix, dvector};
//! #
//! # let problem = SdpProblem::<f64>::new(
//! #     vec![dmatrix![1.0, 0.0; 0.0, 0.0], dmatrix![0.0, 0.0; 0.0, 1.0]],
//! #     dvector![1.0, 1.0],
//! #     dmatrix![1.0, 0.5; 0.5, 1.0],
//! # )
//! # .unwrap();
//! #
//! # let mut solver = SolverDriver::new(&problem);
//! #
//! let solution = solver
//!     .find(|state| state.delta() < 1e-4 || state.iter() >= 50)
//!     .expect("no solver error");
//! ```
//!
//! If you need more control over the iteration process, you can do the
//! iterations manually:
//!
//! ```rust
//! # use sdpath::nalgebra as na;
//! # use sdpath::{SdpProblem, SolverDriver, StepStatus};
//! # use na::{dmatrix, dvector};
//! #
//! # let problem = SdpProblem::<f64>::new(
//! #     vec![dmatrix![1.0, 0.0; 0.0, 0.0], dmatrix![0.0, 0.0; 0.0, 1.0]],
//! #     dvector![1.0, 1.0],
//! #     dmatrix![1.0, 0.5; 0.5, 1.0],
//! # )
//! # .unwrap();
//! #
//! # let mut solver = SolverDriver::new(&problem);
//! #
//! loop {
//!     let status = solver.next().expect("no solver error");
//!     // ...
//!     if status == StepStatus::Converged {
//!         break;
//!     }
//! }
//! ```

use getset::{CopyGetters, Getters};
use nalgebra::RealField;

use crate::{
    algo::HomogeneousSelfDual,
    analysis::Report,
    core::{CentralPath, SdpProblem, Solver, SolverError, StepStatus, Termination},
};

type Factory<'a, T, A> =
    Box<dyn FnOnce(&'a SdpProblem<T>, CentralPath<T>) -> Result<A, SolverError> + 'a>;

/// Builder for the [`SolverDriver`].
pub struct SolverBuilder<'a, T: RealField + Copy, A> {
    problem: &'a SdpProblem<T>,
    initial: CentralPath<T>,
    factory: Factory<'a, T, A>,
}

impl<'a, T: RealField + Copy> SolverBuilder<'a, T, HomogeneousSelfDual<'a, T>> {
    fn new(problem: &'a SdpProblem<T>) -> Self {
        Self {
            problem,
            initial: CentralPath::identity(problem.n(), problem.p()),
            factory: Box::new(HomogeneousSelfDual::new),
        }
    }
}

impl<'a, T: RealField + Copy, A> SolverBuilder<'a, T, A> {
    /// Sets the initial point from which the iterative process starts.
    pub fn with_initial(mut self, initial: CentralPath<T>) -> Self {
        self.initial = initial;
        self
    }

    /// Sets specific algorithm to be used.
    ///
    /// This builder method accepts a closure that takes the reference to the
    /// problem and the initial point. For the algorithms in sdpath, you can
    /// simply pass the `new` constructor directly (e.g., `PrimalDual::new`).
    pub fn with_algo<A2, FA>(self, factory: FA) -> SolverBuilder<'a, T, A2>
    where
        FA: FnOnce(&'a SdpProblem<T>, CentralPath<T>) -> Result<A2, SolverError> + 'a,
    {
        SolverBuilder {
            problem: self.problem,
            initial: self.initial,
            factory: Box::new(factory),
        }
    }

    /// Builds the [`SolverDriver`].
    ///
    /// Fails if the algorithm rejects the initial point.
    pub fn build(self) -> Result<SolverDriver<'a, T, A>, SolverError> {
        let Self {
            problem,
            initial,
            factory,
        } = self;

        let algo = factory(problem, initial)?;
        Ok(SolverDriver { problem, algo })
    }
}

/// The driver for the process of solving a semidefinite program.
///
/// For default settings, use [`SolverDriver::new`]. For more flexibility, use
/// [`SolverDriver::builder`]. For the usage of the driver, see [module](self)
/// documentation.
pub struct SolverDriver<'a, T: RealField + Copy, A> {
    problem: &'a SdpProblem<T>,
    algo: A,
}

impl<'a, T: RealField + Copy> SolverDriver<'a, T, HomogeneousSelfDual<'a, T>> {
    /// Returns the builder for specifying additional settings.
    pub fn builder(problem: &'a SdpProblem<T>) -> SolverBuilder<'a, T, HomogeneousSelfDual<'a, T>> {
        SolverBuilder::new(problem)
    }

    /// Initializes the driver with the default settings.
    pub fn new(problem: &'a SdpProblem<T>) -> Self {
        Self {
            problem,
            algo: HomogeneousSelfDual::with_identity(problem),
        }
    }
}

impl<'a, T: RealField + Copy, A> SolverDriver<'a, T, A> {
    /// Returns reference to the used algorithm.
    pub fn algo(&self) -> &A {
        &self.algo
    }

    /// Returns reference to the solved problem.
    pub fn problem(&self) -> &SdpProblem<T> {
        self.problem
    }
}

impl<'a, T: RealField + Copy, A: Solver<T>> SolverDriver<'a, T, A> {
    /// Does one iteration of the process.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<StepStatus, A::Error> {
        self.algo.step()
    }

    /// Runs the iterative process until convergence or until the maximum
    /// number of iterations is exhausted.
    pub fn solve(&mut self) -> Result<Solution<T>, A::Error> {
        let termination = self.algo.search()?;
        Ok(self.solution(termination))
    }

    /// Runs the iterative process until given stopping criterion is satisfied,
    /// the method converges or the maximum number of iterations is exhausted.
    pub fn find<C>(&mut self, stop: C) -> Result<Solution<T>, A::Error>
    where
        C: Fn(IterState<'_, T>) -> bool,
    {
        loop {
            if self.next()? == StepStatus::Converged {
                return Ok(self.solution(Termination::Converged));
            }

            let state = IterState {
                path: self.algo.path(),
                delta: self.algo.delta(),
                phi: self.algo.phi(),
                iter: self.algo.iter(),
            };

            if stop(state) {
                return Ok(self.solution(Termination::Stopped));
            }

            if self.algo.iter() >= self.algo.max_iters() {
                let termination = if self.algo.converged() {
                    Termination::Converged
                } else {
                    Termination::MaxIterationsReached
                };

                return Ok(self.solution(termination));
            }
        }
    }

    /// Computes diagnostics of the current solution.
    pub fn report(&self) -> Report<T> {
        Report::new(self.problem, &self.algo.solution())
    }

    /// Returns the name of the used solver.
    pub fn name(&self) -> &str {
        A::NAME
    }

    fn solution(&self, termination: Termination) -> Solution<T> {
        Solution {
            path: self.algo.solution(),
            iterations: self.algo.iter(),
            delta: self.algo.delta(),
            phi: self.algo.phi(),
            termination,
        }
    }
}

/// Result of the iterative process.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Solution<T: RealField + Copy> {
    /// Approximate solution of the problem.
    #[getset(get = "pub")]
    path: CentralPath<T>,
    /// Number of performed iterations.
    #[getset(get_copy = "pub")]
    iterations: usize,
    /// Final duality gap measure.
    #[getset(get_copy = "pub")]
    delta: T,
    /// Final combined residual measure.
    #[getset(get_copy = "pub")]
    phi: T,
    /// Reason why the process ended.
    #[getset(get_copy = "pub")]
    termination: Termination,
}

impl<T: RealField + Copy> Solution<T> {
    /// Returns the solution `(X, y, S)`, consuming `self`.
    pub fn into_path(self) -> CentralPath<T> {
        self.path
    }
}

/// State of the current iteration.
pub struct IterState<'a, T: RealField + Copy> {
    path: &'a CentralPath<T>,
    delta: T,
    phi: T,
    iter: usize,
}

impl<'a, T: RealField + Copy> IterState<'a, T> {
    /// Returns reference to the current iterate in the variables of the
    /// method.
    pub fn path(&self) -> &CentralPath<T> {
        self.path
    }

    /// Returns the duality gap measure.
    pub fn delta(&self) -> T {
        self.delta
    }

    /// Returns the combined residual measure.
    pub fn phi(&self) -> T {
        self.phi
    }

    /// Returns the current iteration number.
    pub fn iter(&self) -> usize {
        self.iter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    use crate::{
        algo::{
            homogeneous::HomogeneousOptions, primal_dual::PrimalDualOptions, PrimalDual,
        },
        linalg::LinalgError,
        newton::Scaling,
        testing::*,
    };

    #[test]
    fn solver_basic_use_case() {
        let f = MaxCut::cycle(5);
        let problem = f.problem();

        let mut solver = SolverDriver::new(&problem);
        let solution = solver.solve().unwrap();

        assert_eq!(solution.termination(), Termination::Converged);
        assert!(solution.iterations() > 0);
        assert_abs_diff_eq!(
            problem.primal_objective(solution.path().x()),
            f.optimum(),
            epsilon = 1e-6
        );
        assert_eq!(solver.name(), "Homogeneous self-dual");
    }

    #[test]
    fn solver_custom_algo() {
        let f = MinEigenvalue::default();
        let problem = f.problem();

        let mut solver = SolverDriver::builder(&problem)
            .with_algo(|problem, initial| {
                let mut options = PrimalDualOptions::default();
                options.set_scaling(Scaling::Hkm);
                PrimalDual::with_options(problem, initial, options)
            })
            .build()
            .unwrap();

        let solution = solver.solve().unwrap();

        assert!(solution.termination().is_converged());
        assert_abs_diff_eq!(solution.path().y()[0], f.optimum(), epsilon = 1e-6);
        assert_eq!(solver.name(), "Primal-dual");
        assert!(solver.report().relative_gap() < 1e-6);
    }

    #[test]
    fn solver_custom_initial_and_options() {
        let problem = Trivial.problem();

        let mut solver = SolverDriver::builder(&problem)
            .with_initial(CentralPath::scaled_identity(1, 1, 1000.0))
            .with_algo(|problem, initial| {
                let mut options = HomogeneousOptions::default();
                options.set_scaling(Scaling::Hkm);
                HomogeneousSelfDual::with_options(problem, initial, options)
            })
            .build()
            .unwrap();

        let solution = solver.solve().unwrap();

        assert!(solution.termination().is_converged());
        assert!(!solver.algo().is_infeasible());
        assert_abs_diff_eq!(solution.path().x()[(0, 0)], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn solver_invalid_initial() {
        let problem = Trivial.problem();

        let result = SolverDriver::builder(&problem)
            .with_initial(CentralPath::identity(2, 1))
            .build();

        assert!(matches!(result, Err(SolverError::Problem(_))));
    }

    #[test]
    fn solver_custom_stop() {
        let problem = Trivial.problem();
        let mut solver = SolverDriver::new(&problem);

        let solution = solver.find(|state| state.iter() >= 2).unwrap();

        assert_eq!(solution.termination(), Termination::Stopped);
        assert_eq!(solution.iterations(), 2);
    }

    #[test]
    fn solver_stops_on_convergence_in_find() {
        let problem = Trivial.problem();
        let mut solver = SolverDriver::new(&problem);

        let solution = solver.find(|_| false).unwrap();

        assert_eq!(solution.termination(), Termination::Converged);
        assert!(solution.delta() < 1e-8 || solution.phi() < 1e-8);
    }

    #[test]
    fn solver_find_respects_max_iters() {
        let problem = Trivial.problem();

        let mut solver = SolverDriver::builder(&problem)
            .with_algo(|problem, initial| {
                let mut options = PrimalDualOptions::default();
                options.set_max_iters(3);
                PrimalDual::with_options(problem, initial, options)
            })
            .build()
            .unwrap();

        let solution = solver.find(|_| false).unwrap();

        assert_eq!(solution.termination(), Termination::MaxIterationsReached);
        assert_eq!(solution.iterations(), 3);
    }

    #[test]
    fn solver_error() {
        let problem = DuplicatedConstraints.problem();
        let mut solver = SolverDriver::new(&problem);

        assert_eq!(
            solver.solve().unwrap_err(),
            SolverError::Linalg(LinalgError::Singular)
        );
    }
}
