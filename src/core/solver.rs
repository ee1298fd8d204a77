use nalgebra::RealField;
use thiserror::Error;

use super::{path::CentralPath, problem::ProblemError};
use crate::linalg::LinalgError;

/// Outcome of a single [`Solver::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The iterate was updated.
    Advanced,
    /// The convergence criterion is satisfied and the iterate was left
    /// unchanged.
    Converged,
}

/// Reason why the iterative process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The convergence criterion of the method is satisfied.
    Converged,
    /// The maximum number of iterations was exhausted without convergence.
    MaxIterationsReached,
    /// A user-supplied stopping condition was satisfied (see
    /// [`SolverDriver::find`](crate::SolverDriver::find)).
    Stopped,
}

impl Termination {
    /// Returns `true` if the method converged.
    pub fn is_converged(&self) -> bool {
        matches!(self, Termination::Converged)
    }
}

/// Error that aborts the iterative process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// A linear-algebra primitive failed, most notably when the Schur
    /// complement is singular.
    #[error("{0}")]
    Linalg(#[from] LinalgError),
    /// The problem data or the initial point are invalid.
    #[error("{0}")]
    Problem(#[from] ProblemError),
}

/// Interface of an interior-point method.
///
/// A solver owns its current iterate and advances it by [`Solver::step`]. The
/// whole process is run by [`Solver::search`], but the caller can also do the
/// steps manually to get full control, for example to implement cancellation
/// or custom stopping conditions.
///
/// ## Implementing a solver
///
/// Here is a "solver" that never moves and reports convergence when it starts
/// at the optimum of the problem.
///
/// ```rust
/// use sdpath::nalgebra as na;
/// use sdpath::{CentralPath, Solver, StepStatus};
/// use na::{dmatrix, dvector};
///
/// struct Stationary {
///     path: CentralPath<f64>,
///     iter: usize,
/// }
///
/// impl Solver<f64> for Stationary {
///     const NAME: &'static str = "Stationary";
///     type Error = std::convert::Infallible;
///
///     fn step(&mut self) -> Result<StepStatus, Self::Error> {
///         if self.converged() {
///             return Ok(StepStatus::Converged);
///         }
///
///         self.iter += 1;
///         Ok(StepStatus::Advanced)
///     }
///
///     fn path(&self) -> &CentralPath<f64> {
///         &self.path
///     }
///
///     fn iter(&self) -> usize {
///         self.iter
///     }
///
///     fn delta(&self) -> f64 {
///         self.path.complementarity()
///     }
///
///     fn phi(&self) -> f64 {
///         0.0
///     }
///
///     fn converged(&self) -> bool {
///         self.delta() < 1e-8
///     }
///
///     fn max_iters(&self) -> usize {
///         10
///     }
/// }
///
/// let path = CentralPath::new(dmatrix![1.0], dvector![1.0], dmatrix![0.0]);
///
/// let mut solver = Stationary { path, iter: 0 };
/// assert!(solver.search().unwrap().is_converged());
/// ```
pub trait Solver<T: RealField + Copy> {
    /// Name of the solver.
    const NAME: &'static str;

    /// Error while computing the next step.
    type Error;

    /// Performs one iteration of the method.
    ///
    /// If the convergence criterion is already satisfied at the current
    /// iterate, nothing is done and [`StepStatus::Converged`] is returned.
    fn step(&mut self) -> Result<StepStatus, Self::Error>;

    /// Current iterate in the variables of the method.
    fn path(&self) -> &CentralPath<T>;

    /// Approximate solution of the original problem recovered from the current
    /// iterate.
    fn solution(&self) -> CentralPath<T> {
        self.path().clone()
    }

    /// Number of performed iterations.
    fn iter(&self) -> usize;

    /// Duality gap measure of the current iterate.
    fn delta(&self) -> T;

    /// Combined residual measure of the current iterate.
    fn phi(&self) -> T;

    /// Returns `true` if the convergence criterion is satisfied at the current
    /// iterate.
    fn converged(&self) -> bool;

    /// Maximum number of iterations performed by [`Solver::search`].
    fn max_iters(&self) -> usize;

    /// Runs the iterations until convergence or until the maximum number of
    /// iterations is exhausted.
    fn search(&mut self) -> Result<Termination, Self::Error> {
        while self.iter() < self.max_iters() {
            if self.step()? == StepStatus::Converged {
                return Ok(Termination::Converged);
            }
        }

        if self.converged() {
            Ok(Termination::Converged)
        } else {
            Ok(Termination::MaxIterationsReached)
        }
    }
}
