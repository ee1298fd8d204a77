//! Testing problems and utilities useful for benchmarking, debugging and smoke
//! testing.
//!
//! [`Trivial`] and [`MaxCut`] are recommended for first tests. Others can be
//! used for specific conditions (e.g., linearly dependent constraints).
//!
//! # References
//!
//! \[1\] M. X. Goemans, D. P. Williamson. Improved approximation algorithms
//! for maximum cut and satisfiability problems using semidefinite
//! programming. Journal of the ACM, 42(6), 1995.
//!
//! \[2\] L. Vandenberghe, S. Boyd. Semidefinite programming. SIAM Review,
//! 38(1), 1996.

#![allow(unused)]

use std::error::Error as StdError;

use nalgebra::{dmatrix, dvector, DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use thiserror::Error;

use crate::core::{CentralPath, SdpProblem, Solver, Termination};

/// Semidefinite program with additional information that is useful for
/// testing solvers.
pub trait TestProblem {
    /// Problem data.
    fn problem(&self) -> SdpProblem<f64>;

    /// Standard initial points for the problem. Using the same initial points
    /// is essential for fair comparison of methods.
    fn initials(&self) -> Vec<CentralPath<f64>> {
        let problem = self.problem();
        let (n, p) = (problem.n(), problem.p());
        vec![
            CentralPath::identity(n, p),
            CentralPath::scaled_identity(n, p, 1000.0),
        ]
    }
}

/// The smallest problem: `min x` subject to `x = 1`, `x ≥ 0`.
///
/// The solution is `X = 1`, `y = 1`, `S = 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trivial;

impl TestProblem for Trivial {
    fn problem(&self) -> SdpProblem<f64> {
        SdpProblem::new(vec![dmatrix![1.0]], dvector![1.0], dmatrix![1.0])
            .expect("problem data are consistent")
    }
}

/// Problem whose two constraints are identical.
///
/// The Schur complement system is singular in every iteration, so the
/// methods are expected to fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicatedConstraints;

impl TestProblem for DuplicatedConstraints {
    fn problem(&self) -> SdpProblem<f64> {
        let a = DMatrix::identity(2, 2);
        SdpProblem::new(vec![a.clone(), a], dvector![1.0, 1.0], DMatrix::identity(2, 2))
            .expect("problem data are consistent")
    }
}

/// Minimum eigenvalue of a symmetric matrix \[2\].
///
/// `min tr(C X)` subject to `tr(X) = 1`. The dual variable `y` at the optimum
/// is the smallest eigenvalue of `C`.
#[derive(Debug, Clone)]
pub struct MinEigenvalue {
    c: DMatrix<f64>,
}

impl MinEigenvalue {
    /// Initializes the problem for given symmetric matrix.
    pub fn new(c: DMatrix<f64>) -> Self {
        assert!(c.is_square(), "matrix must be square");
        Self { c }
    }

    /// Smallest eigenvalue of the matrix.
    pub fn optimum(&self) -> f64 {
        self.c.clone().symmetric_eigenvalues().min()
    }
}

impl Default for MinEigenvalue {
    fn default() -> Self {
        Self::new(dmatrix![
            2.0, 1.0, 0.0;
            1.0, 3.0, 1.0;
            0.0, 1.0, 4.0
        ])
    }
}

impl TestProblem for MinEigenvalue {
    fn problem(&self) -> SdpProblem<f64> {
        let n = self.c.nrows();
        SdpProblem::new(vec![DMatrix::identity(n, n)], dvector![1.0], self.c.clone())
            .expect("problem data are consistent")
    }
}

/// Semidefinite relaxation of the maximum cut problem \[1\].
///
/// `min tr(C X)` subject to `X_ii = 1`, where `C = −L/4` and `L` is the
/// Laplacian of the graph.
#[derive(Debug, Clone)]
pub struct MaxCut {
    laplacian: DMatrix<f64>,
    optimum: Option<f64>,
}

impl MaxCut {
    /// Initializes the problem for a graph with given edges.
    pub fn new(n: usize, edges: &[(usize, usize)]) -> Self {
        assert!(n > 0, "n must be greater than zero");

        let mut laplacian = DMatrix::zeros(n, n);
        for &(i, j) in edges {
            assert!(i != j && i < n && j < n, "invalid edge ({}, {})", i, j);
            laplacian[(i, i)] += 1.0;
            laplacian[(j, j)] += 1.0;
            laplacian[(i, j)] -= 1.0;
            laplacian[(j, i)] -= 1.0;
        }

        Self {
            laplacian,
            optimum: None,
        }
    }

    /// Initializes the problem for the cycle graph on `n` vertices.
    ///
    /// The optimal value is known in closed form.
    pub fn cycle(n: usize) -> Self {
        assert!(n >= 3, "cycle must have at least three vertices");

        let edges = (0..n).map(|i| (i, (i + 1) % n)).collect::<Vec<_>>();
        let n_f = n as f64;
        let optimum = if n % 2 == 0 {
            -n_f
        } else {
            -n_f / 2.0 * (1.0 + (std::f64::consts::PI / n_f).cos())
        };

        Self {
            optimum: Some(optimum),
            ..Self::new(n, &edges)
        }
    }

    /// Optimal value of the relaxation.
    ///
    /// Panics if the value is not known for the graph.
    pub fn optimum(&self) -> f64 {
        self.optimum.expect("optimum is not known for this graph")
    }
}

impl TestProblem for MaxCut {
    fn problem(&self) -> SdpProblem<f64> {
        let n = self.laplacian.nrows();
        let a = (0..n)
            .map(|i| {
                let mut a = DMatrix::zeros(n, n);
                a[(i, i)] = 1.0;
                a
            })
            .collect();

        SdpProblem::new(a, DVector::repeat(n, 1.0), self.laplacian.scale(-0.25))
            .expect("problem data are consistent")
    }
}

/// Randomly generated problem with a strictly feasible primal and dual.
///
/// The constraint matrices are symmetric Gaussian matrices. The right-hand
/// side and the cost are derived from a positive definite primal point and a
/// positive definite dual slack, so that both problems have interior points
/// and the optimum is attained.
#[derive(Debug, Clone)]
pub struct RandomSdp {
    a: Vec<DMatrix<f64>>,
    b: DVector<f64>,
    c: DMatrix<f64>,
}

impl RandomSdp {
    /// Generates a problem with matrices of order `n` and `p` constraints.
    pub fn new(n: usize, p: usize, seed: u64) -> Self {
        assert!(n > 0, "n must be greater than zero");

        let mut rng = StdRng::seed_from_u64(seed);
        let mut gaussian = |rows: usize, cols: usize| {
            DMatrix::<f64>::from_fn(rows, cols, |_, _| rng.sample(StandardNormal))
        };

        let a = (0..p)
            .map(|_| {
                let g = gaussian(n, n);
                (&g + g.transpose()).scale(0.5)
            })
            .collect::<Vec<_>>();

        let m = gaussian(n, n);
        let x = &m * m.transpose() + DMatrix::identity(n, n);

        let r = gaussian(n, n);
        let s = &r * r.transpose() + DMatrix::identity(n, n);
        let y = gaussian(p, 1).column(0).into_owned();

        let b = DVector::from_iterator(p, a.iter().map(|ai| ai.dot(&x)));
        let c = a
            .iter()
            .zip(y.iter())
            .fold(s, |c, (ai, &yi)| c + ai.scale(yi));

        Self { a, b, c }
    }
}

impl TestProblem for RandomSdp {
    fn problem(&self) -> SdpProblem<f64> {
        SdpProblem::new(self.a.clone(), self.b.clone(), self.c.clone())
            .expect("problem data are consistent")
    }
}

/// Solving error of the testing solver driver (see [`solve`]).
#[derive(Debug, Error)]
pub enum TestingError<E: StdError + 'static> {
    /// Error of the solver used.
    #[error("{0}")]
    Inner(#[from] E),
    /// Solver did not converge.
    #[error("solver did not converge")]
    Termination,
}

/// A simple solver driver that can be used in tests.
///
/// Returns the recovered solution if the method converges.
pub fn solve<S: Solver<f64>>(mut solver: S) -> Result<CentralPath<f64>, TestingError<S::Error>>
where
    S::Error: StdError,
{
    match solver.search()? {
        Termination::Converged => Ok(solver.solution()),
        _ => Err(TestingError::Termination),
    }
}

/// Iterate the solver and inspect it in each iteration.
pub fn iter<S: Solver<f64>, G>(mut solver: S, iters: usize, mut inspect: G) -> Result<(), S::Error>
where
    G: FnMut(&S, usize),
{
    for iter in 0..iters {
        solver.step()?;
        inspect(&solver, iter);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    use crate::{
        algo::{HomogeneousSelfDual, PrimalDual},
        core::SolverError,
    };

    #[test]
    fn max_cut_cycle_optimum() {
        assert_abs_diff_eq!(MaxCut::cycle(4).optimum(), -4.0);
        assert_abs_diff_eq!(MaxCut::cycle(5).optimum(), -4.522542485937368, epsilon = 1e-12);
    }

    #[test]
    fn max_cut_cost_is_scaled_laplacian() {
        let problem = MaxCut::cycle(4).problem();

        assert_eq!(problem.n(), 4);
        assert_eq!(problem.p(), 4);
        assert_abs_diff_eq!(problem.cost()[(0, 0)], -0.5);
        assert_abs_diff_eq!(problem.cost()[(0, 1)], 0.25);
        assert_abs_diff_eq!(problem.cost()[(0, 2)], 0.0);
        assert_abs_diff_eq!(problem.cost()[(0, 3)], 0.25);
    }

    #[test]
    fn min_eigenvalue_optimum() {
        assert_abs_diff_eq!(MinEigenvalue::default().optimum(), 3.0 - 3f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn random_problem_is_deterministic() {
        let f = RandomSdp::new(3, 2, 42).problem();
        let g = RandomSdp::new(3, 2, 42).problem();

        assert_eq!(f.rhs(), g.rhs());
        assert_eq!(f.cost(), g.cost());
        assert_eq!(f.p(), 2);
    }

    #[test]
    fn random_problem_dimensions() {
        let mut rng = StdRng::seed_from_u64(7);
        let f = RandomSdp::new(4, 3, rng.gen());
        let problem = f.problem();

        assert_eq!(problem.n(), 4);
        assert_eq!(f.initials().len(), 2);
    }

    #[test]
    fn testing_driver() {
        let problem = Trivial.problem();

        for initial in Trivial.initials() {
            let solver = HomogeneousSelfDual::new(&problem, initial).unwrap();
            let path = solve(solver).unwrap();
            assert_abs_diff_eq!(path.x()[(0, 0)], 1.0, epsilon = 1e-6);
        }

        let problem = DuplicatedConstraints.problem();
        let solver = PrimalDual::new(&problem, CentralPath::identity(2, 2)).unwrap();
        assert!(matches!(
            solve(solver),
            Err(TestingError::Inner(SolverError::Linalg(_)))
        ));
    }

    #[test]
    fn testing_iter() {
        let problem = Trivial.problem();
        let solver = PrimalDual::new(&problem, CentralPath::identity(1, 1)).unwrap();
        let mut count = 0;

        iter(solver, 3, |solver, iter| {
            assert_eq!(solver.iter(), iter + 1);
            count += 1;
        })
        .unwrap();

        assert_eq!(count, 3);
    }
}
