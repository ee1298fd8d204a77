use std::fmt;

use approx::RelativeEq;
use getset::Getters;
use nalgebra::{DMatrix, DVector, RealField};
use thiserror::Error;

use crate::linalg::{smat, svec, svec_dim};

/// Identification of a matrix in the problem data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMatrix {
    /// Constraint matrix `A_i` with given zero-based index.
    Constraint(usize),
    /// Cost matrix `C`.
    Cost,
}

impl fmt::Display for DataMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMatrix::Constraint(index) => write!(f, "constraint matrix {}", index),
            DataMatrix::Cost => write!(f, "cost matrix"),
        }
    }
}

/// Error when the problem data or the iterate are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// The order of the matrices is zero.
    #[error("matrix order must be positive")]
    EmptyDimension,
    /// There are no constraints.
    #[error("at least one constraint is required")]
    NoConstraints,
    /// A matrix is not square of the problem order.
    #[error("{0} is not a square matrix of order {1}")]
    InvalidShape(DataMatrix, usize),
    /// The right-hand side does not have one entry per constraint.
    #[error("right-hand side has length {0}, expected {1}")]
    RhsLength(usize, usize),
    /// A matrix is not symmetric.
    #[error("{0} is not symmetric")]
    NotSymmetric(DataMatrix),
    /// The central path does not match the dimensions of the problem.
    #[error("central path does not match the problem dimensions")]
    InvalidDimensionality,
}

/// Semidefinite program in the standard primal-dual form.
///
/// The primal problem is
///
/// ```text
/// minimize    tr(C X)
/// subject to  tr(A_i X) = b_i,  i = 1, ..., p
///             X ⪰ 0
/// ```
///
/// and its dual is
///
/// ```text
/// maximize    bᵗ y
/// subject to  Σ y_i A_i + S = C
///             S ⪰ 0
/// ```
///
/// All matrices are symmetric of order *n*. The data are validated on
/// construction and never change afterwards. The constraint operator is stored
/// as a `p × n(n+1)/2` matrix with rows `svec(A_i)ᵗ`, see
/// [`svec`](crate::linalg::svec).
#[derive(Debug, Clone, Getters)]
pub struct SdpProblem<T: RealField + Copy> {
    constraints: Vec<DMatrix<T>>,
    /// The right-hand side vector `b`.
    #[getset(get = "pub")]
    rhs: DVector<T>,
    /// The cost matrix `C`.
    #[getset(get = "pub")]
    cost: DMatrix<T>,
    /// The constraint operator with rows `svec(A_i)ᵗ`.
    #[getset(get = "pub")]
    operator: DMatrix<T>,
    /// The vectorized cost matrix `svec(C)`.
    #[getset(get = "pub")]
    cost_svec: DVector<T>,
}

impl<T: RealField + Copy> SdpProblem<T> {
    /// Validates the data and initializes the problem.
    ///
    /// The order *n* is taken from the cost matrix. The symmetry is checked up
    /// to relative tolerance `sqrt(EPSILON)`.
    pub fn new(a: Vec<DMatrix<T>>, b: DVector<T>, c: DMatrix<T>) -> Result<Self, ProblemError> {
        let n = c.nrows();

        if n == 0 {
            return Err(ProblemError::EmptyDimension);
        }

        if a.is_empty() {
            return Err(ProblemError::NoConstraints);
        }

        if b.len() != a.len() {
            return Err(ProblemError::RhsLength(b.len(), a.len()));
        }

        let eps = T::default_epsilon().sqrt();
        let check = |m: &DMatrix<T>, which: DataMatrix| {
            if m.shape() != (n, n) {
                Err(ProblemError::InvalidShape(which, n))
            } else if !m.relative_eq(&m.transpose(), eps, eps) {
                Err(ProblemError::NotSymmetric(which))
            } else {
                Ok(())
            }
        };

        check(&c, DataMatrix::Cost)?;
        for (i, ai) in a.iter().enumerate() {
            check(ai, DataMatrix::Constraint(i))?;
        }

        let mut operator = DMatrix::zeros(a.len(), svec_dim(n));
        for (i, ai) in a.iter().enumerate() {
            operator.set_row(i, &svec(ai).transpose());
        }

        let cost_svec = svec(&c);

        Ok(Self {
            constraints: a,
            rhs: b,
            cost: c,
            operator,
            cost_svec,
        })
    }

    /// Order of the matrices.
    pub fn n(&self) -> usize {
        self.cost.nrows()
    }

    /// Number of constraints.
    pub fn p(&self) -> usize {
        self.constraints.len()
    }

    /// The constraint matrices `A_1, ..., A_p`.
    pub fn constraints(&self) -> &[DMatrix<T>] {
        &self.constraints
    }

    /// Applies the constraint operator, that is, computes `[tr(A_i X)]`.
    pub fn apply(&self, x: &DMatrix<T>) -> DVector<T> {
        &self.operator * svec(x)
    }

    /// Applies the adjoint of the constraint operator, that is, computes `Σ
    /// y_i A_i`.
    pub fn adjoint(&self, y: &DVector<T>) -> DMatrix<T> {
        smat(&(self.operator.transpose() * y), self.n())
    }

    /// Computes the primal residual `b − [tr(A_i X)]`.
    pub fn primal_residual(&self, x: &DMatrix<T>) -> DVector<T> {
        &self.rhs - self.apply(x)
    }

    /// Computes the vectorized dual residual `svec(C − S − Σ y_i A_i)`.
    pub fn dual_residual(&self, y: &DVector<T>, s: &DMatrix<T>) -> DVector<T> {
        &self.cost_svec - svec(s) - self.operator.transpose() * y
    }

    /// Computes the primal objective `tr(C X)`.
    pub fn primal_objective(&self, x: &DMatrix<T>) -> T {
        self.cost_svec.dot(&svec(x))
    }

    /// Computes the dual objective `bᵗ y`.
    pub fn dual_objective(&self, y: &DVector<T>) -> T {
        self.rhs.dot(y)
    }
}
