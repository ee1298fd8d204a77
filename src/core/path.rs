use getset::Getters;
use nalgebra::{DMatrix, DVector, RealField};

use super::problem::{ProblemError, SdpProblem};

/// Iterate `(X, y, S)` of an interior-point method.
///
/// `X` and `S` are symmetric matrices that the methods keep positive definite,
/// `y` is the vector of dual multipliers.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct CentralPath<T: RealField + Copy> {
    /// Primal matrix variable.
    x: DMatrix<T>,
    /// Dual multipliers.
    y: DVector<T>,
    /// Dual slack matrix.
    s: DMatrix<T>,
}

impl<T: RealField + Copy> CentralPath<T> {
    /// Initializes the iterate from its parts.
    pub fn new(x: DMatrix<T>, y: DVector<T>, s: DMatrix<T>) -> Self {
        Self { x, y, s }
    }

    /// Standard starting point `X = S = I`, `y = 0`.
    pub fn identity(n: usize, p: usize) -> Self {
        Self::scaled_identity(n, p, T::one())
    }

    /// Starting point `X = S = scale · I`, `y = 0`.
    pub fn scaled_identity(n: usize, p: usize, scale: T) -> Self {
        let eye = DMatrix::identity(n, n) * scale;
        Self::new(eye.clone(), DVector::zeros(p), eye)
    }

    /// Decomposes the iterate into `(X, y, S)`.
    pub fn into_parts(self) -> (DMatrix<T>, DVector<T>, DMatrix<T>) {
        (self.x, self.y, self.s)
    }

    /// Complementarity `tr(XS)`.
    pub fn complementarity(&self) -> T {
        (&self.x * &self.s).trace()
    }

    /// Checks that the iterate has the dimensions of given problem.
    pub fn check_dims(&self, problem: &SdpProblem<T>) -> Result<(), ProblemError> {
        let n = problem.n();

        if self.x.shape() != (n, n) || self.s.shape() != (n, n) || self.y.len() != problem.p() {
            Err(ProblemError::InvalidDimensionality)
        } else {
            Ok(())
        }
    }

    /// Returns the iterate with all parts multiplied by given factor.
    pub fn scaled(&self, factor: T) -> Self {
        Self::new(&self.x * factor, &self.y * factor, &self.s * factor)
    }
}
