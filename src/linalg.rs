//! Dense linear-algebra primitives for the path-following methods.
//!
//! Symmetric matrices of order *n* are embedded into vectors of length
//! *n(n+1)/2* by [`svec`], which stacks the upper triangle column-wise and
//! scales the off-diagonal entries by √2:
//!
//! ```text
//! svec(U) = (U11, √2 U12, U22, √2 U13, √2 U23, U33, ...)
//! ```
//!
//! With this scaling, `svec(U)ᵗ svec(V) = tr(UV)`, so the trace inner product
//! of symmetric matrices becomes the ordinary dot product. The inverse mapping
//! is [`smat`]. Linear operators acting on symmetric matrices are then plain
//! matrices of order *n(n+1)/2*, most importantly the symmetric Kronecker
//! product [`skron`].
//!
//! The remaining functions wrap decompositions from `nalgebra` and turn their
//! failures into [`LinalgError`].

use nalgebra::{convert, Cholesky, DMatrix, DVector, RealField, SymmetricEigen};
use thiserror::Error;

/// Failure of a linear-algebra primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinalgError {
    /// The matrix is (numerically) singular and the system cannot be solved.
    #[error("matrix is singular")]
    Singular,
    /// Cholesky factorization failed because the matrix is not positive
    /// definite.
    #[error("matrix is not positive definite")]
    NotPositiveDefinite,
    /// The symmetric eigenvalue decomposition did not converge.
    #[error("eigenvalue decomposition did not converge")]
    NoConvergence,
}

/// Length of the [`svec`] of a symmetric matrix of order `n`.
pub fn svec_dim(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Vectorizes a symmetric matrix.
///
/// Only the symmetric part of the matrix is taken into account, that is,
/// `svec(U) = svec((U + Uᵗ) / 2)`.
pub fn svec<T: RealField + Copy>(m: &DMatrix<T>) -> DVector<T> {
    assert!(m.is_square(), "matrix is not square");

    let n = m.nrows();
    let half: T = convert(0.5);
    let sqrt2: T = convert(std::f64::consts::SQRT_2);

    let mut v = DVector::zeros(svec_dim(n));
    let mut k = 0;

    for j in 0..n {
        for i in 0..=j {
            v[k] = if i == j {
                m[(i, i)]
            } else {
                (m[(i, j)] + m[(j, i)]) * half * sqrt2
            };
            k += 1;
        }
    }

    v
}

/// Reconstructs the symmetric matrix of order `n` from its [`svec`].
pub fn smat<T: RealField + Copy>(v: &DVector<T>, n: usize) -> DMatrix<T> {
    assert_eq!(v.len(), svec_dim(n), "invalid svec length");

    let inv_sqrt2: T = convert(std::f64::consts::FRAC_1_SQRT_2);

    let mut m = DMatrix::zeros(n, n);
    let mut k = 0;

    for j in 0..n {
        for i in 0..=j {
            if i == j {
                m[(i, i)] = v[k];
            } else {
                let value = v[k] * inv_sqrt2;
                m[(i, j)] = value;
                m[(j, i)] = value;
            }
            k += 1;
        }
    }

    m
}

/// Symmetric Kronecker product `G ⊗ₛ H` as a matrix acting on [`svec`]s.
///
/// It is the operator satisfying
///
/// ```text
/// (G ⊗ₛ H) svec(U) = svec((H U Gᵗ + G U Hᵗ) / 2)
/// ```
///
/// for every symmetric `U`. In particular, `(S ⊗ₛ I) svec(U) = svec((SU +
/// US) / 2)`.
pub fn skron<T: RealField + Copy>(g: &DMatrix<T>, h: &DMatrix<T>) -> DMatrix<T> {
    assert!(g.is_square(), "matrix is not square");
    assert_eq!(g.shape(), h.shape(), "matrices have different shapes");

    let n = g.nrows();
    let dim = svec_dim(n);
    let half: T = convert(0.5);
    let inv_sqrt2: T = convert(std::f64::consts::FRAC_1_SQRT_2);

    let mut out = DMatrix::zeros(dim, dim);
    let mut k = 0;

    // Images of the orthonormal basis of symmetric matrices. For the basis
    // element U = (e_i e_jᵗ + e_j e_iᵗ) / √2, it holds that H U Gᵗ = (h_i g_jᵗ
    // + h_j g_iᵗ) / √2, where h_i and g_i are the columns of the matrices.
    for j in 0..n {
        for i in 0..=j {
            let image = if i == j {
                let hg = h.column(i) * g.column(i).transpose();
                &hg + hg.transpose()
            } else {
                let hg = h.column(i) * g.column(j).transpose()
                    + h.column(j) * g.column(i).transpose();
                (&hg + hg.transpose()) * inv_sqrt2
            };

            out.set_column(k, &(svec(&image) * half));
            k += 1;
        }
    }

    out
}

/// Computes the inverse of a square matrix.
pub fn inverse<T: RealField + Copy>(m: &DMatrix<T>) -> Result<DMatrix<T>, LinalgError> {
    m.clone_owned()
        .try_inverse()
        .filter(|inv| inv.iter().all(|value| value.is_finite()))
        .ok_or(LinalgError::Singular)
}

/// Solves the linear system `m x = rhs` using LU decomposition with partial
/// pivoting.
///
/// A zero pivot or non-finite solution is reported as
/// [`LinalgError::Singular`]. There is no relative threshold on the pivots as
/// the systems in interior-point methods become badly conditioned near the
/// optimum while still being solvable.
pub fn solve<T: RealField + Copy>(
    m: &DMatrix<T>,
    rhs: &DVector<T>,
) -> Result<DVector<T>, LinalgError> {
    m.clone_owned()
        .lu()
        .solve(rhs)
        .filter(|x| x.iter().all(|value| value.is_finite()))
        .ok_or(LinalgError::Singular)
}

/// Computes the lower-triangular Cholesky factor `L` such that `m = L Lᵗ`.
pub fn cholesky<T: RealField + Copy>(m: &DMatrix<T>) -> Result<DMatrix<T>, LinalgError> {
    Cholesky::new(m.clone_owned())
        .map(|chol| chol.unpack())
        .filter(|l| l.iter().all(|value| value.is_finite()))
        .ok_or(LinalgError::NotPositiveDefinite)
}

/// Computes the eigenvalues of a symmetric matrix, sorted in ascending order.
pub fn eigenvalues<T: RealField + Copy>(
    m: &DMatrix<T>,
    tolerance: T,
) -> Result<DVector<T>, LinalgError> {
    let eigen =
        SymmetricEigen::try_new(m.clone_owned(), tolerance, 0).ok_or(LinalgError::NoConvergence)?;

    let mut values = eigen.eigenvalues.iter().copied().collect::<Vec<_>>();
    if values.iter().any(|value| !value.is_finite()) {
        return Err(LinalgError::NoConvergence);
    }

    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(DVector::from_vec(values))
}

/// Computes the smallest eigenvalue of a symmetric matrix.
pub fn min_eigenvalue<T: RealField + Copy>(m: &DMatrix<T>, tolerance: T) -> Result<T, LinalgError> {
    let values = eigenvalues(m, tolerance)?;
    values.iter().copied().next().ok_or(LinalgError::NoConvergence)
}
