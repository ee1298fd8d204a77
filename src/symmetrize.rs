//! Symmetrization operator of the Monteiro–Zhang family.
//!
//! For a nonsingular scaling matrix `P`, the operator is defined as
//!
//! ```text
//! H_P(U) = (P U P⁻¹ + (P U P⁻¹)ᵗ) / 2
//! ```
//!
//! and for `P = I` it reduces to the plain symmetric part `(U + Uᵗ) / 2`. The
//! complementarity condition `XS = μI` of the central path is replaced by
//! `H_P(XS) = μI` so that the Newton system stays in the space of symmetric
//! matrices.

use nalgebra::{convert, DMatrix, RealField};

use crate::linalg::{inverse, LinalgError};

/// Computes the symmetric part `(U + Uᵗ) / 2` of a square matrix.
pub fn symmetrize<T: RealField + Copy>(u: &DMatrix<T>) -> DMatrix<T> {
    assert!(u.is_square(), "matrix is not square");
    (u + u.transpose()) * convert::<_, T>(0.5)
}

/// Computes `H_P(U)` for a nonsingular scaling matrix `P`.
///
/// Fails with [`LinalgError::Singular`] if `P` cannot be inverted.
pub fn symmetrize_scaled<T: RealField + Copy>(
    u: &DMatrix<T>,
    p: &DMatrix<T>,
) -> Result<DMatrix<T>, LinalgError> {
    let p_inv = inverse(p)?;
    Ok(symmetrize_with_inverse(u, p, &p_inv))
}

/// Computes `H_P(U)` when the inverse of the scaling matrix is already known.
pub fn symmetrize_with_inverse<T: RealField + Copy>(
    u: &DMatrix<T>,
    p: &DMatrix<T>,
    p_inv: &DMatrix<T>,
) -> DMatrix<T> {
    symmetrize(&(p * u * p_inv))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use nalgebra::dmatrix;

    use crate::linalg::cholesky;

    #[test]
    fn plain_symmetrization() {
        let u = dmatrix![1.0, 4.0; 2.0, 3.0];
        assert_abs_diff_eq!(symmetrize(&u), dmatrix![1.0, 3.0; 3.0, 3.0], epsilon = 1e-12);
    }

    #[test]
    fn identity_scaling_is_plain_symmetrization() {
        let u = dmatrix![1.0, 4.0, 0.0; 2.0, 3.0, -1.0; 5.0, 1.0, 2.0];
        let eye = DMatrix::identity(3, 3);

        assert_abs_diff_eq!(
            symmetrize_scaled(&u, &eye).unwrap(),
            symmetrize(&u),
            epsilon = 1e-12
        );
    }

    #[test]
    fn idempotent_for_identity_scaling() {
        let u = dmatrix![1.0, 4.0, 0.0; 2.0, 3.0, -1.0; 5.0, 1.0, 2.0];
        let eye = DMatrix::identity(3, 3);

        let once = symmetrize_scaled(&u, &eye).unwrap();
        let twice = symmetrize_scaled(&once, &eye).unwrap();

        assert_abs_diff_eq!(once, twice, epsilon = 1e-12);
    }

    #[test]
    fn result_is_symmetric() {
        let u = dmatrix![1.0, 4.0; 2.0, 3.0];
        let p = dmatrix![2.0, 1.0; 0.0, 1.0];

        let h = symmetrize_scaled(&u, &p).unwrap();
        assert_abs_diff_eq!(h.clone(), h.transpose(), epsilon = 1e-12);
    }

    #[test]
    fn cholesky_scaling_of_product() {
        // With S = L Lᵗ and P = Lᵗ, the operator maps XS to Lᵗ X L.
        let x = dmatrix![2.0, 1.0; 1.0, 3.0];
        let s = dmatrix![4.0, 2.0; 2.0, 5.0];
        let l = cholesky(&s).unwrap();
        let p = l.transpose();

        let h = symmetrize_scaled(&(&x * &s), &p).unwrap();
        assert_abs_diff_eq!(h, l.transpose() * &x * &l, epsilon = 1e-10);
    }

    #[test]
    fn singular_scaling() {
        let u = dmatrix![1.0, 0.0; 0.0, 1.0];
        let p = dmatrix![1.0, 2.0; 2.0, 4.0];

        assert_eq!(symmetrize_scaled(&u, &p), Err(LinalgError::Singular));
    }
}
