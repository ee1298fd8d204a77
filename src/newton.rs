//! Assembly and solution of the Newton system for search directions.
//!
//! At an iterate `(X, y, S)`, the search direction of the primal-dual method
//! solves the linearized central path conditions
//!
//! ```text
//! A dX            = rp       (primal feasibility)
//! Aᵗ dy + dS      = rd       (dual feasibility)
//! E dX + F dS     = rc       (symmetrized complementarity)
//! ```
//!
//! with `rp = b − A svec(X)`, `rd = svec(C) − svec(S) − Aᵗy` and `rc =
//! svec(σμI − H_P(XS))`. The operators `E` and `F` are symmetric Kronecker
//! products determined by the [`Scaling`]. The direction is obtained by
//! eliminating `dX` and `dS` and solving the Schur complement system
//!
//! ```text
//! A E⁻¹F Aᵗ dy = rp − A E⁻¹(rc − F rd)
//! ```
//!
//! followed by back substitution. The homogeneous self-dual variant performs
//! the same elimination on the [`Embedding`] of the problem.
//!
//! # References
//!
//! \[1\] F. Alizadeh, J.-P. A. Haeberly, M. L. Overton: Primal-Dual
//! Interior-Point Methods for Semidefinite Programming: Convergence Rates,
//! Stability and Numerical Results. SIAM Journal on Optimization, 1998.
//!
//! \[2\] F. A. Potra, R. Sheng: On Homogeneous Interior-Point Algorithms for
//! Semidefinite Programming. Optimization Methods and Software, 1998.

use getset::{CopyGetters, Getters};
use log::trace;
use nalgebra::{DMatrix, DVector, RealField};

use crate::{
    core::{CentralPath, SdpProblem},
    linalg::{cholesky, inverse, skron, smat, solve, svec, LinalgError},
    symmetrize::{symmetrize, symmetrize_with_inverse},
};

/// Scaling matrix `P` of the symmetrization operator used in the
/// complementarity condition `H_P(XS) = μI`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// Alizadeh–Haeberly–Overton direction (`P = I`).
    Aho,
    /// Helmberg–Kojima–Monteiro direction (`P = Lᵗ` where `S = L Lᵗ`). It
    /// yields a symmetric Schur complement and tends to be more robust far
    /// from the central path.
    Hkm,
}

impl Default for Scaling {
    fn default() -> Self {
        Scaling::Aho
    }
}

/// Linearization of the complementarity condition at the current iterate.
struct Linearization<T: RealField + Copy> {
    e_inv: DMatrix<T>,
    f: DMatrix<T>,
    rc: DVector<T>,
}

impl<T: RealField + Copy> Linearization<T> {
    fn new(
        x: &DMatrix<T>,
        s: &DMatrix<T>,
        target: T,
        scaling: Scaling,
    ) -> Result<Self, LinalgError> {
        let n = x.nrows();
        let eye = DMatrix::<T>::identity(n, n);
        let center = &eye * target;
        let xs = x * s;

        let (e, f, rc) = match scaling {
            Scaling::Aho => {
                let e = skron(s, &eye);
                let f = skron(x, &eye);
                let rc = svec(&(center - symmetrize(&xs)));
                (e, f, rc)
            }
            Scaling::Hkm => {
                let p = cholesky(s)?.transpose();
                let p_inv = inverse(&p)?;
                let p_inv_t = p_inv.transpose();

                let e = skron(&p, &(&p_inv_t * s));
                let f = skron(&(&p * x), &p_inv_t);
                let rc = svec(&(center - symmetrize_with_inverse(&xs, &p, &p_inv)));
                (e, f, rc)
            }
        };

        let e_inv = inverse(&e)?;

        Ok(Self { e_inv, f, rc })
    }

    /// Eliminates `dX` and `dS` from the system
    ///
    /// ```text
    /// G dX + extra dz = u
    /// Gᵗ dz + dS      = v
    /// E dX + F dS     = rc
    /// ```
    ///
    /// and returns `(dz, svec(dX), svec(dS))`.
    fn eliminate(
        &self,
        g: &DMatrix<T>,
        extra: Option<&DMatrix<T>>,
        u: &DVector<T>,
        v: &DVector<T>,
    ) -> Result<(DVector<T>, DVector<T>, DVector<T>), LinalgError> {
        let Self { e_inv, f, rc } = self;

        let k = e_inv * f;
        let mut schur = g * k * g.transpose();
        if let Some(extra) = extra {
            schur += extra;
        }

        let rhs = u - g * (e_inv * (rc - f * v));

        trace!(
            "Schur complement of order {}, rhs norm = {}",
            schur.nrows(),
            rhs.norm()
        );

        let dz = solve(&schur, &rhs)?;
        let ds = v - g.transpose() * &dz;
        let dx = e_inv * (rc - f * &ds);

        Ok((dz, dx, ds))
    }
}

/// Search direction of the primal-dual method.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Direction<T: RealField + Copy> {
    /// Direction of the primal matrix variable.
    dx: DMatrix<T>,
    /// Direction of the dual multipliers.
    dy: DVector<T>,
    /// Direction of the dual slack matrix.
    ds: DMatrix<T>,
}

/// Computes the search direction of the primal-dual method at given iterate
/// aiming at the point `σμI` of the central path.
pub fn primal_dual<T: RealField + Copy>(
    problem: &SdpProblem<T>,
    path: &CentralPath<T>,
    sigma: T,
    mu: T,
    scaling: Scaling,
) -> Result<Direction<T>, LinalgError> {
    let n = problem.n();
    let lin = Linearization::new(path.x(), path.s(), sigma * mu, scaling)?;

    let rp = problem.primal_residual(path.x());
    let rd = problem.dual_residual(path.y(), path.s());

    let (dy, dx, ds) = lin.eliminate(problem.operator(), None, &rp, &rd)?;

    Ok(Direction {
        dx: smat(&dx, n),
        dy,
        ds: smat(&ds, n),
    })
}

/// Homogeneous self-dual embedding of the problem.
///
/// With the augmented dual vector `ȳ = [y; τ]`, the embedding reads
///
/// ```text
/// Ā svec(X) + B ȳ − e κ = 0
/// Āᵗ ȳ + svec(S)        = 0
/// ```
///
/// where `Ā = [A; −svec(C)ᵗ]`, `B = [[0, −b], [bᵗ, 0]]` is skew-symmetric and
/// `e` is the last unit vector. Any solution with `τ > 0` yields a solution
/// `(X, y, S) / τ` of the original problem, while `κ > 0` certifies
/// infeasibility.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Embedding<T: RealField + Copy> {
    /// The augmented constraint operator `Ā`.
    operator: DMatrix<T>,
    /// The skew-symmetric matrix `B`.
    skew: DMatrix<T>,
}

impl<T: RealField + Copy> Embedding<T> {
    /// Builds the embedding of given problem.
    pub fn new(problem: &SdpProblem<T>) -> Self {
        let p = problem.p();
        let operator = problem.operator();

        let mut augmented = DMatrix::zeros(p + 1, operator.ncols());
        augmented.rows_mut(0, p).copy_from(operator);
        augmented.set_row(p, &(-problem.cost_svec().transpose()));

        let mut skew = DMatrix::zeros(p + 1, p + 1);
        for (i, &bi) in problem.rhs().iter().enumerate() {
            skew[(i, p)] = -bi;
            skew[(p, i)] = bi;
        }

        Self {
            operator: augmented,
            skew,
        }
    }

    /// Number of constraints of the original problem.
    pub fn p(&self) -> usize {
        self.operator.nrows() - 1
    }

    /// Builds the augmented dual vector `ȳ = [y; τ]`.
    pub fn augment(&self, y: &DVector<T>, tau: T) -> DVector<T> {
        let p = self.p();
        assert_eq!(y.len(), p, "invalid length of dual vector");

        let mut ybar = DVector::zeros(p + 1);
        ybar.rows_mut(0, p).copy_from(y);
        ybar[p] = tau;
        ybar
    }

    /// Computes the residuals of the embedding at given point.
    pub fn residuals(
        &self,
        path: &CentralPath<T>,
        tau: T,
        kappa: T,
    ) -> HomogeneousResiduals<T> {
        let p = self.p();
        let ybar = self.augment(path.y(), tau);

        let mut primal = &self.operator * svec(path.x()) + &self.skew * &ybar;
        primal[p] -= kappa;

        let dual = self.operator.transpose() * &ybar + svec(path.s());

        HomogeneousResiduals { primal, dual }
    }
}

/// Residuals of the homogeneous embedding.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct HomogeneousResiduals<T: RealField + Copy> {
    /// Residual `Ā svec(X) + B ȳ − e κ`. The last entry is the residual of the
    /// duality gap.
    primal: DVector<T>,
    /// Residual `Āᵗ ȳ + svec(S)`.
    dual: DVector<T>,
}

/// Search direction of the homogeneous self-dual method.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct HomogeneousDirection<T: RealField + Copy> {
    /// Direction of the primal matrix variable.
    #[getset(get = "pub")]
    dx: DMatrix<T>,
    /// Direction of the dual multipliers.
    #[getset(get = "pub")]
    dy: DVector<T>,
    /// Direction of the dual slack matrix.
    #[getset(get = "pub")]
    ds: DMatrix<T>,
    /// Direction of the homogenizing variable `τ`.
    #[getset(get_copy = "pub")]
    dtau: T,
    /// Direction of the homogenizing variable `κ`.
    #[getset(get_copy = "pub")]
    dkappa: T,
}

/// Computes the search direction of the homogeneous self-dual method.
///
/// The residuals of the embedding are reduced by the factor `η = 1 − σ`, and
/// the complementarity pairs `(X, S)` and `(τ, κ)` are driven towards `σμ`.
pub fn homogeneous<T: RealField + Copy>(
    embedding: &Embedding<T>,
    path: &CentralPath<T>,
    tau: T,
    kappa: T,
    sigma: T,
    mu: T,
    scaling: Scaling,
) -> Result<HomogeneousDirection<T>, LinalgError> {
    let n = path.x().nrows();
    let p = embedding.p();
    let eta = T::one() - sigma;
    let rt = sigma * mu - tau * kappa;

    let lin = Linearization::new(path.x(), path.s(), sigma * mu, scaling)?;
    let residuals = embedding.residuals(path, tau, kappa);

    // dκ = (rt − κ dτ) / τ is substituted into the gap row.
    let mut extra = embedding.skew().clone_owned();
    extra[(p, p)] += kappa / tau;

    let mut u = residuals.primal() * -eta;
    u[p] += rt / tau;
    let v = residuals.dual() * -eta;

    let (dybar, dx, ds) = lin.eliminate(embedding.operator(), Some(&extra), &u, &v)?;

    let dtau = dybar[p];
    let dkappa = (rt - kappa * dtau) / tau;

    trace!("dtau = {}, dkappa = {}", dtau, dkappa);

    Ok(HomogeneousDirection {
        dx: smat(&dx, n),
        dy: dybar.rows(0, p).clone_owned(),
        ds: smat(&ds, n),
        dtau,
        dkappa,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use nalgebra::{dmatrix, dvector};

    fn small_problem() -> SdpProblem<f64> {
        SdpProblem::new(
            vec![
                dmatrix![1.0, 0.0; 0.0, 0.0],
                dmatrix![0.0, 1.0; 1.0, 0.0],
            ],
            dvector![1.0, 0.5],
            dmatrix![2.0, 0.5; 0.5, 3.0],
        )
        .unwrap()
    }

    fn off_center_path() -> CentralPath<f64> {
        CentralPath::new(
            dmatrix![2.0, 0.3; 0.3, 1.0],
            dvector![0.2, -0.1],
            dmatrix![1.5, -0.2; -0.2, 0.8],
        )
    }

    #[test]
    fn trivial_problem_first_direction() {
        let problem = SdpProblem::new(vec![dmatrix![1.0]], dvector![1.0], dmatrix![1.0]).unwrap();
        let path = CentralPath::identity(1, 1);
        let sigma = 1.0 / 16.0;

        let direction = primal_dual(&problem, &path, sigma, 1.0, Scaling::Aho).unwrap();

        assert_abs_diff_eq!(direction.dx()[(0, 0)], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(direction.dy()[0], 15.0 / 16.0, epsilon = 1e-12);
        assert_abs_diff_eq!(direction.ds()[(0, 0)], -15.0 / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn primal_dual_direction_satisfies_linearized_equations() {
        let problem = small_problem();
        let path = off_center_path();
        let (sigma, mu) = (0.3, path.complementarity() / 2.0);

        for scaling in [Scaling::Aho, Scaling::Hkm] {
            let direction = primal_dual(&problem, &path, sigma, mu, scaling).unwrap();
            let (dx, dy, ds) = (direction.dx(), direction.dy(), direction.ds());

            assert_abs_diff_eq!(
                problem.apply(dx),
                problem.primal_residual(path.x()),
                epsilon = 1e-10
            );
            assert_abs_diff_eq!(
                problem.operator().transpose() * dy + svec(ds),
                problem.dual_residual(path.y(), path.s()),
                epsilon = 1e-10
            );

            assert_abs_diff_eq!(dx.clone(), dx.transpose(), epsilon = 1e-12);
            assert_abs_diff_eq!(ds.clone(), ds.transpose(), epsilon = 1e-12);
        }
    }

    #[test]
    fn aho_direction_linearizes_complementarity() {
        let problem = small_problem();
        let path = off_center_path();
        let (sigma, mu) = (0.3, path.complementarity() / 2.0);

        let direction = primal_dual(&problem, &path, sigma, mu, Scaling::Aho).unwrap();
        let (x, s) = (path.x(), path.s());
        let (dx, ds) = (direction.dx(), direction.ds());

        let lhs = symmetrize(&(dx * s + x * ds));
        let rhs = DMatrix::identity(2, 2) * (sigma * mu) - symmetrize(&(x * s));

        assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-10);
    }

    #[test]
    fn duplicated_constraints_are_singular() {
        let a = dmatrix![1.0, 0.0; 0.0, 1.0];
        let problem = SdpProblem::new(
            vec![a.clone(), a],
            dvector![1.0, 1.0],
            dmatrix![1.0, 0.0; 0.0, 1.0],
        )
        .unwrap();
        let path = CentralPath::identity(2, 2);

        assert_eq!(
            primal_dual(&problem, &path, 0.5, 1.0, Scaling::Aho).unwrap_err(),
            LinalgError::Singular
        );
    }

    #[test]
    fn embedding_structure() {
        let problem = small_problem();
        let embedding = Embedding::new(&problem);

        assert_eq!(embedding.p(), 2);
        assert_eq!(embedding.operator().shape(), (3, 3));
        assert_abs_diff_eq!(
            embedding.skew().clone(),
            -embedding.skew().transpose(),
            epsilon = 0.0
        );
        assert_abs_diff_eq!(
            embedding.augment(&dvector![1.0, 2.0], 0.5),
            dvector![1.0, 2.0, 0.5]
        );
    }

    #[test]
    fn homogeneous_direction_satisfies_linearized_equations() {
        let problem = small_problem();
        let embedding = Embedding::new(&problem);
        let path = off_center_path();
        let (tau, kappa, sigma) = (0.7, 0.4, 0.25);
        let mu = (path.complementarity() + tau * kappa) / 3.0;
        let eta = 1.0 - sigma;

        for scaling in [Scaling::Aho, Scaling::Hkm] {
            let direction =
                homogeneous(&embedding, &path, tau, kappa, sigma, mu, scaling).unwrap();
            let residuals = embedding.residuals(&path, tau, kappa);

            let dybar = embedding.augment(direction.dy(), direction.dtau());

            let mut primal = embedding.operator() * svec(direction.dx())
                + embedding.skew() * &dybar;
            primal[2] -= direction.dkappa();
            assert_abs_diff_eq!(primal, residuals.primal() * -eta, epsilon = 1e-10);

            let dual = embedding.operator().transpose() * &dybar + svec(direction.ds());
            assert_abs_diff_eq!(dual, residuals.dual() * -eta, epsilon = 1e-10);

            assert_abs_diff_eq!(
                tau * direction.dkappa() + kappa * direction.dtau(),
                sigma * mu - tau * kappa,
                epsilon = 1e-10
            );
        }
    }
}
