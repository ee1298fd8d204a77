//! The collection of implemented algorithms.

pub mod homogeneous;
pub mod primal_dual;

pub use homogeneous::HomogeneousSelfDual;
pub use primal_dual::PrimalDual;

use nalgebra::{convert, RealField};

/// Choice of the centering parameter `σ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Centering<T> {
    /// Heuristic value `n / (15 √n + n)` depending on the matrix order.
    Heuristic,
    /// Fixed value in `[0, 1]`.
    Fixed(T),
}

impl<T: RealField + Copy> Centering<T> {
    /// Returns the centering parameter for matrices of order `n`.
    pub fn sigma(&self, n: usize) -> T {
        match *self {
            Centering::Heuristic => {
                let n: T = convert(n as f64);
                n / (convert::<_, T>(15.0) * n.sqrt() + n)
            }
            Centering::Fixed(sigma) => sigma,
        }
    }
}

impl<T> Default for Centering<T> {
    fn default() -> Self {
        Centering::Heuristic
    }
}
