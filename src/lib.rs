#![allow(clippy::many_single_char_names)]
#![allow(clippy::type_complexity)]
#![warn(missing_docs)]

//! # sdpath
//!
//! A pure Rust implementation of path-following interior-point methods for
//! semidefinite programming.
//!
//! The library provides two iterative methods that share the same interface,
//! the same Newton-system assembly and the same step-length rule. All solvers
//! implement the [`Solver`] trait, which is designed to give full control over
//! the process: the caller can run the whole search, do the steps manually or
//! stop on a custom condition through the [`SolverDriver`].
//!
//! ## Algorithms
//!
//! * [Homogeneous self-dual](algo::homogeneous) -- Recommended method to be
//!   used as a default. It starts from any positive definite point and detects
//!   infeasible problems.
//! * [Primal-dual](algo::primal_dual) -- Classical infeasible path-following
//!   method. Lightweight, but assumes that the problem has an optimal
//!   solution.
//!
//! Both methods support the AHO and HKM search directions (see
//! [`newton::Scaling`]).
//!
//! ## Problem
//!
//! The primal problem in standard form is
//!
//! ```text
//! minimize    tr(C X)
//! subject to  tr(A_i X) = b_i,   i = 1, ..., p
//!             X ⪰ 0
//! ```
//!
//! and its dual is
//!
//! ```text
//! maximize    bᵗ y
//! subject to  Σ y_i A_i + S = C
//!             S ⪰ 0
//! ```
//!
//! where all matrices are real symmetric of order `n`. When it comes to code,
//! the problem is represented by [`SdpProblem`], which validates the data once
//! on construction.
//!
//! ```rust
//! // sdpath is based on `nalgebra` crate.
//! use sdpath::nalgebra as na;
//! use sdpath::SdpProblem;
//! use na::{dmatrix, dvector};
//!
//! // Minimum eigenvalue of C: minimize tr(C X) subject to tr(X) = 1.
//! let problem = SdpProblem::<f64>::new(
//!     vec![dmatrix![1.0, 0.0; 0.0, 1.0]],
//!     dvector![1.0],
//!     dmatrix![2.0, 1.0; 1.0, 2.0],
//! )
//! .expect("valid problem data");
//! ```
//!
//! ## Solving
//!
//! When you have your problem available, you can use the [`SolverDriver`] to
//! run the iteration process until convergence.
//!
//! ```rust
//! use sdpath::SolverDriver;
//! # use sdpath::nalgebra as na;
//! # use sdpath::SdpProblem;
//! # use na::{dmatrix, dvector};
//! #
//! # let problem = SdpProblem::<f64>::new(
//! #     vec![dmatrix![1.0, 0.0; 0.0, 1.0]],
//! #     dvector![1.0],
//! #     dmatrix![2.0, 1.0; 1.0, 2.0],
//! # )
//! # .expect("valid problem data");
//!
//! let mut solver = SolverDriver::new(&problem);
//!
//! let solution = solver
//!     .find(|state| {
//!         println!(
//!             "iter = {}\tdelta = {}\tphi = {}",
//!             state.iter(),
//!             state.delta(),
//!             state.phi(),
//!         );
//!         state.iter() >= 100
//!     })
//!     .expect("solver encountered an error");
//!
//! if solution.termination().is_converged() {
//!     // The smallest eigenvalue of C is 1.
//!     assert!((solution.path().y()[0] - 1.0).abs() < 1e-6);
//! } else {
//!     println!("maximum number of iteration exceeded");
//! }
//! ```
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
pub mod analysis;
mod core;
pub mod driver;
pub mod linalg;
pub mod newton;
pub mod step;
pub mod symmetrize;

pub use crate::core::*;
pub use driver::{Solution, SolverDriver};

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
