//! Core abstractions and types for sdpath.
//!
//! *Users* are mainly interested in describing their problem with
//! [`SdpProblem`] and optionally choosing the starting [`CentralPath`].
//!
//! Algorithms *developers* are interested in implementing the [`Solver`] trait
//! and using the building blocks in [newton](crate::newton) and
//! [step](crate::step) modules.

mod path;
mod problem;
mod solver;

pub use path::*;
pub use problem::*;
pub use solver::*;
