#![allow(clippy::many_single_char_names)]
#![warn(missing_docs)]

//! # Dirmin
//!
//! A pure Rust implementation of bound-constrained, evaluation-budgeted
//! derivative-free local optimization using Powell's direction-set method.
//!
//! This library is meant as the refinement stage of a larger search process
//! (for example a particle swarm): given a candidate point, a rectangular
//! domain and a shared cap on the number of objective evaluations, it polishes
//! the candidate with successive bounded 1-D line minimizations along an
//! adaptively updated set of directions and stops cooperatively as soon as
//! the budget is exhausted, an iteration limit is hit or no further
//! directional progress is possible. No stopping condition is reported as an
//! error; the best point reached so far is always returned.
//!
//! ## Problem
//!
//! The problem is minimizing a scalar function of *n* variables
//!
//! ```text
//! min f(x),    x = { x1, ..., xn }
//! ```
//!
//! subject to bound constraints
//!
//! ```text
//! Li <= xi <= Ui for some bounds [L, U] for every i
//! ```
//!
//! The bounds can be negative/positive infinity, effectively making the
//! variable unconstrained. The objective is treated as an opaque, pure
//! callable; no gradient, Hessian or Jacobian is ever required.
//!
//! When it comes to code, the objective is any type that implements the
//! [`Function`] and [`Problem`] traits.
//!
//! ## Example
//!
//! ```rust
//! // Dirmin is based on `nalgebra` crate.
//! use dirmin::nalgebra as na;
//! use dirmin::algo::powell::{Powell, Termination};
//! use dirmin::{Domain, EvalBudget, Function, Problem};
//! use na::{Dyn, IsContiguous};
//!
//! // A problem is represented by a type.
//! struct Sphere;
//!
//! impl Problem for Sphere {
//!     // The numeric type. Usually f64 or f32.
//!     type Field = f64;
//!
//!     // Bound constraints for the variables.
//!     fn domain(&self) -> Domain<Self::Field> {
//!         Domain::rect(vec![-5.0; 5], vec![5.0; 5])
//!     }
//! }
//!
//! impl Function for Sphere {
//!     // Evaluate trial values of variables.
//!     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
//!     where
//!         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
//!     {
//!         x.iter().map(|xi| xi * xi).sum()
//!     }
//! }
//!
//! let f = Sphere;
//! let dom = f.domain();
//!
//! // The budget is owned by the caller and typically shared across many
//! // refinement calls.
//! let mut budget = EvalBudget::capped(2000);
//!
//! let mut x = na::dvector![3.0, 3.0, 3.0, 3.0, 3.0];
//! let mut powell = Powell::new(&f, &dom);
//! let report = powell.minimize(&f, &dom, &mut x, &mut budget);
//!
//! assert_ne!(report.termination, Termination::Faulted);
//! assert!(budget.used() <= 2001);
//! assert!(x.norm() <= 1e-3);
//! ```
//!
//! For callers that do not thread their own budget, the [`PowellDriver`]
//! offers a builder-style API encapsulating the whole run.
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
mod core;
pub mod driver;

pub use core::*;
pub use driver::PowellDriver;

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
