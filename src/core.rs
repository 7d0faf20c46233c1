//! Core abstractions and types for Dirmin.
//!
//! *Users* are mainly interested in implementing the [`Function`] trait,
//! specifying the [domain](Domain) and threading an [`EvalBudget`] through
//! the refinement calls.

mod budget;
mod domain;
mod function;

pub use budget::*;
pub use domain::*;
pub use function::*;
