//! Abstractions and types for objective function definitions.

use nalgebra::{storage::Storage, Dyn, IsContiguous, RealField, Vector};

use super::domain::Domain;

/// The base trait for [`Function`] definitions.
pub trait Problem {
    /// Type of the field, usually f64 or f32.
    type Field: RealField + Copy;

    /// Gets the domain (bound constraints) of the problem.
    fn domain(&self) -> Domain<Self::Field>;
}

/// The trait for defining objective functions.
///
/// ## Defining a function
///
/// A function is any type that implements [`Function`] and [`Problem`]
/// traits. There is one required associated type (the field) and two required
/// methods: [`apply`](Function::apply) and [`domain`](Problem::domain).
///
/// ```rust
/// use dirmin::nalgebra as na;
/// use dirmin::{Domain, Function, Problem};
/// use na::{Dyn, IsContiguous};
///
/// // A problem is represented by a type.
/// struct Rosenbrock {
///     a: f64,
///     b: f64,
/// }
///
/// impl Problem for Rosenbrock {
///     // The numeric type. Usually f64 or f32.
///     type Field = f64;
///
///     fn domain(&self) -> Domain<Self::Field> {
///         Domain::rect(vec![-10.0, -10.0], vec![10.0, 10.0])
///     }
/// }
///
/// impl Function for Rosenbrock {
///     // Apply trial values of variables to the function.
///     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
///     where
///         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
///     {
///         (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
///     }
/// }
/// ```
///
/// The function is assumed to be total, pure and deterministic; the line
/// search relies on identical results for identical inputs. An invalid value
/// (NaN) is not an error: it propagates as an ordinary value and is handled
/// by the optimizer's degeneracy check.
pub trait Function: Problem {
    /// Calculates the value of the function given values of the variables.
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous;
}
