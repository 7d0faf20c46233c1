//! High-level API for running a refinement.
//!
//! The [`PowellDriver`] encapsulates the optimizer, the domain, the current
//! point and the evaluation budget, and provides a simple API for callers
//! that do not thread their own [`EvalBudget`] through the calls.
//!
//! The simplest way of using the driver is to initialize it with the
//! defaults:
//!
//! ```rust
//! use dirmin::PowellDriver;
//! # use dirmin::{Domain, Problem};
//! #
//! # struct MyFunction;
//! #
//! # impl MyFunction {
//! #     fn new() -> Self {
//! #         Self
//! #     }
//! # }
//! #
//! # impl Problem for MyFunction {
//! #     type Field = f64;
//! #
//! #     fn domain(&self) -> Domain<Self::Field> {
//! #         Domain::rect(vec![-5.0, -5.0], vec![5.0, 5.0])
//! #     }
//! # }
//!
//! let f = MyFunction::new();
//!
//! let driver = PowellDriver::new(&f);
//! ```
//!
//! If you need to specify additional settings, use the builder:
//!
//! ```rust
//! use dirmin::PowellDriver;
//! # use dirmin::{Domain, Problem};
//! #
//! # struct MyFunction;
//! #
//! # impl MyFunction {
//! #     fn new() -> Self {
//! #         Self
//! #     }
//! # }
//! #
//! # impl Problem for MyFunction {
//! #     type Field = f64;
//! #
//! #     fn domain(&self) -> Domain<Self::Field> {
//! #         Domain::rect(vec![-5.0, -5.0], vec![5.0, 5.0])
//! #     }
//! # }
//!
//! let f = MyFunction::new();
//!
//! let driver = PowellDriver::builder(&f)
//!     .with_initial(vec![3.0, -3.0])
//!     .with_budget_cap(1000)
//!     .build();
//! ```
//!
//! Once you have the driver, run the refinement to completion:
//!
//! ```rust
//! # use dirmin::nalgebra as na;
//! # use dirmin::{Domain, Function, PowellDriver, Problem};
//! # use na::{Dyn, IsContiguous};
//! #
//! # struct MyFunction;
//! #
//! # impl MyFunction {
//! #     fn new() -> Self {
//! #         Self
//! #     }
//! # }
//! #
//! # impl Problem for MyFunction {
//! #     type Field = f64;
//! #
//! #     fn domain(&self) -> Domain<Self::Field> {
//! #         Domain::rect(vec![-5.0, -5.0], vec![5.0, 5.0])
//! #     }
//! # }
//! #
//! # impl Function for MyFunction {
//! #     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
//! #     where
//! #         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
//! #     {
//! #         x.iter().map(|xi| xi * xi).sum()
//! #     }
//! # }
//! #
//! # let f = MyFunction::new();
//! #
//! # let mut driver = PowellDriver::builder(&f)
//! #     .with_initial(vec![3.0, -3.0])
//! #     .with_budget_cap(1000)
//! #     .build();
//! #
//! let report = driver.run();
//! println!("fx = {} at x = {:?}", driver.fx(), driver.x());
//! ```
//!
//! At least one of the budget cap and the iteration limit should be set;
//! without both, the run ends only when the method degenerates.

use nalgebra::{convert, DimName, Dyn, OVector, U1};

use crate::algo::powell::{Powell, PowellOptions, PowellReport};
use crate::core::{Domain, EvalBudget, Function, Problem};

/// Builder for the [`PowellDriver`].
pub struct PowellBuilder<'a, F: Problem> {
    f: &'a F,
    dom: Domain<F::Field>,
    options: PowellOptions<F>,
    x0: OVector<F::Field, Dyn>,
    budget: EvalBudget,
}

impl<'a, F: Problem> PowellBuilder<'a, F> {
    fn new(f: &'a F) -> Self {
        let dom = f.domain();
        let dim = Dyn(dom.dim());
        let x0 = OVector::from_element_generic(dim, U1::name(), convert(0.0));

        Self {
            f,
            dom,
            options: PowellOptions::default(),
            x0,
            budget: EvalBudget::unlimited(),
        }
    }

    /// Sets the initial point from which the refinement starts.
    pub fn with_initial(mut self, x0: Vec<F::Field>) -> Self {
        let dim = Dyn(self.dom.dim());
        self.x0 = OVector::from_vec_generic(dim, U1::name(), x0);
        self
    }

    /// Sets the cap on the number of objective evaluations.
    pub fn with_budget_cap(mut self, cap: usize) -> Self {
        self.budget = EvalBudget::capped(cap);
        self
    }

    /// Sets the optimizer options.
    pub fn with_options(mut self, options: PowellOptions<F>) -> Self {
        self.options = options;
        self
    }

    /// Builds the [`PowellDriver`], projecting the initial point into the
    /// domain.
    pub fn build(mut self) -> PowellDriver<'a, F> {
        self.dom.project(&mut self.x0);
        let powell = Powell::with_options(self.f, &self.dom, self.options);

        PowellDriver {
            f: self.f,
            dom: self.dom,
            powell,
            x: self.x0,
            fx: convert(f64::INFINITY),
            budget: self.budget,
        }
    }
}

/// The driver for a Powell refinement run.
///
/// For default settings, use [`PowellDriver::new`]. For more flexibility, use
/// [`PowellDriver::builder`]. For the usage of the driver, see [module](self)
/// documentation.
pub struct PowellDriver<'a, F: Problem> {
    f: &'a F,
    dom: Domain<F::Field>,
    powell: Powell<F>,
    x: OVector<F::Field, Dyn>,
    fx: F::Field,
    budget: EvalBudget,
}

impl<'a, F: Problem> PowellDriver<'a, F> {
    /// Returns the builder for specifying additional settings.
    pub fn builder(f: &'a F) -> PowellBuilder<'a, F> {
        PowellBuilder::new(f)
    }

    /// Initializes the driver with the default settings.
    pub fn new(f: &'a F) -> Self {
        PowellDriver::builder(f).build()
    }

    /// Returns reference to the current point.
    pub fn x(&self) -> &[F::Field] {
        self.x.as_slice()
    }

    /// Returns the current function value.
    pub fn fx(&self) -> F::Field {
        self.fx
    }

    /// Returns the number of objective evaluations spent so far.
    pub fn evals(&self) -> usize {
        self.budget.used()
    }

    /// Returns reference to the evaluation budget.
    pub fn budget(&self) -> &EvalBudget {
        &self.budget
    }
}

impl<'a, F: Function> PowellDriver<'a, F> {
    /// Runs the refinement to completion, returning the report.
    ///
    /// Can be called repeatedly; subsequent runs continue from the refined
    /// point with the direction set retained from the previous run.
    pub fn run(&mut self) -> PowellReport<F::Field> {
        let report = self
            .powell
            .minimize(self.f, &self.dom, &mut self.x, &mut self.budget);
        self.fx = report.fx;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::algo::powell::Termination;
    use crate::testing::Sphere;

    struct WithDomain(pub Domain<f64>);

    impl Problem for WithDomain {
        type Field = f64;

        fn domain(&self) -> Domain<Self::Field> {
            self.0.clone()
        }
    }

    #[test]
    fn basic_use_case() {
        let f = Sphere::new(4);
        let mut driver = PowellDriver::builder(&f)
            // Zeros are the optimum for sphere, there would be no point in
            // such test.
            .with_initial(vec![3.0; 4])
            .with_budget_cap(2000)
            .build();

        let report = driver.run();

        assert!(matches!(
            report.termination,
            Termination::BudgetExhausted | Termination::Degenerate
        ));
        assert!(driver.fx() <= 1e-6);
        assert!(driver.evals() <= 2001);
    }

    #[test]
    fn initial_point() {
        let x0 = vec![3.0; 4];

        let f = Sphere::new(4);
        let driver = PowellDriver::builder(&f).with_initial(x0.clone()).build();

        assert_eq!(driver.x(), &x0);
    }

    #[test]
    fn initial_point_in_domain() {
        let f = WithDomain(Domain::rect(vec![0.0, 0.0], vec![1.0, 1.0]));
        let driver = PowellDriver::builder(&f)
            .with_initial(vec![10.0, -10.0])
            .build();

        assert_eq!(driver.x(), &[1.0, 0.0]);
    }

    #[test]
    fn iteration_limited_run() {
        let f = Sphere::new(2);
        let mut options = PowellOptions::default();
        options.set_max_iters(Some(3));

        let mut driver = PowellDriver::builder(&f)
            .with_initial(vec![4.0, -4.0])
            .with_options(options)
            .build();

        let report = driver.run();

        assert_eq!(report.termination, Termination::IterationLimit);
        assert!(driver.fx() <= f.apply(&nalgebra::dvector![4.0, -4.0]));
    }
}
