//! Powell's direction-set optimization method.
//!
//! [Powell's method](https://en.wikipedia.org/wiki/Powell%27s_method) is a
//! derivative-free local optimization algorithm. It keeps a set of _n_ search
//! directions, initially the standard orthonormal basis, and performs one
//! bounded [line search](crate::algo::line_search) along each of them per
//! iteration. After a full sweep, the net displacement is tried as a new
//! direction: if an extrapolated point along it improves on the start of the
//! sweep and Powell's acceptance test passes, the direction that produced the
//! biggest single-step decrease is retired in its favor, since it is the one
//! most likely to become linearly dependent with the new direction. The
//! direction set is deliberately never re-orthogonalized; rows may lose rank
//! over many iterations, which is a known property of the unmodified method.
//!
//! The run is governed by a shared [evaluation
//! budget](crate::core::EvalBudget): the optimizer stops cooperatively, and
//! without propagating any error, as soon as the budget is exhausted, the
//! iteration limit is reached or no direction produces a move.
//!
//! # References
//!
//! \[1\] [An efficient method for finding the minimum of a function of
//! several variables without calculating
//! derivatives](https://doi.org/10.1093/comjnl/7.2.155)
//!
//! \[2\] [Numerical
//! Recipes](https://www.cambridge.org/9780521880688), section 10.7
//!
//! \[3\] [Numerical
//! Optimization](https://link.springer.com/book/10.1007/978-0-387-40065-5)

use getset::{CopyGetters, Setters};
use log::{debug, warn};
use nalgebra::{
    convert, storage::StorageMut, DimName, Dyn, IsContiguous, OVector, RealField, Vector, U1,
};

use super::line_search::{line_search, LineSearchError};
use crate::core::{Domain, EvalBudget, Function, Problem};

/// Options for [`Powell`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct PowellOptions<P: Problem> {
    /// Absolute tolerance on the step size of each bounded line search.
    /// Default: `1e-4`.
    position_tol: P::Field,
    /// Relative improvement tolerance. Accepted for compatibility with the
    /// usual signature of the method; the run is budget-driven and this value
    /// does not currently terminate the iteration. Default: `1e-4`.
    improvement_tol: P::Field,
    /// Maximum number of full direction sweeps. Default: `None` (no limit).
    max_iters: Option<usize>,
}

impl<P: Problem> Default for PowellOptions<P> {
    fn default() -> Self {
        Self {
            position_tol: convert(1e-4),
            improvement_tol: convert(1e-4),
            max_iters: None,
        }
    }
}

/// Reason why a [`Powell::minimize`] run stopped.
///
/// None of these is an error; every stopping condition degrades to returning
/// the best point known so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The shared evaluation budget was exhausted.
    BudgetExhausted,
    /// The configured number of direction sweeps was reached.
    IterationLimit,
    /// No direction produced a usable move: the net displacement of a sweep
    /// was zero, or the objective values carry no progress signal (all NaN).
    Degenerate,
    /// An internal fault was caught at the optimizer boundary; see
    /// [`PowellReport::fault`].
    Faulted,
}

/// Diagnostic record for a caught internal fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    /// Iteration in which the fault occurred.
    pub iteration: usize,
    /// Subroutine that produced the fault.
    pub origin: &'static str,
}

/// Outcome of one [`Powell::minimize`] run.
///
/// The refined point itself is written back into the `x` argument of
/// [`Powell::minimize`]; the report carries the achieved value and the
/// stopping condition.
#[derive(Debug, Clone, PartialEq)]
pub struct PowellReport<T> {
    /// Objective value at the returned point.
    pub fx: T,
    /// Number of completed iterations (full direction sweeps).
    pub iterations: usize,
    /// Stopping condition.
    pub termination: Termination,
    /// Present if and only if the termination is [`Termination::Faulted`].
    pub fault: Option<Fault>,
}

/// Powell direction-set optimizer.
///
/// See [module](self) documentation for more details.
pub struct Powell<P: Problem> {
    options: PowellOptions<P>,
    directions: Vec<OVector<P::Field, Dyn>>,
    x_old: OVector<P::Field, Dyn>,
    new_direction: OVector<P::Field, Dyn>,
    trial: OVector<P::Field, Dyn>,
}

impl<P: Problem> Powell<P> {
    /// Initializes Powell optimizer with default options.
    pub fn new(p: &P, dom: &Domain<P::Field>) -> Self {
        Self::with_options(p, dom, PowellOptions::default())
    }

    /// Initializes Powell optimizer with given options.
    pub fn with_options(_: &P, dom: &Domain<P::Field>, options: PowellOptions<P>) -> Self {
        let dim = Dyn(dom.dim());

        Self {
            options,
            directions: identity_directions(dom.dim()),
            x_old: OVector::zeros_generic(dim, U1::name()),
            new_direction: OVector::zeros_generic(dim, U1::name()),
            trial: OVector::zeros_generic(dim, U1::name()),
        }
    }

    /// Restores the direction set to the standard orthonormal basis.
    pub fn reset(&mut self) {
        self.directions = identity_directions(self.x_old.nrows());
    }

    /// Replaces the direction set, e.g., to warm-start from a previous run.
    ///
    /// Panics if the number of directions or their dimension does not match
    /// the domain the optimizer was initialized with.
    pub fn set_directions(&mut self, directions: Vec<OVector<P::Field, Dyn>>) {
        let n = self.x_old.nrows();
        assert!(directions.len() == n, "invalid number of directions");
        assert!(
            directions.iter().all(|d| d.nrows() == n),
            "invalid direction dimension"
        );
        self.directions = directions;
    }
}

impl<F: Function> Powell<F> {
    /// Runs the refinement from `x`, writing the best point found back into
    /// `x` and returning the stopping condition.
    ///
    /// The point is first projected into the domain. Every objective
    /// evaluation, including the initial one, is charged against `budget`.
    /// This method never fails: budget exhaustion and degeneracy are ordinary
    /// stopping conditions, and an internal fault is caught, logged and
    /// reported in the returned [`PowellReport`] while `x` keeps the best
    /// point known before the fault.
    pub fn minimize<Sx>(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        x: &mut Vector<F::Field, Dyn, Sx>,
        budget: &mut EvalBudget,
    ) -> PowellReport<F::Field>
    where
        Sx: StorageMut<F::Field, Dyn> + IsContiguous,
    {
        let n = dom.dim();
        assert!(x.nrows() == n, "invalid dimensionality of x");
        assert!(
            self.x_old.nrows() == n,
            "optimizer initialized for a different dimension"
        );

        let zero: F::Field = convert(0.0);
        let one: F::Field = convert(1.0);
        let two: F::Field = convert(2.0);
        let tol = self.options.position_tol;

        dom.project(x);

        let mut fx = f.apply(x);
        if budget.record() {
            return finished(fx, 0, Termination::BudgetExhausted);
        }

        let mut iterations = 0;

        loop {
            self.x_old.copy_from(x);
            let f_old = fx;

            let mut delta = zero;
            let mut biggest_decrease_index = 0;

            for i in 0..n {
                let f_before = fx;

                let step = match line_search(f, x, fx, &self.directions[i], dom, budget, tol) {
                    Ok(step) => step,
                    Err(LineSearchError::BudgetExhausted) => {
                        return finished(fx, iterations, Termination::BudgetExhausted);
                    }
                    Err(LineSearchError::InvalidInterval) => {
                        return faulted(fx, iterations, "line search");
                    }
                };

                // The search returns the midpoint of its final bracket, which
                // can be slightly worse than the incoming point near an
                // optimum. Such a step is discarded to keep the run monotone.
                // A NaN incoming value never blocks a finite step.
                if step.fx <= fx || fx.is_nan_value() {
                    x.copy_from(&step.x);
                    fx = step.fx;
                }

                // NaN decrease fails the comparison and is not tracked.
                let decrease = f_before - fx;
                if decrease > delta {
                    delta = decrease;
                    biggest_decrease_index = i;
                }
            }

            debug!(
                "sweep {}: fx {:?} -> {:?}, biggest decrease {:?} along direction {}",
                iterations, f_old, fx, delta, biggest_decrease_index
            );

            if budget.is_exhausted() {
                return finished(fx, iterations, Termination::BudgetExhausted);
            }

            if let Some(max_iters) = self.options.max_iters {
                if iterations >= max_iters {
                    return finished(fx, iterations, Termination::IterationLimit);
                }
            }

            // Both values NaN means there is no usable progress signal.
            if f_old.is_nan_value() && fx.is_nan_value() {
                return finished(fx, iterations, Termination::Degenerate);
            }

            x.sub_to(&self.x_old, &mut self.new_direction);
            if self.new_direction.iter().all(|di| *di == zero) {
                return finished(fx, iterations, Termination::Degenerate);
            }

            // Extrapolate along the net displacement of the sweep, clipped to
            // the domain.
            let lambda = match dom.step_interval(x, &self.new_direction) {
                // The comparison is written so that a NaN bound falls back to
                // the unit step.
                Some((_, lambda_max)) => {
                    if lambda_max < one {
                        lambda_max
                    } else {
                        one
                    }
                }
                // Unreachable: the direction has a nonzero component.
                None => one,
            };

            self.trial.copy_from(x);
            self.trial.axpy(lambda, &self.new_direction, one);
            dom.project(&mut self.trial);

            let f_ext = f.apply(&self.trial);
            if budget.record() {
                return finished(fx, iterations, Termination::BudgetExhausted);
            }

            if f_ext < f_old {
                let f_diff = f_old - fx;
                let t = two * (f_old - two * fx + f_ext) * (f_diff - delta) * (f_diff - delta)
                    - delta * (f_old - f_ext) * (f_old - f_ext);

                if t < zero {
                    // Retire the direction of the biggest decrease and adopt
                    // the net displacement as a new search direction.
                    let last = n - 1;
                    self.directions.swap(biggest_decrease_index, last);
                    self.directions[last].copy_from(&self.new_direction);

                    let step =
                        match line_search(f, x, fx, &self.new_direction, dom, budget, tol) {
                            Ok(step) => step,
                            Err(LineSearchError::BudgetExhausted) => {
                                return finished(fx, iterations, Termination::BudgetExhausted);
                            }
                            Err(LineSearchError::InvalidInterval) => {
                                return faulted(fx, iterations, "line search");
                            }
                        };

                    if step.fx <= fx || fx.is_nan_value() {
                        x.copy_from(&step.x);
                        fx = step.fx;
                    }

                    debug!("adopted new direction with fx {:?}", fx);
                }
            }

            iterations += 1;
        }
    }
}

fn finished<T>(fx: T, iterations: usize, termination: Termination) -> PowellReport<T> {
    PowellReport {
        fx,
        iterations,
        termination,
        fault: None,
    }
}

fn faulted<T>(fx: T, iterations: usize, origin: &'static str) -> PowellReport<T> {
    warn!(
        "caught internal fault in {} at iteration {}, returning best point so far",
        origin, iterations
    );

    PowellReport {
        fx,
        iterations,
        termination: Termination::Faulted,
        fault: Some(Fault {
            iteration: iterations,
            origin,
        }),
    }
}

fn identity_directions<T: RealField + Copy>(n: usize) -> Vec<OVector<T, Dyn>> {
    (0..n)
        .map(|i| {
            let mut e = OVector::zeros_generic(Dyn(n), U1::name());
            e[i] = convert(1.0);
            e
        })
        .collect()
}

trait RealFieldPowellExt {
    fn is_nan_value(&self) -> bool;
}

impl<T: RealField> RealFieldPowellExt for T {
    fn is_nan_value(&self) -> bool {
        // NaN is the only value that is not equal to itself.
        self != self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use nalgebra::{dvector, storage::Storage, DVector};

    use crate::testing::*;

    fn refine<F: TestFunction<Field = f64>>(
        f: &F,
        x0: DVector<f64>,
        cap: usize,
    ) -> (DVector<f64>, PowellReport<f64>, usize) {
        let dom = f.domain();
        let mut x = x0;
        let mut budget = EvalBudget::capped(cap);
        let mut powell = Powell::new(f, &dom);
        let report = powell.minimize(f, &dom, &mut x, &mut budget);
        let used = budget.used();
        (x, report, used)
    }

    #[test]
    fn sphere_within_budget() {
        let f = Sphere::new(5);
        let (x, report, used) = refine(&f, DVector::from_element(5, 3.0), 2000);

        assert!(matches!(
            report.termination,
            Termination::BudgetExhausted | Termination::Degenerate
        ));
        assert!(x.norm() <= 1e-3);
        assert!(used <= 2001);
        assert!(f.domain().contains(&x));
    }

    #[test]
    fn sphere_tiny_budget() {
        let f = Sphere::new(5);
        let x0 = DVector::from_element(5, 3.0);
        let f0 = f.apply(&x0);

        let (x, report, used) = refine(&f, x0.clone(), 5);

        assert_eq!(report.termination, Termination::BudgetExhausted);
        assert!(used <= 6);
        // No worse than the starting point.
        assert!(f.apply(&x) <= f0);
        assert_eq!(report.fx, f.apply(&x));
    }

    #[test]
    fn starting_at_optimum_never_worsens() {
        let f = Sphere::new(2);
        let (x, report, _) = refine(&f, DVector::zeros(2), 200);

        // No bracket midpoint can replace the exact optimum.
        assert_eq!(report.fx, 0.0);
        assert_eq!(x, DVector::zeros(2));
        assert_eq!(report.termination, Termination::Degenerate);
    }

    #[test]
    fn determinism() {
        let f = Sphere::new(4);
        let (x1, report1, _) = refine(&f, DVector::from_element(4, 2.5), 700);
        let (x2, report2, _) = refine(&f, DVector::from_element(4, 2.5), 700);

        assert_eq!(x1, x2);
        assert_eq!(report1, report2);
    }

    #[test]
    fn monotone_on_rosenbrock() {
        let f = ExtendedRosenbrock::new(2);
        let x0 = dvector![-1.2, 1.0];
        let f0 = f.apply(&x0);

        let (x, report, _) = refine(&f, x0, 4000);

        assert!(report.fx <= f0);
        assert!(f.apply(&x) < 5.0);
        assert!(f.domain().contains(&x));
    }

    #[test]
    fn boundary_optimum_stays_feasible() {
        struct BoxedQuadratic;

        impl Problem for BoxedQuadratic {
            type Field = f64;

            fn domain(&self) -> Domain<Self::Field> {
                Domain::rect(vec![1.0, 1.0], vec![5.0, 5.0])
            }
        }

        impl Function for BoxedQuadratic {
            fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
            where
                Sx: Storage<Self::Field, Dyn> + IsContiguous,
            {
                x.iter().map(|xi| xi * xi).sum()
            }
        }

        let f = BoxedQuadratic;
        let dom = f.domain();
        let mut x = dvector![4.0, 3.0];
        let mut budget = EvalBudget::capped(500);
        let mut powell = Powell::new(&f, &dom);

        let _ = powell.minimize(&f, &dom, &mut x, &mut budget);

        // The constrained minimum lies in the corner of the box.
        assert!(dom.contains(&x));
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn zero_direction_set_degenerates() {
        let f = Sphere::new(3);
        let dom = f.domain();
        let mut powell = Powell::new(&f, &dom);
        powell.set_directions(vec![DVector::zeros(3); 3]);

        let mut x = dvector![1.0, -2.0, 0.5];
        let mut budget = EvalBudget::capped(100);
        let report = powell.minimize(&f, &dom, &mut x, &mut budget);

        assert_eq!(report.termination, Termination::Degenerate);
        assert_eq!(report.iterations, 0);
        // Only the initial evaluation was spent and the point is unchanged.
        assert_eq!(budget.used(), 1);
        assert_eq!(x, dvector![1.0, -2.0, 0.5]);
    }

    #[test]
    fn nan_objective_degenerates() {
        let f = NanPlateau::new(2);
        let dom = f.domain();
        let mut x = dvector![0.0, 0.0];
        let mut budget = EvalBudget::capped(1000);
        let mut powell = Powell::new(&f, &dom);

        let report = powell.minimize(&f, &dom, &mut x, &mut budget);

        assert_eq!(report.termination, Termination::Degenerate);
        assert!(report.fx.is_nan());
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn iteration_limit() {
        let f = Sphere::new(2);
        let dom = f.domain();
        let mut options = PowellOptions::default();
        options.set_max_iters(Some(0));
        let mut powell = Powell::with_options(&f, &dom, options);

        let mut x = dvector![3.0, -2.0];
        let mut budget = EvalBudget::capped(10_000);
        let report = powell.minimize(&f, &dom, &mut x, &mut budget);

        assert_eq!(report.termination, Termination::IterationLimit);
        assert_eq!(report.iterations, 0);
        // One full sweep still ran.
        assert!(report.fx <= 13.0);
    }

    #[test]
    fn nan_coordinates_fault() {
        let f = Sphere::new(2);
        let dom = f.domain();
        let mut x = dvector![f64::NAN, 1.0];
        let mut budget = EvalBudget::capped(100);
        let mut powell = Powell::new(&f, &dom);

        let report = powell.minimize(&f, &dom, &mut x, &mut budget);

        assert_eq!(report.termination, Termination::Faulted);
        let fault = report.fault.unwrap();
        assert_eq!(fault.iteration, 0);
        assert_eq!(fault.origin, "line search");
    }

    #[test]
    fn exhausted_budget_on_entry() {
        let f = Sphere::new(2);
        let dom = f.domain();
        let mut x = dvector![3.0, 1.0];
        let mut budget = EvalBudget::capped(1);
        let mut powell = Powell::new(&f, &dom);

        let report = powell.minimize(&f, &dom, &mut x, &mut budget);

        assert_eq!(report.termination, Termination::BudgetExhausted);
        assert_eq!(report.iterations, 0);
        assert_eq!(budget.used(), 1);
        assert_eq!(x, dvector![3.0, 1.0]);
    }

    #[test]
    fn projects_initial_point() {
        let f = Sphere::new(2);
        let dom = f.domain();
        let mut x = dvector![100.0, -100.0];
        let mut budget = EvalBudget::capped(1);
        let mut powell = Powell::new(&f, &dom);

        let _ = powell.minimize(&f, &dom, &mut x, &mut budget);

        assert_eq!(x, dvector![5.0, -5.0]);
    }
}
