//! Bounded 1-D line search.
//!
//! Minimizes the objective restricted to the ray `x + alpha * direction`,
//! clipped to the box domain, using [golden-section
//! search](https://en.wikipedia.org/wiki/Golden-section_search) over the
//! feasible range of the step size. Every objective evaluation is charged
//! against the shared [budget](crate::core::EvalBudget); exhausting the
//! budget unwinds the search immediately.

use nalgebra::{convert, storage::Storage, ComplexField, Dyn, OVector, RealField, Vector};
use thiserror::Error;

use crate::core::{Domain, EvalBudget, Function};

/// Largest step magnitude used when the domain leaves the ray unbounded.
const STEP_LIMIT: f64 = 1e10;

/// Maximum number of bracket reductions of the scalar search.
const MAX_REDUCTIONS: usize = 100;

/// Error returned from the bounded line search.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LineSearchError {
    /// The shared evaluation budget was exhausted during the search.
    #[error("evaluation budget exhausted")]
    BudgetExhausted,
    /// The feasible step interval could not be ordered, which happens for NaN
    /// coordinates or an infeasible starting point.
    #[error("invalid feasible step interval")]
    InvalidInterval,
}

/// Result of one successful line search.
#[derive(Debug)]
pub struct LineSearchStep<T: RealField + Copy> {
    /// Accepted step size along the direction. The displacement vector is
    /// `alpha * direction`.
    pub alpha: T,
    /// The point `x + alpha * direction`, projected into the domain.
    pub x: OVector<T, Dyn>,
    /// Objective value at [`x`](LineSearchStep::x).
    pub fx: T,
}

/// Minimizes `f` restricted to the ray `x + alpha * direction` within the
/// domain, with absolute tolerance `tol` on `alpha`.
///
/// `fx` is the objective value at `x`; a degenerate ray (a direction with no
/// nonzero component, or no feasible step at all) makes the search a no-op
/// that returns the input point and `fx` back without evaluating the
/// objective.
pub fn line_search<F: Function, Sx, Sd>(
    f: &F,
    x: &Vector<F::Field, Dyn, Sx>,
    fx: F::Field,
    direction: &Vector<F::Field, Dyn, Sd>,
    dom: &Domain<F::Field>,
    budget: &mut EvalBudget,
    tol: F::Field,
) -> Result<LineSearchStep<F::Field>, LineSearchError>
where
    Sx: Storage<F::Field, Dyn>,
    Sd: Storage<F::Field, Dyn>,
{
    let zero: F::Field = convert(0.0);
    let one: F::Field = convert(1.0);

    let (lo, hi) = match dom.step_interval(x, direction) {
        Some(interval) => interval,
        None => {
            // Degenerate ray, nothing to search along.
            return Ok(LineSearchStep {
                alpha: zero,
                x: x.clone_owned(),
                fx,
            });
        }
    };

    // Only NaN endpoints fail to order here; an empty intersection has
    // already become a no-op above.
    if !(lo <= hi) {
        return Err(LineSearchError::InvalidInterval);
    }

    let limit: F::Field = convert(STEP_LIMIT);
    let lo = if lo.is_finite() { lo } else { -limit };
    let hi = if hi.is_finite() { hi } else { limit };

    let mut trial = x.clone_owned();
    let mut eval = |alpha: F::Field,
                    trial: &mut OVector<F::Field, Dyn>|
     -> Result<F::Field, LineSearchError> {
        trial.copy_from(x);
        trial.axpy(alpha, direction, one);
        // Clamp floating-point spill over the bounds.
        dom.project(trial);

        let value = f.apply(trial);
        if budget.record() {
            return Err(LineSearchError::BudgetExhausted);
        }
        Ok(value)
    };

    // Golden ratio reduction factors.
    let inv_phi: F::Field = convert((5.0f64.sqrt() - 1.0) / 2.0);
    let inv_phi2: F::Field = convert(1.0 - (5.0f64.sqrt() - 1.0) / 2.0);

    let mut a = lo;
    let mut b = hi;
    let mut x1 = a + inv_phi2 * (b - a);
    let mut x2 = a + inv_phi * (b - a);
    let mut f1 = eval(x1, &mut trial)?;
    let mut f2 = eval(x2, &mut trial)?;

    for _ in 0..MAX_REDUCTIONS {
        if b - a < tol {
            break;
        }

        if f1 < f2 {
            // Minimum is in [a, x2].
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = a + inv_phi2 * (b - a);
            f1 = eval(x1, &mut trial)?;
        } else {
            // Minimum is in [x1, b].
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = a + inv_phi * (b - a);
            f2 = eval(x2, &mut trial)?;
        }
    }

    // Midpoint of the final bracket.
    let alpha = (a + b) * convert(0.5);
    let fx = eval(alpha, &mut trial)?;

    Ok(LineSearchStep {
        alpha,
        x: trial,
        fx,
    })
}
