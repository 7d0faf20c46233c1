//! Problem domain definition such as bound constraints for variables.

use nalgebra::{
    convert,
    storage::{Storage, StorageMut},
    Dim, DimName, Dyn, OVector, RealField, Vector, U1,
};

/// Rectangular domain for a problem.
///
/// The domain is immutable for the duration of one refinement run. Lower and
/// upper bounds can be negative/positive infinity to leave a variable
/// unbounded in that direction.
#[derive(Debug, Clone)]
pub struct Domain<T: RealField + Copy> {
    lower: OVector<T, Dyn>,
    upper: OVector<T, Dyn>,
}

impl<T: RealField + Copy> Domain<T> {
    /// Creates unconstrained domain with given dimension.
    pub fn unconstrained(dim: usize) -> Self {
        assert!(dim > 0, "empty domain");

        let inf: T = convert(f64::INFINITY);
        Self {
            lower: OVector::from_element_generic(Dyn(dim), U1::name(), -inf),
            upper: OVector::from_element_generic(Dyn(dim), U1::name(), inf),
        }
    }

    /// Creates rectangular domain with given bounds.
    ///
    /// Positive and negative infinity can be used to indicate value unbounded
    /// in that dimension and direction. If the entire domain is
    /// unconstrained, use [`Domain::unconstrained`] instead.
    pub fn rect(lower: Vec<T>, upper: Vec<T>) -> Self {
        assert!(!lower.is_empty(), "empty domain");
        assert!(
            lower.len() == upper.len(),
            "lower and upper have different size"
        );
        assert!(
            lower.iter().zip(upper.iter()).all(|(li, ui)| li <= ui),
            "lower is greater than upper"
        );

        let dim = Dyn(lower.len());
        Self {
            lower: OVector::from_vec_generic(dim, U1::name(), lower),
            upper: OVector::from_vec_generic(dim, U1::name(), upper),
        }
    }

    /// Gets the dimension of the domain.
    pub fn dim(&self) -> usize {
        self.lower.nrows()
    }

    /// Gets the lower bounds.
    pub fn lower(&self) -> &OVector<T, Dyn> {
        &self.lower
    }

    /// Gets the upper bounds.
    pub fn upper(&self) -> &OVector<T, Dyn> {
        &self.upper
    }

    /// Projects given point into the domain.
    ///
    /// Returns true if the point was outside the domain and clamping
    /// occurred.
    pub fn project<D, Sx>(&self, x: &mut Vector<T, D, Sx>) -> bool
    where
        D: Dim,
        Sx: StorageMut<T, D>,
    {
        let mut not_feasible = false;

        self.lower
            .iter()
            .zip(self.upper.iter())
            .zip(x.iter_mut())
            .for_each(|((li, ui), xi)| {
                if &*xi < li {
                    *xi = *li;
                    not_feasible = true;
                } else if &*xi > ui {
                    *xi = *ui;
                    not_feasible = true;
                }
            });

        not_feasible
    }

    /// Checks whether given point satisfies the bounds componentwise.
    pub fn contains<D, Sx>(&self, x: &Vector<T, D, Sx>) -> bool
    where
        D: Dim,
        Sx: Storage<T, D>,
    {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .zip(x.iter())
            .all(|((li, ui), xi)| li <= xi && xi <= ui)
    }

    /// Computes the feasible range of step sizes along a direction.
    ///
    /// The result is the interval of `alpha` such that
    /// `x + alpha * direction` stays within the bounds componentwise. Zero
    /// components of the direction are unbounded in that axis. For a feasible
    /// `x`, the interval always contains zero.
    ///
    /// Returns `None` if the direction has no nonzero component or the
    /// per-axis intervals have an empty intersection (possible only for an
    /// infeasible `x`), in which case there is no ray to search along. A NaN
    /// in `x` or `direction` poisons the interval endpoints so that the
    /// caller can surface the condition as a fault.
    pub fn step_interval<Sx, Sd>(
        &self,
        x: &Vector<T, Dyn, Sx>,
        direction: &Vector<T, Dyn, Sd>,
    ) -> Option<(T, T)>
    where
        Sx: Storage<T, Dyn>,
        Sd: Storage<T, Dyn>,
    {
        let zero: T = convert(0.0);
        let mut lo: T = convert(f64::NEG_INFINITY);
        let mut hi: T = convert(f64::INFINITY);
        let mut bounded = false;

        for i in 0..self.dim() {
            let di = direction[i];
            if di == zero {
                continue;
            }
            bounded = true;

            let low = (self.lower[i] - x[i]) / di;
            let high = (self.upper[i] - x[i]) / di;
            let (low, high) = if low <= high { (low, high) } else { (high, low) };

            // Negated comparisons let NaN replace the endpoint instead of
            // being silently skipped.
            if !(low <= lo) {
                lo = low;
            }
            if !(high >= hi) {
                hi = high;
            }
        }

        if !bounded {
            return None;
        }

        // This comparison is false for NaN endpoints, which are passed
        // through for the caller to detect.
        if lo > hi {
            return None;
        }

        Some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra::dvector;

    #[test]
    fn rect_dimensions() {
        let dom = Domain::rect(vec![-5.0, 0.0], vec![5.0, 10.0]);
        assert_eq!(dom.dim(), 2);
        assert_eq!(dom.lower(), &dvector![-5.0, 0.0]);
        assert_eq!(dom.upper(), &dvector![5.0, 10.0]);
    }

    #[test]
    #[should_panic(expected = "lower is greater than upper")]
    fn rect_invalid_bounds() {
        let _ = Domain::rect(vec![1.0], vec![0.0]);
    }

    #[test]
    fn project_clamps() {
        let dom = Domain::rect(vec![0.0, 0.0], vec![1.0, 1.0]);

        let mut x = dvector![10.0, -10.0];
        assert!(dom.project(&mut x));
        assert_eq!(x, dvector![1.0, 0.0]);

        let mut x = dvector![0.5, 0.5];
        assert!(!dom.project(&mut x));
        assert_eq!(x, dvector![0.5, 0.5]);
    }

    #[test]
    fn contains_bounds() {
        let dom = Domain::rect(vec![-1.0, -1.0], vec![1.0, 1.0]);
        assert!(dom.contains(&dvector![0.0, 1.0]));
        assert!(!dom.contains(&dvector![0.0, 1.5]));
    }

    #[test]
    fn step_interval_axis_direction() {
        let dom = Domain::rect(vec![-5.0, -5.0], vec![5.0, 5.0]);

        let (lo, hi) = dom
            .step_interval(&dvector![3.0, 0.0], &dvector![1.0, 0.0])
            .unwrap();
        assert_eq!((lo, hi), (-8.0, 2.0));

        // Scaled direction scales the interval.
        let (lo, hi) = dom
            .step_interval(&dvector![0.0, 0.0], &dvector![2.0, 0.0])
            .unwrap();
        assert_eq!((lo, hi), (-2.5, 2.5));
    }

    #[test]
    fn step_interval_negative_direction() {
        let dom = Domain::rect(vec![-5.0], vec![5.0]);
        let (lo, hi) = dom
            .step_interval(&dvector![1.0], &dvector![-1.0])
            .unwrap();
        assert_eq!((lo, hi), (-4.0, 6.0));
    }

    #[test]
    fn step_interval_intersects_axes() {
        let dom = Domain::rect(vec![-5.0, -5.0], vec![5.0, 5.0]);
        let (lo, hi) = dom
            .step_interval(&dvector![1.0, 2.0], &dvector![1.0, 1.0])
            .unwrap();
        assert_eq!((lo, hi), (-6.0, 3.0));
    }

    #[test]
    fn step_interval_zero_direction() {
        let dom = Domain::rect(vec![-5.0, -5.0], vec![5.0, 5.0]);
        assert!(dom
            .step_interval(&dvector![1.0, 2.0], &dvector![0.0, 0.0])
            .is_none());
    }

    #[test]
    fn step_interval_empty_intersection() {
        let dom = Domain::rect(vec![-5.0, -5.0], vec![5.0, 5.0]);
        // From an infeasible point, no single step along the diagonal can
        // satisfy both axes at once.
        assert!(dom
            .step_interval(&dvector![10.0, -10.0], &dvector![1.0, 1.0])
            .is_none());
    }

    #[test]
    fn step_interval_unbounded_axis() {
        let dom: Domain<f64> = Domain::unconstrained(2);
        let (lo, hi) = dom
            .step_interval(&dvector![0.0, 0.0], &dvector![1.0, 0.0])
            .unwrap();
        assert!(!lo.is_finite());
        assert!(!hi.is_finite());
    }

    #[test]
    fn step_interval_nan_poisons_endpoints() {
        let dom = Domain::rect(vec![-5.0], vec![5.0]);
        let (lo, hi) = dom
            .step_interval(&dvector![f64::NAN], &dvector![1.0])
            .unwrap();
        assert!(lo.is_nan());
        assert!(hi.is_nan());
    }
}
