//! Shared objective-evaluation budget.

/// Shared counter of objective evaluations with an optional hard cap.
///
/// The budget represents a resource that outlives any single refinement run:
/// the caller owns it and threads it by mutable reference through every call,
/// so that nested layers (the optimizer and its line searches) charge the
/// same counter. There is no interior mutability or locking; exclusive
/// ownership during one run is enforced by the mutable borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalBudget {
    used: usize,
    cap: Option<usize>,
}

impl EvalBudget {
    /// Creates a budget with a hard cap on the number of evaluations.
    pub fn capped(cap: usize) -> Self {
        Self {
            used: 0,
            cap: Some(cap),
        }
    }

    /// Creates a budget without a cap.
    pub fn unlimited() -> Self {
        Self { used: 0, cap: None }
    }

    /// Number of evaluations recorded so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// The hard cap, if any.
    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    /// Evaluations left before the cap is reached, if there is a cap.
    pub fn remaining(&self) -> Option<usize> {
        self.cap.map(|cap| cap.saturating_sub(self.used))
    }

    /// Records one evaluation and reports whether the cap has been reached.
    ///
    /// The check happens after the increment, so the evaluation that hits the
    /// cap always completes before the caller unwinds. A run can therefore
    /// overrun the cap by at most the one terminating evaluation.
    #[must_use]
    pub fn record(&mut self) -> bool {
        self.used += 1;
        self.is_exhausted()
    }

    /// Checks whether the cap has been reached.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.cap, Some(cap) if self.used >= cap)
    }
}

impl Default for EvalBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting() {
        let mut budget = EvalBudget::capped(3);
        assert_eq!(budget.used(), 0);
        assert_eq!(budget.remaining(), Some(3));

        assert!(!budget.record());
        assert!(!budget.record());
        assert!(!budget.is_exhausted());

        assert!(budget.record());
        assert!(budget.is_exhausted());
        assert_eq!(budget.used(), 3);
        assert_eq!(budget.remaining(), Some(0));
    }

    #[test]
    fn overrun_is_still_counted() {
        let mut budget = EvalBudget::capped(1);
        assert!(budget.record());
        assert!(budget.record());
        assert_eq!(budget.used(), 2);
        assert_eq!(budget.remaining(), Some(0));
    }

    #[test]
    fn unlimited_never_exhausts() {
        let mut budget = EvalBudget::unlimited();
        for _ in 0..1000 {
            assert!(!budget.record());
        }
        assert_eq!(budget.used(), 1000);
        assert_eq!(budget.cap(), None);
        assert_eq!(budget.remaining(), None);
    }

    #[test]
    fn zero_cap_is_exhausted_upfront() {
        let budget = EvalBudget::capped(0);
        assert!(budget.is_exhausted());
    }
}
