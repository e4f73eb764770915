/// A condition polled by [`wait_until`](crate::wait::wait_until).
pub trait WaitCriterion {
    /// True once the awaited condition holds
    fn done(&self) -> bool;

    /// Message reported when the condition never held before the timeout.
    ///
    /// Only evaluated on timeout, so it may read live state.
    fn description(&self) -> String;
}

/// A criterion built from a predicate closure and a description closure.
pub struct Criterion<P, D> {
    done: P,
    description: D,
}

impl<P, D> Criterion<P, D>
where
    P: Fn() -> bool,
    D: Fn() -> String,
{
    pub fn new(done: P, description: D) -> Self {
        Self { done, description }
    }
}

impl<P, D> WaitCriterion for Criterion<P, D>
where
    P: Fn() -> bool,
    D: Fn() -> String,
{
    fn done(&self) -> bool {
        (self.done)()
    }

    fn description(&self) -> String {
        (self.description)()
    }
}

impl<P, D> std::fmt::Debug for Criterion<P, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Criterion").finish_non_exhaustive()
    }
}
