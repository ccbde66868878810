//! Strongly-typed step counter.

use std::fmt;

/// Number of completed time steps.
///
/// Starts at 0 when a simulation state is created and is incremented by
/// exactly one each time a step finishes its buffer swap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl StepId {
    /// The step after this one.
    ///
    /// Saturates at `u64::MAX`; a run that long is not representable by
    /// any configuration anyway.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_increments_by_one() {
        assert_eq!(StepId(0).next(), StepId(1));
        assert_eq!(StepId(41).next().0, 42);
    }

    #[test]
    fn next_saturates() {
        assert_eq!(StepId(u64::MAX).next(), StepId(u64::MAX));
    }
}
