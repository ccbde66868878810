//! When the loop hands state to its sinks.

use std::num::NonZeroU64;

use smallvec::SmallVec;
use viscid_core::StepId;

/// Which completed-step counts are sampled.
///
/// A step matches when it is a multiple of the cadence or appears in the
/// milestone list. Step 0 is the initial state; it matches any cadence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SamplingPolicy {
    every: Option<NonZeroU64>,
    milestones: SmallVec<[u64; 8]>,
}

impl SamplingPolicy {
    /// A policy that never samples.
    pub fn never() -> Self {
        Self::default()
    }

    /// Sample every `k` steps. `k = 0` disables the cadence.
    pub fn every(k: u64) -> Self {
        Self {
            every: NonZeroU64::new(k),
            milestones: SmallVec::new(),
        }
    }

    /// Sample exactly at the listed steps.
    pub fn at(steps: impl IntoIterator<Item = u64>) -> Self {
        Self::never().with_milestones(steps)
    }

    /// Add milestone steps. Duplicates are collapsed.
    pub fn with_milestones(mut self, steps: impl IntoIterator<Item = u64>) -> Self {
        self.milestones.extend(steps);
        self.milestones.sort_unstable();
        self.milestones.dedup();
        self
    }

    /// The cadence, if any.
    pub fn cadence(&self) -> Option<u64> {
        self.every.map(NonZeroU64::get)
    }

    /// Sorted, deduplicated milestones.
    pub fn milestones(&self) -> &[u64] {
        &self.milestones
    }

    /// `true` when nothing would ever be sampled.
    pub fn is_never(&self) -> bool {
        self.every.is_none() && self.milestones.is_empty()
    }

    /// Whether the state after `step` completed steps is sampled.
    pub fn matches(&self, step: StepId) -> bool {
        if let Some(k) = self.every {
            if step.0 % k.get() == 0 {
                return true;
            }
        }
        self.milestones.binary_search(&step.0).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_matches_nothing() {
        let p = SamplingPolicy::never();
        assert!(p.is_never());
        assert!((0..100).all(|s| !p.matches(StepId(s))));
    }

    #[test]
    fn zero_cadence_is_never() {
        assert!(SamplingPolicy::every(0).is_never());
    }

    #[test]
    fn cadence_includes_initial_state() {
        let p = SamplingPolicy::every(100);
        assert!(p.matches(StepId(0)));
        assert!(p.matches(StepId(100)));
        assert!(p.matches(StepId(500)));
        assert!(!p.matches(StepId(99)));
        assert_eq!(p.cadence(), Some(100));
    }

    #[test]
    fn milestones_are_sorted_and_deduplicated() {
        let p = SamplingPolicy::at([50, 1, 50, 7]);
        assert_eq!(p.milestones(), &[1, 7, 50]);
        assert!(p.matches(StepId(7)));
        assert!(!p.matches(StepId(0)));
        assert!(!p.matches(StepId(8)));
    }

    #[test]
    fn cadence_and_milestones_combine() {
        let p = SamplingPolicy::every(10).with_milestones([3]);
        assert!(p.matches(StepId(3)));
        assert!(p.matches(StepId(20)));
        assert!(!p.matches(StepId(13)));
    }
}
