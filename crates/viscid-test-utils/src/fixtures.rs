//! Reusable initial conditions and a failing sink.
//!
//! - [`spike`]: uniform field with one perturbed cell.
//! - [`checker_noise`]: deterministic, irregular values everywhere.
//! - [`FailingSink`]: fails deterministically after N successful calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use viscid_core::{DiagnosticSink, PlaneView, SinkError, SnapshotSink, StepId};

/// `base` everywhere except `(at_i, at_j)`, where `u` is `peak`.
///
/// `v` is 0 everywhere.
pub fn spike(
    base: f64,
    peak: f64,
    at_i: usize,
    at_j: usize,
) -> impl Fn(usize, usize) -> (f64, f64) + Copy {
    move |i, j| {
        if (i, j) == (at_i, at_j) {
            (peak, 0.0)
        } else {
            (base, 0.0)
        }
    }
}

/// Irregular but deterministic values in roughly `[-1, 1]` for `u` and
/// `[-2, 2]` for `v`, varied by `seed`.
///
/// Exercises every cell of the stencil with distinct neighbours, which a
/// smooth field would not.
pub fn checker_noise(seed: u64) -> impl Fn(usize, usize) -> (f64, f64) + Copy {
    move |i, j| {
        let mut h = seed
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(((i as u64) << 32) | j as u64);
        h ^= h >> 33;
        h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
        h ^= h >> 33;
        let a = (h & 0xFFFF) as f64 / 32768.0 - 1.0;
        let b = ((h >> 16) & 0xFFFF) as f64 / 16384.0 - 2.0;
        (a, b)
    }
}

/// A sink that succeeds `succeed_count` times and then always fails.
///
/// Implements both sink traits. Uses `AtomicUsize` for the call counter
/// so the count is readable through a shared reference.
pub struct FailingSink {
    pub reason: String,
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingSink {
    /// Fail on every call with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self::after(reason, 0)
    }

    /// Succeed `succeed_count` times, then fail with `reason`.
    pub fn after(reason: impl Into<String>, succeed_count: usize) -> Self {
        Self {
            reason: reason.into(),
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `write` or `report` has been called.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    fn tick(&self) -> Result<(), SinkError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(SinkError::Io {
                reason: self.reason.clone(),
            });
        }
        Ok(())
    }
}

impl SnapshotSink for FailingSink {
    fn write(&mut self, _step: StepId, _u: PlaneView<'_>, _v: PlaneView<'_>) -> Result<(), SinkError> {
        self.tick()
    }
}

impl DiagnosticSink for FailingSink {
    fn report(&mut self, _step: StepId, _metric: f64) -> Result<(), SinkError> {
        self.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viscid_core::Initializer;

    #[test]
    fn spike_has_one_peak() {
        let init = spike(1.0, 2.0, 2, 2);
        assert_eq!(init.value(2, 2), (2.0, 0.0));
        assert_eq!(init.value(2, 3), (1.0, 0.0));
    }

    #[test]
    fn checker_noise_is_deterministic_and_bounded() {
        let a = checker_noise(7);
        let b = checker_noise(7);
        let c = checker_noise(8);
        let mut differs = false;
        for i in 0..10 {
            for j in 0..10 {
                let (u, v) = a.value(i, j);
                assert_eq!((u, v), b.value(i, j));
                assert!((-1.0..1.0).contains(&u));
                assert!((-2.0..2.0).contains(&v));
                differs |= c.value(i, j) != (u, v);
            }
        }
        assert!(differs);
    }

    #[test]
    fn failing_sink_counts_calls() {
        let mut sink = FailingSink::after("boom", 1);
        assert!(DiagnosticSink::report(&mut sink, StepId(0), 0.0).is_ok());
        assert_eq!(
            DiagnosticSink::report(&mut sink, StepId(1), 0.0),
            Err(SinkError::Io {
                reason: "boom".into()
            })
        );
        assert_eq!(sink.calls(), 2);
    }
}
