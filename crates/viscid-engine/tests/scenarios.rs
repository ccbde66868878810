//! Integration test: end-to-end numerical scenarios.
//!
//! Runs whole simulations through the public API and checks the exact
//! values the explicit scheme must produce.

use viscid_core::{Field, GridError, StepId};
use viscid_engine::init::Uniform;
use viscid_engine::{ConfigError, RunConfig, Simulation, SimulationState};
use viscid_grid::BoundaryPolicy;
use viscid_test_utils::{spike, FailingSink, RecordingDiagnosticSink};

fn small(width: usize, height: usize, steps: u64) -> RunConfig {
    RunConfig {
        width,
        height,
        steps,
        nu: 0.01,
        dt: 0.001,
        dx: 1.0,
        dy: 1.0,
        workers: Some(2),
        ..RunConfig::default()
    }
}

// ── Single spike, one step ───────────────────────────────────────────

#[test]
fn spike_on_5x5_periodic() {
    let mut sim = Simulation::new(small(5, 5, 1), &spike(1.0, 2.0, 2, 2)).unwrap();
    sim.run().unwrap();
    let u = sim.state().view(Field::U);

    assert!((u.get(2, 2) - 1.99996).abs() < 1e-12);
    for (i, j) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
        assert!((u.get(i, j) - 1.00001).abs() < 1e-12, "neighbour ({i},{j})");
    }
    for (i, j) in [(1, 1), (1, 3), (3, 1), (3, 3)] {
        assert_eq!(u.get(i, j), 1.0, "diagonal ({i},{j})");
    }
    // Periodic wrap on the border.
    for i in 0..5 {
        assert_eq!(u.get(i, 0), u.get(i, 3));
        assert_eq!(u.get(i, 4), u.get(i, 1));
    }
    for j in 0..5 {
        assert_eq!(u.get(0, j), u.get(3, j));
        assert_eq!(u.get(4, j), u.get(1, j));
    }
    assert!(sim.state().view(Field::V).as_slice().iter().all(|&x| x == 0.0));
}

// ── Conservation / trivial fields ────────────────────────────────────

#[test]
fn constant_field_stays_constant_under_periodic_wrap() {
    let mut sim = Simulation::new(small(9, 7, 25), &Uniform::new(3.25, -0.5)).unwrap();
    sim.run().unwrap();
    let state = sim.state();
    assert!(state.view(Field::U).as_slice().iter().all(|&x| x == 3.25));
    assert!(state.view(Field::V).as_slice().iter().all(|&x| x == -0.5));
}

#[test]
fn zero_in_zero_out() {
    for boundary in [BoundaryPolicy::Periodic, BoundaryPolicy::FixedZero] {
        let cfg = RunConfig {
            boundary,
            nu: 0.2,
            ..small(8, 6, 40)
        };
        let mut sim = Simulation::new(cfg, &Uniform::zero()).unwrap();
        sim.run().unwrap();
        for field in Field::ALL {
            assert!(
                sim.state().view(field).as_slice().iter().all(|&x| x == 0.0),
                "{field} under {boundary}"
            );
        }
    }
}

// ── Step counting ────────────────────────────────────────────────────

#[test]
fn step_counter_and_swaps_equal_configured_steps() {
    let mut sim = Simulation::new(small(6, 6, 17), &Uniform::new(1.0, 0.0)).unwrap();
    let summary = sim.run().unwrap();
    assert_eq!(summary.steps_completed, 17);
    assert_eq!(summary.final_step, StepId(17));
    assert_eq!(summary.swaps, 17);
    assert_eq!(sim.state().grid().swap_count(), 17);
}

#[test]
fn zero_steps_leaves_initial_state() {
    let mut sim = Simulation::new(small(4, 4, 0), &spike(0.0, 9.0, 1, 1)).unwrap();
    let summary = sim.run().unwrap();
    assert_eq!(summary.final_step, StepId(0));
    assert_eq!(sim.state().view(Field::U).get(1, 1), 9.0);
}

// ── Invalid dimensions ───────────────────────────────────────────────

#[test]
fn width_or_height_two_is_rejected() {
    for (w, h) in [(2, 5), (5, 2), (2, 2)] {
        let err = Simulation::new(small(w, h, 1), &Uniform::zero()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Grid(GridError::InvalidDimensions {
                width: w,
                height: h
            })
        );
        assert!(matches!(
            SimulationState::new(small(w, h, 1), &Uniform::zero()),
            Err(ConfigError::Grid(GridError::InvalidDimensions { .. }))
        ));
    }
}

// ── Non-finite values ────────────────────────────────────────────────

#[test]
fn nan_propagates_without_crash() {
    let energy = RecordingDiagnosticSink::new();
    let log = energy.log();
    let cfg = RunConfig {
        sample_every: 1,
        ..small(7, 7, 3)
    };
    let init = |i: usize, j: usize| -> (f64, f64) {
        if (i, j) == (3, 3) {
            (f64::NAN, 0.0)
        } else {
            (1.0, 0.0)
        }
    };
    let mut sim = Simulation::new(cfg, &init)
        .unwrap()
        .with_diagnostic_sink("energy", energy);
    let summary = sim.run().unwrap();
    assert_eq!(summary.final_step, StepId(3));

    let u = sim.state().view(Field::U);
    // After 3 steps the NaN has spread three cells along each axis.
    assert!(u.get(3, 3).is_nan());
    assert!(u.get(3, 5).is_nan());
    assert!(sim.state().field_stats().non_finite > 1);
    assert!(log.reports().iter().all(|(_, e)| e.is_nan()));
}

#[test]
fn unstable_parameters_diverge_but_complete() {
    // ν·Δt·(1/Δx² + 1/Δy²) = 4, far past the stability threshold.
    let cfg = RunConfig {
        nu: 1.0,
        dt: 2.0,
        ..small(8, 8, 30)
    };
    let mut sim = Simulation::new(cfg, &spike(0.0, 1.0, 4, 4)).unwrap();
    assert!(sim.run().is_ok());
    assert!(sim.state().field_stats().max_speed > 1e6 || !sim.state().field_stats().is_finite());
}

// ── Sink failures are non-fatal ──────────────────────────────────────

#[test]
fn failing_sinks_leave_numerics_unchanged() {
    let cfg = RunConfig {
        sample_every: 1,
        ..small(10, 8, 12)
    };
    let init = spike(1.0, 5.0, 4, 4);

    let mut clean = Simulation::new(cfg.clone(), &init).unwrap();
    clean.run().unwrap();

    let mut noisy = Simulation::new(cfg, &init)
        .unwrap()
        .with_snapshot_sink("snap", FailingSink::after("cannot open output", 2))
        .with_diagnostic_sink("diag", FailingSink::new("closed"));
    let summary = noisy.run().unwrap();

    assert_eq!(summary.final_step, StepId(12));
    // 13 samples (0..=12); the snapshot sink succeeds twice.
    assert_eq!(summary.snapshot_failures, 11);
    assert_eq!(summary.diagnostic_failures, 13);
    for field in Field::ALL {
        assert_eq!(
            clean.state().view(field).as_slice(),
            noisy.state().view(field).as_slice()
        );
    }
}
