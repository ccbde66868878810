//! Integration test: results are independent of worker count and
//! partition strategy.
//!
//! Each cell depends only on reads of the current plane, so every
//! configuration must produce bit-identical planes at every step.

use proptest::prelude::*;
use viscid_core::Field;
use viscid_engine::{Partition, RunConfig, Simulation};
use viscid_grid::BoundaryPolicy;
use viscid_test_utils::{checker_noise, RecordingSnapshotSink, RecordedSnapshot};

fn history(config: RunConfig, seed: u64) -> Vec<RecordedSnapshot> {
    let sink = RecordingSnapshotSink::new();
    let log = sink.log();
    let mut sim = Simulation::new(config, &checker_noise(seed))
        .unwrap()
        .with_snapshot_sink("rec", sink);
    sim.run().unwrap();
    log.snapshots()
}

fn base(width: usize, height: usize, boundary: BoundaryPolicy) -> RunConfig {
    RunConfig {
        width,
        height,
        steps: 12,
        nu: 0.1,
        dt: 0.5,
        dx: 1.0,
        dy: 1.5,
        boundary,
        sample_every: 1,
        workers: Some(1),
        partition: Partition::Static,
        ..RunConfig::default()
    }
}

const PARTITIONS: [Partition; 4] = [
    Partition::Static,
    Partition::Rows,
    Partition::Dynamic { min_rows: 1 },
    Partition::Dynamic { min_rows: 3 },
];

#[test]
fn one_vs_many_workers_every_step() {
    for boundary in [BoundaryPolicy::Periodic, BoundaryPolicy::FixedZero] {
        let reference = history(base(17, 23, boundary), 42);
        assert_eq!(reference.len(), 13);
        for workers in [2, 3, 8] {
            for partition in PARTITIONS {
                let cfg = RunConfig {
                    workers: Some(workers),
                    partition,
                    ..base(17, 23, boundary)
                };
                let got = history(cfg, 42);
                assert_eq!(
                    got, reference,
                    "{workers} workers, {partition}, {boundary}"
                );
            }
        }
    }
}

#[test]
fn final_state_matches_for_minimal_grid() {
    let reference = history(base(3, 3, BoundaryPolicy::Periodic), 1);
    let many = history(
        RunConfig {
            workers: Some(4),
            partition: Partition::Rows,
            ..base(3, 3, BoundaryPolicy::Periodic)
        },
        1,
    );
    assert_eq!(many.last(), reference.last());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn worker_count_never_changes_bits(
        width in 3usize..20,
        height in 3usize..20,
        workers in 2usize..6,
        partition_idx in 0usize..4,
        seed in any::<u64>(),
        periodic in any::<bool>(),
    ) {
        let boundary = if periodic { BoundaryPolicy::Periodic } else { BoundaryPolicy::FixedZero };
        let serial = RunConfig { steps: 5, sample_every: 0, ..base(width, height, boundary) };
        let parallel = RunConfig {
            workers: Some(workers),
            partition: PARTITIONS[partition_idx],
            ..serial.clone()
        };

        let mut a = Simulation::new(serial, &checker_noise(seed)).unwrap();
        let mut b = Simulation::new(parallel, &checker_noise(seed)).unwrap();
        a.run().unwrap();
        b.run().unwrap();
        for field in Field::ALL {
            prop_assert_eq!(
                a.state().view(field).as_slice(),
                b.state().view(field).as_slice()
            );
        }
    }
}
