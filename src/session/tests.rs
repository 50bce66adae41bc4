use super::*;
use crate::error::ErrorKind;
use crate::generate::BlobGenerator;
use proptest::prelude::*;

fn four_points() -> Dataset {
    vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 1.0),
    ]
    .into()
}

fn session_with(data: Dataset) -> ClusteringSession {
    let mut s = ClusteringSession::new(SessionConfig::default().with_seed(42)).unwrap();
    s.load_dataset(data).unwrap();
    s
}

#[test]
fn test_two_steps_to_convergence() {
    let mut s = session_with(four_points());
    let seeds = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
    let init = s.initialize(2, "manual", Some(&seeds)).unwrap();
    assert_eq!(init.phase, Phase::Initialized);
    assert!(init.labels.is_empty());
    assert!(!init.finished);

    let first = s.step().unwrap();
    assert_eq!(first.labels, vec![0, 0, 1, 1]);
    assert_eq!(
        first.centroids,
        vec![Point::new(0.0, 0.5), Point::new(10.0, 0.5)]
    );
    assert!(!first.finished);
    assert_eq!(first.phase, Phase::Stepping);

    let second = s.step().unwrap();
    assert_eq!(second.labels, first.labels);
    assert_eq!(second.centroids, first.centroids);
    assert!(second.finished);
    assert_eq!(second.phase, Phase::Converged);
    assert_eq!(second.termination, Some(Termination::Converged));
    assert_eq!(second.iteration, 2);
}

#[test]
fn test_random_seeding_two_steps_to_convergence() {
    let expected = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
    // Find a seed whose random pick is points 0 and 2, in that order.
    let mut s = (0..500u64)
        .map(|seed| {
            let mut s = ClusteringSession::new(SessionConfig::default().with_seed(seed)).unwrap();
            s.load_dataset(four_points()).unwrap();
            s.initialize(2, "random", None).unwrap();
            s
        })
        .find(|s| s.centroids() == expected.as_slice())
        .expect("some seed selects (0,0) then (10,0)");

    let first = s.step().unwrap();
    assert_eq!(first.labels, vec![0, 0, 1, 1]);
    assert_eq!(
        first.centroids,
        vec![Point::new(0.0, 0.5), Point::new(10.0, 0.5)]
    );
    assert!(!first.finished);

    let second = s.step().unwrap();
    assert_eq!(second.labels, first.labels);
    assert_eq!(second.centroids, first.centroids);
    assert!(second.finished);
    assert_eq!(second.method, Some(InitMethod::Random));
}

#[test]
fn test_step_after_finish_is_a_no_op() {
    let mut s = session_with(four_points());
    s.initialize(2, "farthest", None).unwrap();
    let done = s.run().unwrap();
    assert!(done.finished);

    let again = s.step().unwrap();
    assert_eq!(again, done);
    assert_eq!(s.run().unwrap(), done);
}

#[test]
fn test_k_larger_than_dataset_is_rejected_without_mutation() {
    let mut s = session_with(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)].into());
    s.initialize(1, "random", None).unwrap();
    let before = s.snapshot();

    let err = s.initialize(3, "random", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(s.snapshot(), before);

    for k in [0, -1] {
        assert_eq!(
            s.initialize(k, "kmeans++", None).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }
    assert_eq!(s.snapshot(), before);
}

#[test]
fn test_unknown_method() {
    let mut s = session_with(four_points());
    let err = s.initialize(2, "spectral", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownMethod);
    assert_eq!(s.phase(), Phase::Uninitialized);
}

#[test]
fn test_step_and_run_before_initialize_are_invalid_state() {
    let mut s = session_with(four_points());
    assert_eq!(s.step().unwrap_err().kind(), ErrorKind::InvalidState);
    assert_eq!(s.run().unwrap_err().kind(), ErrorKind::InvalidState);
}

#[test]
fn test_manual_collection_across_calls() {
    let mut s = session_with(four_points());
    let first = s
        .initialize(2, "manual", Some(&[Point::new(-5.0, 3.0)]))
        .unwrap();
    assert_eq!(first.phase, Phase::Uninitialized);
    assert_eq!(first.centroids.len(), 1);
    assert!(!first.finished);
    assert_eq!(s.pending_seeds(), &[Point::new(-5.0, 3.0)]);
    assert_eq!(s.step().unwrap_err().kind(), ErrorKind::InvalidState);

    let done = s
        .initialize(2, "manual", Some(&[Point::new(20.0, 0.0)]))
        .unwrap();
    assert_eq!(done.phase, Phase::Initialized);
    assert_eq!(
        done.centroids,
        vec![Point::new(-5.0, 3.0), Point::new(20.0, 0.0)]
    );
    assert!(s.pending_seeds().is_empty());
}

#[test]
fn test_manual_resending_full_collection_completes() {
    let mut s = session_with(four_points());
    let a = Point::new(-5.0, 3.0);
    let b = Point::new(20.0, 0.0);
    let c = Point::new(7.0, 7.0);

    s.initialize(3, "manual", Some(&[a])).unwrap();
    let two = s.initialize(3, "manual", Some(&[a, b])).unwrap();
    assert_eq!(two.phase, Phase::Uninitialized);
    assert_eq!(two.centroids, vec![a, b]);

    let done = s.initialize(3, "manual", Some(&[a, b, c])).unwrap();
    assert_eq!(done.phase, Phase::Initialized);
    assert_eq!(done.centroids, vec![a, b, c]);
}

#[test]
fn test_manual_incremental_and_cumulative_calls_mix() {
    let mut s = session_with(four_points());
    let a = Point::new(1.0, 1.0);
    let b = Point::new(2.0, 2.0);
    let c = Point::new(3.0, 3.0);

    // One point at a time.
    s.initialize(3, "manual", Some(&[a])).unwrap();
    let snap = s.initialize(3, "manual", Some(&[b])).unwrap();
    assert_eq!(snap.centroids, vec![a, b]);

    // Then the whole list.
    let snap = s.initialize(3, "manual", Some(&[a, b, c])).unwrap();
    assert_eq!(snap.phase, Phase::Initialized);
    assert_eq!(snap.centroids, vec![a, b, c]);

    // Exactly k points replace whatever was pending.
    s.initialize(2, "manual", Some(&[a])).unwrap();
    let snap = s.initialize(2, "manual", Some(&[b, c])).unwrap();
    assert_eq!(snap.phase, Phase::Initialized);
    assert_eq!(snap.centroids, vec![b, c]);
}

#[test]
fn test_manual_overflow_keeps_pending_seeds() {
    let mut s = session_with(four_points());
    let a = Point::new(1.0, 1.0);
    s.initialize(2, "manual", Some(&[a])).unwrap();
    let err = s
        .initialize(
            2,
            "manual",
            Some(&[a, Point::new(2.0, 2.0), Point::new(3.0, 3.0)]),
        )
        .unwrap_err();
    assert_eq!(
        err,
        Error::SeedCountMismatch {
            expected: 2,
            found: 3
        }
    );
    assert_eq!(s.pending_seeds(), &[a]);
}

#[test]
fn test_changing_k_or_method_discards_manual_collection() {
    let mut s = session_with(four_points());
    s.initialize(3, "manual", Some(&[Point::new(1.0, 1.0)]))
        .unwrap();

    let snap = s
        .initialize(2, "manual", Some(&[Point::new(9.0, 9.0)]))
        .unwrap();
    assert_eq!(snap.centroids, vec![Point::new(9.0, 9.0)]);
    assert_eq!(snap.k, Some(2));

    let snap = s.initialize(2, "random", None).unwrap();
    assert_eq!(snap.phase, Phase::Initialized);
    assert!(s.pending_seeds().is_empty());

    // Starting manual again begins a fresh collection.
    let snap = s
        .initialize(2, "manual", Some(&[Point::new(4.0, 4.0)]))
        .unwrap();
    assert_eq!(snap.centroids, vec![Point::new(4.0, 4.0)]);
}

#[test]
fn test_reset_keeps_dataset() {
    let mut s = session_with(four_points());
    s.initialize(2, "kmeans++", None).unwrap();
    s.step().unwrap();

    let snap = s.reset();
    assert_eq!(snap.phase, Phase::Uninitialized);
    assert!(snap.centroids.is_empty());
    assert!(snap.labels.is_empty());
    assert!(!snap.finished);
    assert_eq!(snap.k, None);
    assert_eq!(s.dataset(), &four_points());
}

#[test]
fn test_generate_replaces_dataset_and_run() {
    let mut s = session_with(four_points());
    s.initialize(2, "random", None).unwrap();
    s.step().unwrap();

    let snap = s.generate_dataset(50).unwrap();
    assert_eq!(s.dataset().len(), 50);
    assert_eq!(snap.phase, Phase::Uninitialized);
    assert!(snap.centroids.is_empty());
    assert!(snap.labels.is_empty());

    assert!(s.generate_dataset(0).is_err());
    assert_eq!(s.dataset().len(), 50);
}

#[test]
fn test_generate_default_uses_config() {
    let config = SessionConfig::default().with_seed(1).with_default_samples(25);
    let mut s = ClusteringSession::new(config).unwrap();
    s.generate_default().unwrap();
    assert_eq!(s.dataset().len(), 25);
}

#[test]
fn test_load_rejects_empty_and_non_finite() {
    let mut s = session_with(four_points());
    assert!(s.load_dataset(Dataset::default()).is_err());
    assert!(s
        .load_dataset(vec![Point::new(f64::NAN, 0.0)].into())
        .is_err());
    assert_eq!(s.dataset(), &four_points());
}

#[test]
fn test_empty_cluster_centroid_survives_a_step() {
    let mut s = session_with(four_points());
    let far = Point::new(500.0, 500.0);
    s.initialize(3, "manual", Some(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0), far]))
        .unwrap();
    let snap = s.step().unwrap();
    assert!(snap.labels.iter().all(|&l| l != 2));
    assert_eq!(snap.centroids[2], far);
}

#[test]
fn test_iteration_cap_finishes_run() {
    let config = SessionConfig::default().with_seed(3).with_max_iter(1);
    let mut s = ClusteringSession::new(config).unwrap();
    s.load_dataset(four_points()).unwrap();
    s.initialize(2, "manual", Some(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]))
        .unwrap();

    let snap = s.run().unwrap();
    assert!(snap.finished);
    assert_eq!(snap.iteration, 1);
    assert_eq!(snap.termination, Some(Termination::IterationCap));
}

#[test]
fn test_same_seed_same_run() {
    let blobs = BlobGenerator::new(
        vec![
            Point::new(-40.0, -40.0),
            Point::new(40.0, -40.0),
            Point::new(0.0, 40.0),
        ],
        5.0,
    )
    .unwrap();
    let run = |seed| {
        let mut s = ClusteringSession::new(SessionConfig::default().with_seed(seed))
            .unwrap()
            .with_generator(blobs.clone());
        s.generate_dataset(90).unwrap();
        s.initialize(3, "kmeans++", None).unwrap();
        s.run().unwrap()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn test_blobs_are_recovered() {
    let blobs = BlobGenerator::new(vec![Point::new(-50.0, 0.0), Point::new(50.0, 0.0)], 2.0)
        .unwrap();
    let mut s = ClusteringSession::new(SessionConfig::default().with_seed(8))
        .unwrap()
        .with_generator(blobs);
    s.generate_dataset(60).unwrap();
    s.initialize(2, "farthest", None).unwrap();
    let snap = s.run().unwrap();

    // Round-robin generation: even indices belong to the left blob.
    let left = snap.labels[0];
    for (i, &l) in snap.labels.iter().enumerate() {
        assert_eq!(l == left, i % 2 == 0, "point {i}");
    }
    assert_eq!(snap.termination, Some(Termination::Converged));
}

#[test]
fn test_snapshot_serializes_for_transport() {
    let mut s = session_with(four_points());
    s.initialize(2, "manual", Some(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]))
        .unwrap();
    let snap = s.step().unwrap();
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["phase"], "stepping");
    assert_eq!(json["method"], "manual");
    assert_eq!(json["labels"], serde_json::json!([0, 0, 1, 1]));
    assert_eq!(json["finished"], false);
    assert_eq!(json["centroids"][1]["y"], 0.5);
}

fn dataset_strategy() -> impl Strategy<Value = Dataset> {
    prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 1..60)
        .prop_map(|raw| raw.into_iter().map(Point::from).collect())
}

fn method_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("random"), Just("farthest"), Just("kmeans++")]
}

proptest! {
    #[test]
    fn steps_label_every_point_in_range(
        data in dataset_strategy(),
        k_frac in 0.0f64..1.0,
        method in method_strategy(),
        seed in any::<u64>(),
        steps in 1usize..6,
    ) {
        let n = data.len();
        let k = 1 + ((n - 1) as f64 * k_frac) as usize;
        let mut s = ClusteringSession::new(SessionConfig::default().with_seed(seed)).unwrap();
        s.load_dataset(data).unwrap();
        let init = s.initialize(k as i64, method, None).unwrap();
        prop_assert_eq!(init.centroids.len(), k);

        for _ in 0..steps {
            let snap = s.step().unwrap();
            prop_assert_eq!(snap.labels.len(), n);
            prop_assert_eq!(snap.centroids.len(), k);
            prop_assert!(snap.labels.iter().all(|&l| l < k));
        }
    }

    #[test]
    fn run_terminates_within_cap(
        data in dataset_strategy(),
        k_frac in 0.0f64..1.0,
        method in method_strategy(),
        seed in any::<u64>(),
        max_iter in 1usize..50,
    ) {
        let k = 1 + ((data.len() - 1) as f64 * k_frac) as usize;
        let config = SessionConfig::default().with_seed(seed).with_max_iter(max_iter);
        let mut s = ClusteringSession::new(config).unwrap();
        s.load_dataset(data).unwrap();
        s.initialize(k as i64, method, None).unwrap();

        let snap = s.run().unwrap();
        prop_assert!(snap.finished);
        prop_assert!(snap.iteration <= max_iter);
        prop_assert!(snap.termination.is_some());

        let again = s.step().unwrap();
        prop_assert_eq!(again.centroids, snap.centroids);
        prop_assert_eq!(again.labels, snap.labels);
    }
}
