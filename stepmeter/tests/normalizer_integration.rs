//! End-to-end behavior of `StepNormalizer` driving a sink the way an algorithm would.

mod support;

use core::sync::atomic::Ordering;
use stepmeter::{CancelFlag, LogSink, ProgressSink, StepNormalizer};
use support::RecordingSink;

const STEP_COUNTS: [u64; 11] = [1, 2, 7, 99, 100, 199, 200, 250, 1000, 12_345, 1_000_000];

#[test]
fn test_one_step_per_unit_reaches_total_percentage() {
    for total in STEP_COUNTS {
        let normalizer = StepNormalizer::new(None, total);
        for _ in 0..total {
            let _ = normalizer.one_step();
        }

        assert!(
            (normalizer.percent() - 100.0).abs() < 1e-3,
            "{total} steps ended at {}%",
            normalizer.percent()
        );
    }
}

#[test]
fn test_partial_percentage_is_reached() {
    let normalizer = StepNormalizer::with_percentage(None, 12_345, 35);
    for _ in 0..12_345 {
        let _ = normalizer.one_step();
    }

    assert!((normalizer.percent() - 35.0).abs() < 1e-3);
}

#[test]
fn test_steps_matches_repeated_one_step() {
    for n in [0, 1, 9, 10, 11, 333, 999, 1000] {
        let batched = StepNormalizer::new(None, 1000);
        let _ = batched.steps(n);

        let single = StepNormalizer::new(None, 1000);
        for _ in 0..n {
            let _ = single.one_step();
        }

        assert!(
            (batched.percent() - single.percent()).abs() < f32::EPSILON,
            "steps({n}) gave {}% but {n} x one_step gave {}%",
            batched.percent(),
            single.percent()
        );
    }
}

#[test]
fn test_absent_sink_accepts_everything() {
    let mut normalizer = StepNormalizer::new(None, 10);

    assert!(!normalizer.steps(5));
    assert!(!normalizer.one_step());
    normalizer.reset();
    normalizer.scale(3, 50, true);
    assert!(!normalizer.steps(100));
    normalizer.scale(1, 1, false);
    assert!(!normalizer.one_step());
    assert!(!normalizer.is_cancel_requested());
    assert!(normalizer.sink().is_none());
}

#[test]
fn test_thousand_steps_produce_bounded_updates() {
    let sink = RecordingSink::default();
    let normalizer = StepNormalizer::new(Some(&sink), 1000);

    for _ in 0..1000 {
        assert!(!normalizer.one_step());
    }

    let updates = sink.updates();
    assert!(updates.len() < 1000 / 5, "{} updates", updates.len());
    assert_eq!(sink.last_update(), Some(100.0));
}

#[test]
fn test_updates_never_decrease() {
    let sink = RecordingSink::default();
    let normalizer = StepNormalizer::new(Some(&sink), 12_345);

    for chunk in [1, 17, 250, 3, 4000, 1, 8073] {
        let _ = normalizer.steps(chunk);
    }

    let updates = sink.updates();
    assert!(updates.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!((updates[updates.len() - 1] - 100.0).abs() < 1e-3);
}

#[test]
fn test_scale_preserves_or_restarts_progress() {
    let mut normalizer = StepNormalizer::new(None, 100);
    let _ = normalizer.steps(25);

    normalizer.scale(500, 100, true);
    assert!((normalizer.percent() - 25.0).abs() < f32::EPSILON);

    normalizer.scale(500, 100, false);
    assert!(normalizer.percent().abs() < f32::EPSILON);
}

#[test]
fn test_phases_share_one_progress_bar() {
    let sink = RecordingSink::default();
    let mut normalizer = StepNormalizer::with_percentage(Some(&sink), 4, 40);
    let _ = normalizer.steps(1);
    let _ = normalizer.steps(1);
    let _ = normalizer.steps(2);

    normalizer.scale(3, 60, true);
    for _ in 0..3 {
        let _ = normalizer.one_step();
    }

    let updates = sink.updates().iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
    insta::assert_snapshot!(updates, @"10 20 40 60 80 100");
}

#[test]
fn test_cancellation_stops_the_loop() {
    let sink = RecordingSink::default();
    let normalizer = StepNormalizer::new(Some(&sink), 1000);

    let mut done = 0;
    for i in 0..1000 {
        if i == 400 {
            sink.cancel.cancel();
        }
        if normalizer.one_step() {
            break;
        }
        done += 1;
    }

    assert_eq!(done, 400);
    assert!((normalizer.percent() - 40.0).abs() < f32::EPSILON);
}

#[test]
fn test_algorithm_lifecycle_with_log_sink() {
    let _ = env_logger::builder().is_test(true).filter_level(log::LevelFilter::Trace).try_init();

    let cancel = CancelFlag::new();
    let sink = LogSink::new(cancel.clone());
    sink.set_method_title("Cloud subsampling");
    sink.set_info("10 000 points");
    sink.start();

    let normalizer = StepNormalizer::new(Some(&sink), 10_000);
    let mut visited = 0u32;
    for _ in 0..10_000 {
        visited += 1;
        if visited == 5_000 {
            cancel.cancel();
        }
        if normalizer.one_step() {
            break;
        }
    }
    sink.stop();

    assert_eq!(visited, 5_000);
    assert_eq!(sink.last_percent(), Some(50.0));
    assert!(!sink.text_can_be_edited());
}

#[test]
fn test_lifecycle_calls_go_to_the_sink_directly() {
    let sink = RecordingSink::default();
    let maybe: Option<&RecordingSink> = Some(&sink);

    maybe.start();
    let normalizer = StepNormalizer::new(Some(&sink), 3);
    let _ = normalizer.steps(3);
    maybe.stop();

    assert_eq!(sink.starts.load(Ordering::Relaxed), 1);
    assert_eq!(sink.stops.load(Ordering::Relaxed), 1);
    assert_eq!(sink.updates(), [100.0]);
}
