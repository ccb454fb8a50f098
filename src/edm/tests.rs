// Scenario tests for EDM change-point detection
//
// Histories are shaped like real benchmark timings: a stable regime, then a
// shift (new compiler, new allocator, accidental debug build).

use super::*;

/// Deterministic jitter in [-0.005, 0.005]
fn jitter(i: usize) -> f64 {
    ((i * 7919) % 11) as f64 * 0.001 - 0.005
}

fn step_series(n: usize, low: f64, high: f64) -> Vec<f64> {
    (0..2 * n)
        .map(|i| if i < n { low } else { high } + jitter(i))
        .collect()
}

/// Scenario: constant 0 for 20 runs, constant 10 for 20 runs
/// Expected: change located exactly at the first run of the new regime
#[test]
fn test_clean_step_is_located_exactly() {
    let mut series = vec![0.0; 20];
    series.extend(vec![10.0; 20]);

    assert_eq!(detect_change_point(&series, 5), Some(20));
}

/// Scenario: low-variance timings around 10ms, then around 20ms
/// Expected: change reported in the transition region
#[test]
fn test_noisy_step_is_located_near_boundary() {
    let series = step_series(20, 10.0, 20.0);

    let index = detect_change_point(&series, 5).unwrap();
    assert!(
        (19..=21).contains(&index),
        "expected change near 20, got {}",
        index
    );
}

/// Scenario: the regime drops instead of rising (an improvement)
/// Expected: detection is direction-agnostic
#[test]
fn test_downward_step_is_located_near_boundary() {
    let series = step_series(20, 20.0, 10.0);

    let index = detect_change_point(&series, 5).unwrap();
    assert!((19..=21).contains(&index), "got {}", index);
}

/// Scenario: integer nanosecond counters
/// Expected: integer entry point agrees with the float one
#[test]
fn test_integer_history() {
    let mut series: Vec<i64> = vec![1_000; 20];
    series.extend(vec![5_000; 20]);

    assert_eq!(detect_change_point_int(&series, 5), Some(20));
}

/// Scenario: no distributional shift at all
/// Expected: some index is still reported, and the same one every time
#[test]
fn test_no_change_is_deterministic() {
    let series: Vec<f64> = (0..60).map(|i| ((i * 7919) % 101) as f64).collect();

    let first = detect_change_point(&series, 5);
    let second = detect_change_point(&series, 5);

    assert!(first.is_some());
    assert_eq!(first, second);
    let index = first.unwrap();
    assert!((5..55).contains(&index));
}

/// Normalization happens on a private copy
#[test]
fn test_caller_series_is_not_mutated() {
    let series = step_series(15, 3.0, 9.0);
    let original = series.clone();

    let _ = detect_change_point(&series, 4);
    let _ = try_detect_change_point(&series, 4);

    assert_eq!(series, original);
}

/// Shortest legal series: exactly one candidate split
#[test]
fn test_minimum_length_series() {
    let series = [1.0, 1.1, 5.0, 5.1, 5.2];

    let cp = try_detect_change_point(&series, 2).unwrap();
    assert_eq!(cp.index, 2);
}

/// Constant series bypasses validation in the raw entry point
#[test]
fn test_raw_entry_point_tolerates_constant_series() {
    let series = [4.0; 11];
    assert!(detect_change_point(&series, 3).is_some());
    assert!(matches!(
        try_detect_change_point(&series, 3),
        Err(EdmError::ConstantSeries { .. })
    ));
}

/// Too-short input is a contract violation of the raw entry point
#[test]
#[should_panic]
fn test_raw_entry_point_panics_on_short_series() {
    let _ = detect_change_point(&[1.0, 2.0, 3.0], 2);
}

/// Wider minimum segments still find a clean step
#[test]
fn test_larger_delta() {
    let mut series = vec![2.0; 30];
    series.extend(vec![8.0; 30]);

    assert_eq!(detect_change_point(&series, 10), Some(30));
}

#[test]
fn test_statistic_is_reported_with_index() {
    let mut series = vec![0.0; 20];
    series.extend(vec![10.0; 20]);

    let cp = detect(&series, 5).unwrap();
    assert_eq!(cp.index, 20);
    // 2 * med(tab)^2 * 20 * 20 / 40 with med(tab) just below 1
    assert!(cp.statistic > 19.9 && cp.statistic <= 20.0);
}

#[test]
fn test_error_messages() {
    let err = try_detect_change_point(&[1.0, 2.0], 1).unwrap_err();
    assert!(err.to_string().contains("too short"));

    let err = try_detect_change_point(&[1.0, 2.0, 3.0], 0).unwrap_err();
    assert!(err.to_string().contains("at least 1"));
}

/// A delta whose window size overflows is rejected, never wrapped
#[test]
fn test_huge_delta_is_rejected() {
    for delta in [usize::MAX, usize::MAX / 2 + 1, usize::MAX / 2] {
        assert_eq!(
            try_detect_change_point(&[1.0, 2.0, 3.0], delta),
            Err(EdmError::SeriesTooShort { len: 3, delta })
        );
    }
}

/// Scenario: finite samples whose spread overflows f64
/// Expected: rejected instead of scoring every split as 0
#[test]
fn test_overflowing_range_is_rejected() {
    let mut series = vec![-1e308; 10];
    series.extend(vec![1e308; 10]);

    assert!(matches!(
        try_detect_change_point(&series, 3),
        Err(EdmError::RangeOverflow { .. })
    ));

    let scaled: Vec<f64> = series.iter().map(|v| v / 1e308).collect();
    assert_eq!(try_detect_change_point(&scaled, 3).unwrap().index, 10);
}

/// Large but representable spreads still normalize
#[test]
fn test_wide_finite_range_is_accepted() {
    let mut series = vec![-1e307; 10];
    series.extend(vec![1e307; 10]);

    assert_eq!(try_detect_change_point(&series, 3).unwrap().index, 10);
}
