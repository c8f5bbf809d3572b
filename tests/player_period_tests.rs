//! Period arithmetic tests

use rust_sine_dac::player::{achieved_frequency, period_for, MIN_PERIOD_US};

#[test]
fn test_period_100hz() {
    assert_eq!(period_for(100.0, 64), 156);
    assert_eq!(period_for(100.0, 256), 39);
}

#[test]
fn test_period_exact_division() {
    // 1e6 / (1000 * 100) = 10
    assert_eq!(period_for(1000.0, 100), 10);
}

#[test]
fn test_period_floor_clamp() {
    // 1e6 / 5.12e6 truncates to 0: clamp, do not stop
    assert_eq!(period_for(20_000.0, 256), MIN_PERIOD_US);
    assert_eq!(period_for(1.0e9, 64), 1);
}

#[test]
fn test_period_at_boundary() {
    // freq * size == 1e6 exactly
    assert_eq!(period_for(15_625.0, 64), 1);
}

#[test]
fn test_period_stop_values() {
    assert_eq!(period_for(0.0, 64), 0);
    assert_eq!(period_for(-0.0, 64), 0);
    assert_eq!(period_for(-100.0, 64), 0);
    assert_eq!(period_for(f32::NEG_INFINITY, 64), 0);
}

#[test]
fn test_period_empty_table() {
    assert_eq!(period_for(100.0, 0), 0);
}

#[test]
fn test_period_infinite_frequency_clamps() {
    // Never 0 for a positive frequency
    assert_eq!(period_for(f32::INFINITY, 64), 1);
}

#[test]
fn test_period_is_monotonic() {
    let mut last = u32::MAX;
    for hz in [1.0, 10.0, 100.0, 440.0, 1000.0, 5000.0, 20_000.0] {
        let period = period_for(hz, 64);
        assert!(period <= last, "{} Hz -> {} us", hz, period);
        last = period;
    }
}

#[test]
fn test_achieved_frequency_reports_truncation() {
    // 440 Hz on 64 entries: 35 us, 446.4 Hz actually produced
    let period = period_for(440.0, 64);
    assert_eq!(period, 35);
    let achieved = achieved_frequency(period, 64);
    assert!((achieved - 446.43).abs() < 0.01, "got {}", achieved);
}

#[test]
fn test_achieved_frequency_stopped() {
    assert_eq!(achieved_frequency(0, 64), 0.0);
    assert_eq!(achieved_frequency(156, 0), 0.0);
}
