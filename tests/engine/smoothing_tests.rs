use phasescope::processing::smoothing::{
    rolling_mean, smooth, SmoothingMode, DEFAULT_HALF_WINDOW, DEFAULT_TRAILING_WINDOW,
};

use crate::common::assert_close;

// ============================================
// Centered Moving Average
// ============================================

#[test]
fn test_zero_half_window_is_identity() {
    let series = vec![3.0, 1.0, 4.0, 1.0, 5.0];
    assert_eq!(smooth(&series, 0), series);
}

#[test]
fn test_empty_series() {
    assert!(smooth(&[], 10).is_empty());
    assert!(rolling_mean(&[], 10).is_empty());
}

#[test]
fn test_constant_series_stays_constant() {
    let series = vec![2.5; 40];
    for v in smooth(&series, 10) {
        assert_close(v, 2.5);
    }
}

#[test]
fn test_endpoints_pass_through() {
    let series = vec![10.0, 0.0, 50.0, 0.0, 7.0];
    let out = smooth(&series, 2);
    assert_eq!(out.len(), series.len());
    assert_eq!(out[0], 10.0);
    assert_eq!(out[4], 7.0);
}

#[test]
fn test_window_shrinks_near_edges() {
    let out = smooth(&[0.0, 3.0, 0.0, 3.0, 0.0], 1);
    let expected = [0.0, 1.0, 2.0, 1.0, 0.0];
    for (a, e) in out.iter().zip(expected) {
        assert_close(*a, e);
    }

    // Index 2 of 5 can only reach two neighbours on each side.
    let out = smooth(&[1.0, 2.0, 6.0, 2.0, 1.0], 10);
    assert_close(out[1], 3.0);
    assert_close(out[2], 12.0 / 5.0);
}

#[test]
fn test_default_half_window() {
    assert_eq!(DEFAULT_HALF_WINDOW, 10);
    assert_eq!(
        SmoothingMode::default(),
        SmoothingMode::Symmetric { half_window: 10 }
    );
}

// ============================================
// Trailing Rolling Mean
// ============================================

#[test]
fn test_rolling_mean_leading_nan() {
    let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);
    assert!(out[0].is_nan());
    assert_close(out[1], 1.5);
    assert_close(out[2], 2.5);
    assert_close(out[3], 3.5);
}

#[test]
fn test_rolling_mean_window_longer_than_series() {
    let out = rolling_mean(&[1.0, 2.0, 3.0], DEFAULT_TRAILING_WINDOW);
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|v| v.is_nan()));
}

#[test]
fn test_rolling_mean_unit_window_is_identity() {
    let series = vec![4.0, 8.0, 15.0];
    assert_eq!(rolling_mean(&series, 1), series);
    assert_eq!(rolling_mean(&series, 0), series);
}

// ============================================
// Smoothing Mode
// ============================================

#[test]
fn test_modes_dispatch() {
    let series = vec![1.0, 2.0, 3.0, 4.0];
    let centered = SmoothingMode::Symmetric { half_window: 1 }.apply(&series);
    assert_eq!(centered[0], 1.0);

    let trailing = SmoothingMode::Trailing { window: 2 }.apply(&series);
    assert!(trailing[0].is_nan());
}

#[test]
fn test_mode_resize_keeps_variant() {
    let mode = SmoothingMode::Trailing { window: 100 }.with_size(20);
    assert_eq!(mode, SmoothingMode::Trailing { window: 20 });
    assert!(!mode.is_symmetric());
    assert_eq!(mode.size(), 20);

    let mode = SmoothingMode::default().with_size(3);
    assert!(mode.is_symmetric());
    assert_eq!(mode.size(), 3);
}

#[test]
fn test_mode_labels_name_the_variant() {
    assert!(SmoothingMode::default().label().contains("centered"));
    assert!(SmoothingMode::Trailing { window: 100 }
        .label()
        .contains("trailing"));
}

#[test]
fn test_mode_json_shape() {
    let json = serde_json::to_string(&SmoothingMode::Trailing { window: 100 }).unwrap();
    assert_eq!(json, r#"{"mode":"trailing","window":100}"#);

    let mode: SmoothingMode = serde_json::from_str(r#"{"mode":"symmetric","half_window":4}"#).unwrap();
    assert_eq!(mode, SmoothingMode::Symmetric { half_window: 4 });
}
