use chrono::{NaiveDate, NaiveDateTime};
use phasescope::processing::date_window::{
    resolve, DatasetBounds, DateWindow, SliderOrder, DAY_WINDOW_SECONDS,
};
use phasescope::state::sliders::TimeSliders;

fn dt(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

/// 2024-03-05 08:00 to 2024-03-08 12:00.
fn bounds() -> DatasetBounds {
    DatasetBounds::new(dt(5, 8), dt(8, 12))
}

const HOUR: i64 = 3600;

// ============================================
// Dataset Bounds
// ============================================

#[test]
fn test_bounds_offsets() {
    let b = bounds();
    assert_eq!(b.total_seconds(), 76 * HOUR);
    assert_eq!(b.offset_of(dt(6, 0)), 16 * HOUR);
    assert_eq!(b.time_at(16 * HOUR), dt(6, 0));
    assert_eq!(b.first_day(), day(5));
    assert_eq!(b.last_day(), day(8));
}

#[test]
fn test_bounds_swap() {
    assert_eq!(DatasetBounds::new(dt(8, 12), dt(5, 8)), bounds());
}

// ============================================
// Resolver
// ============================================

#[test]
fn test_pick_before_data_start_clamps_to_start() {
    let window = resolve(day(1), &bounds(), 0);
    assert_eq!(window.start_offset, 0);
    assert_eq!(window.end_offset, DAY_WINDOW_SECONDS);

    // The first day itself begins before the data does.
    let window = resolve(day(5), &bounds(), 0);
    assert_eq!(window.start_offset, 0);
}

#[test]
fn test_full_day_window() {
    let window = resolve(day(6), &bounds(), 0);
    assert_eq!(window.start_offset, 16 * HOUR);
    assert_eq!(window.duration_seconds(), 86_399);
}

#[test]
fn test_window_capped_at_data_end() {
    let window = resolve(day(8), &bounds(), 0);
    assert_eq!(window.start_offset, 64 * HOUR);
    assert_eq!(window.end_offset, 76 * HOUR);
}

#[test]
fn test_pick_after_data_end() {
    let window = resolve(day(20), &bounds(), 0);
    assert_eq!(window.start_offset, 76 * HOUR);
    assert_eq!(window.end_offset, 76 * HOUR);
}

#[test]
fn test_order_follows_direction() {
    let current_start = 30 * HOUR;
    assert_eq!(resolve(day(6), &bounds(), current_start).order, SliderOrder::StartFirst);
    assert_eq!(resolve(day(7), &bounds(), current_start).order, SliderOrder::EndFirst);
}

// ============================================
// Time Sliders
// ============================================

#[test]
fn test_time_slider_mutual_clamping() {
    let mut sliders = TimeSliders::new(100);
    sliders.set_end(50);
    sliders.set_start(70);
    assert_eq!(sliders.start(), 49);

    sliders.set_start(10);
    sliders.set_end(5);
    assert_eq!(sliders.end(), 11);
}

#[test]
fn test_time_slider_range_clamp() {
    let mut sliders = TimeSliders::new(100);
    sliders.set_end(500);
    assert_eq!(sliders.end(), 100);
    sliders.set_start(-5);
    assert_eq!(sliders.start(), 0);

    sliders.set_start(30);
    sliders.reset();
    assert_eq!((sliders.start(), sliders.end()), (0, 100));
}

#[test]
fn test_slider_times() {
    let b = bounds();
    let mut sliders = TimeSliders::new(b.total_seconds());
    sliders.set_start(HOUR);
    assert_eq!(sliders.start_time(b.start), dt(5, 9));
    assert_eq!(sliders.end_time(b.start), dt(8, 12));
}

#[test]
fn test_applying_resolved_window_lands_exactly() {
    let b = bounds();
    let mut sliders = TimeSliders::new(b.total_seconds());

    // Jump forward past the current end.
    sliders.set_start(10 * HOUR);
    sliders.set_end(12 * HOUR);
    let forward = resolve(day(7), &b, sliders.start());
    forward.apply(&mut sliders);
    assert_eq!(sliders.start(), forward.start_offset);
    assert_eq!(sliders.end(), forward.end_offset);

    // And back again.
    let back = resolve(day(5), &b, sliders.start());
    assert_eq!(back.order, SliderOrder::StartFirst);
    back.apply(&mut sliders);
    assert_eq!(sliders.start(), back.start_offset);
    assert_eq!(sliders.end(), back.end_offset);
}

#[test]
fn test_wrong_order_gets_clamped() {
    let b = bounds();
    let mut sliders = TimeSliders::new(b.total_seconds());
    sliders.set_start(10 * HOUR);
    sliders.set_end(12 * HOUR);

    let forward = resolve(day(7), &b, sliders.start());
    let wrong = DateWindow {
        order: SliderOrder::StartFirst,
        ..forward
    };
    wrong.apply(&mut sliders);
    assert_eq!(sliders.start(), 12 * HOUR - 1);
    assert_ne!(sliders.start(), forward.start_offset);
}
