use phasescope::processing::filter::{filter, filter_time, value_filter_columns};
use phasescope::state::sample_table::{Column, MeasurementKind, Phase, SampleTable};
use phasescope::state::selection::Selection;

use crate::common::{at, phases, power_table};

fn sample_table() -> SampleTable {
    power_table(&[
        (0, [100.0, 110.0, 120.0]),
        (1, [200.0, 210.0, 220.0]),
        (2, [300.0, 310.0, 320.0]),
        (3, [400.0, 410.0, 420.0]),
        (4, [500.0, 90.0, 520.0]),
    ])
}

fn power_selection(start: i64, end: i64, min: f64, max: f64, visible: &[u8]) -> Selection {
    Selection::new(at(start), at(end), min, max, phases(visible), MeasurementKind::Power)
}

// ============================================
// Selection Tests
// ============================================

#[test]
fn test_selection_swaps_reversed_bounds() {
    let selection = power_selection(10, 2, 500.0, 100.0, &[1]);
    assert_eq!(selection.time_start(), at(2));
    assert_eq!(selection.time_end(), at(10));
    assert_eq!(selection.value_min(), 100.0);
    assert_eq!(selection.value_max(), 500.0);
}

#[test]
fn test_selection_setters_normalize() {
    let mut selection = power_selection(0, 10, 0.0, 1.0, &[1]);
    selection.set_time_start(at(20));
    assert_eq!(selection.time_start(), at(10));
    assert_eq!(selection.time_end(), at(20));

    selection.set_value_window(9.0, 3.0);
    assert_eq!((selection.value_min(), selection.value_max()), (3.0, 9.0));
}

#[test]
fn test_selection_full_range_defaults() {
    let table = sample_table();
    let selection = Selection::full_range(&table, MeasurementKind::Power).unwrap();
    assert_eq!(selection.time_start(), at(0));
    assert_eq!(selection.time_end(), at(4));
    assert_eq!(selection.value_min(), 90.0);
    assert_eq!(selection.value_max(), 520.0);
    assert_eq!(selection.visible_phases(), &phases(&[1, 2, 3]));
}

#[test]
fn test_selection_full_range_empty_table() {
    let table = SampleTable::default();
    assert!(Selection::full_range(&table, MeasurementKind::Voltage).is_none());
}

#[test]
fn test_selection_phase_toggle() {
    let mut selection = power_selection(0, 1, 0.0, 1.0, &[1, 2]);
    selection.set_phase_visible(Phase::Two, false);
    selection.set_phase_visible(Phase::Three, true);
    assert_eq!(selection.visible_phases(), &phases(&[1, 3]));
}

// ============================================
// Filter Tests
// ============================================

#[test]
fn test_time_window_is_inclusive() {
    let table = sample_table();
    let view = filter(&table, &power_selection(1, 3, 0.0, 1000.0, &[1, 2, 3]));
    assert_eq!(view.indices(), &[1, 2, 3]);
}

#[test]
fn test_value_predicate_is_a_conjunction() {
    let table = sample_table();
    // Row 4 has phase 1 at 500 (inside) but phase 2 at 90 (outside).
    let view = filter(&table, &power_selection(0, 4, 100.0, 520.0, &[1, 2, 3]));
    assert_eq!(view.indices(), &[0, 1, 2, 3]);

    // Hiding phase 2 lets row 4 back in.
    let view = filter(&table, &power_selection(0, 4, 100.0, 520.0, &[1, 3]));
    assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
}

#[test]
fn test_no_visible_phase_applies_time_only() {
    let table = sample_table();
    let view = filter(&table, &power_selection(0, 4, 1000.0, 2000.0, &[]));
    assert_eq!(view.len(), 5);
}

#[test]
fn test_missing_phase_is_ignored_by_value_predicate() {
    let table = sample_table();
    let selection = power_selection(0, 4, 0.0, 1000.0, &[1, 4]);
    let columns = value_filter_columns(&table, &selection);
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].name(), "powermoy1");
    assert_eq!(filter(&table, &selection).len(), 5);
}

#[test]
fn test_filter_properties() {
    let table = sample_table();
    let selection = power_selection(1, 4, 150.0, 450.0, &[1, 3]);
    let view = filter(&table, &selection);

    assert!(view.len() <= table.len());
    for sample in view.iter() {
        assert!(selection.contains_time(sample.timestamp));
        for column in value_filter_columns(&table, &selection) {
            assert!(selection.contains_value(sample.value(column).unwrap()));
        }
    }

    let again = filter(&table, &selection);
    assert_eq!(view.indices(), again.indices());
}

#[test]
fn test_filter_preserves_table_order() {
    let table = sample_table();
    let view = filter(&table, &power_selection(0, 4, 0.0, 1000.0, &[1]));
    assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
    let times = view.timestamps();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_empty_table_gives_empty_view() {
    let table = SampleTable::default();
    let view = filter(&table, &power_selection(0, 10, 0.0, 1.0, &[1, 2, 3]));
    assert!(view.is_empty());
}

#[test]
fn test_filter_time_swaps_bounds() {
    let table = sample_table();
    let view = filter_time(&table, at(3), at(1));
    assert_eq!(view.indices(), &[1, 2, 3]);
}

#[test]
fn test_view_column_missing_phase_is_nan() {
    let table = sample_table();
    let view = filter_time(&table, at(0), at(0));
    let values = view.column(Column::new(MeasurementKind::Power, Phase::Four));
    assert_eq!(values.len(), 1);
    assert!(values[0].is_nan());
}

#[test]
fn test_phase_and_column_names() {
    assert_eq!(Phase::Two.to_string(), "Phase 2");
    assert_eq!(format!("{}", Phase::Four), "Phase 4");
    assert_eq!(Column::new(MeasurementKind::Current, Phase::Three).to_string(), "currentmoy3");
}
