use phasescope::processing::phase_report::phase_report;
use phasescope::state::sample_table::{MeasurementKind, Phase, SampleTable};

use crate::common::{assert_close, at, table};

fn report_table() -> SampleTable {
    table(&[
        (0, [(230.0, 4.0, 920.0), (231.0, 3.0, 693.0), (229.0, 2.0, 458.0)]),
        (60, [(232.5, 5.0, 1162.5), (230.0, 3.0, 690.0), (228.0, 2.0, 456.0)]),
        (120, [(227.5, 3.0, 682.5), (229.0, 3.0, 687.0), (230.0, 2.0, 460.0)]),
    ])
}

#[test]
fn test_report_over_full_window() {
    let table = report_table();
    let report = phase_report(&table, Phase::One, at(0), at(120));

    assert_eq!(report.point_count, 3);
    assert_eq!(report.elapsed_seconds(), 120);
    assert_close(report.voltage.as_ref().unwrap().mean, 230.0);
    assert_close(report.current.as_ref().unwrap().mean, 4.0);
    assert_eq!(report.power.as_ref().unwrap().max_timestamp, at(60));

    // (920 + 1162.5)/2 * 60 + (1162.5 + 682.5)/2 * 60 = 117825 Ws
    assert_close(report.energy_kwh, 117_825.0 / 3_600_000.0);
}

#[test]
fn test_report_labels() {
    let table = report_table();
    let report = phase_report(&table, Phase::One, at(0), at(120));

    assert_eq!(report.average_label(MeasurementKind::Voltage), "Voltage Average: 230.00 V");
    assert_eq!(report.average_label(MeasurementKind::Current), "Current Average: 4.00 A");
    assert_eq!(report.average_label(MeasurementKind::Power), "Power Average: 922 W");
    assert_eq!(
        report.max_label(MeasurementKind::Voltage),
        "Voltage Max: 232.50 V (05/03 00:01:00)"
    );
    assert_eq!(
        report.max_label(MeasurementKind::Current),
        "Current Max: 5.00 A (05/03 00:01:00)"
    );
    assert_eq!(report.power_min_label(), "Power Min: 682.50 W (05/03 00:02:00)");
    assert_eq!(report.points_label(), "Points: 3");
    assert_eq!(report.elapsed_label(), "Time Elapsed: 120s");
    assert_eq!(report.elapsed_dhms_label(), "Time Elapsed: 0d 0h 2m 0s");
}

#[test]
fn test_report_uses_time_window_only() {
    let table = report_table();
    let report = phase_report(&table, Phase::Two, at(60), at(120));
    assert_eq!(report.point_count, 2);
    assert_eq!(report.time_start, at(60));
    assert_close(report.voltage.as_ref().unwrap().mean, 229.5);
}

#[test]
fn test_report_swaps_reversed_window() {
    let table = report_table();
    let report = phase_report(&table, Phase::Three, at(120), at(0));
    assert_eq!(report.time_start, at(0));
    assert_eq!(report.time_end, at(120));
    assert_eq!(report.point_count, 3);
}

#[test]
fn test_report_for_missing_phase() {
    let table = report_table();
    let report = phase_report(&table, Phase::Four, at(0), at(120));
    assert!(report.voltage.is_none());
    assert!(report.power.is_none());
    assert_eq!(report.energy_kwh, 0.0);
    assert_eq!(report.max_label(MeasurementKind::Power), "Power Max: --");
    assert_eq!(report.power_min_label(), "Power Min: --");
    assert_eq!(report.average_label(MeasurementKind::Voltage), "Voltage Average: --");
}

#[test]
fn test_report_for_empty_window() {
    let table = report_table();
    let report = phase_report(&table, Phase::One, at(1000), at(2000));
    assert_eq!(report.point_count, 0);
    assert!(report.current.is_none());
    assert_eq!(report.energy_label(), "Energy: 0.00 kWh");
}
