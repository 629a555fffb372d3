use chrono::NaiveDateTime;

use crate::data::datetime::{elapsed_dhms_label, elapsed_seconds_label, points_label};
use crate::processing::filter::{self, FilteredView};
use crate::processing::statistics::{
    average_label, energy_label, phase_energy_kwh, statistics, ColumnStatistics, NO_DATA,
};
use crate::state::sample_table::{Column, MeasurementKind, Phase, SampleTable};

/// Summary of one phase over a time window, with no value filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub time_start: NaiveDateTime,
    pub time_end: NaiveDateTime,
    pub point_count: usize,
    pub voltage: Option<ColumnStatistics>,
    pub current: Option<ColumnStatistics>,
    pub power: Option<ColumnStatistics>,
    pub energy_kwh: f64,
}

impl PhaseReport {
    pub fn statistics(&self, kind: MeasurementKind) -> Option<&ColumnStatistics> {
        match kind {
            MeasurementKind::Voltage => self.voltage.as_ref(),
            MeasurementKind::Current => self.current.as_ref(),
            MeasurementKind::Power => self.power.as_ref(),
        }
    }

    pub fn elapsed_seconds(&self) -> i64 {
        (self.time_end - self.time_start).num_seconds()
    }

    pub fn average_label(&self, kind: MeasurementKind) -> String {
        average_label(kind, self.statistics(kind).map(|s| s.mean))
    }

    pub fn max_label(&self, kind: MeasurementKind) -> String {
        self.statistics(kind)
            .map(|s| s.kind_max_label())
            .unwrap_or_else(|| format!("{} Max: {NO_DATA}", kind.label()))
    }

    /// Only power minima are reported.
    pub fn power_min_label(&self) -> String {
        self.power
            .as_ref()
            .map(|s| s.kind_min_label())
            .unwrap_or_else(|| format!("Power Min: {NO_DATA}"))
    }

    pub fn energy_label(&self) -> String {
        energy_label(self.energy_kwh)
    }

    pub fn points_label(&self) -> String {
        points_label(self.point_count)
    }

    pub fn elapsed_label(&self) -> String {
        elapsed_seconds_label(self.elapsed_seconds())
    }

    pub fn elapsed_dhms_label(&self) -> String {
        elapsed_dhms_label(self.elapsed_seconds())
    }
}

pub fn phase_report(
    table: &SampleTable,
    phase: Phase,
    time_start: NaiveDateTime,
    time_end: NaiveDateTime,
) -> PhaseReport {
    let view = filter::filter_time(table, time_start, time_end);
    let (time_start, time_end) = if time_start <= time_end {
        (time_start, time_end)
    } else {
        (time_end, time_start)
    };

    let stats = |view: &FilteredView<'_>, kind| {
        if table.has_phase(phase) {
            statistics(view, Column::new(kind, phase))
        } else {
            None
        }
    };

    PhaseReport {
        phase,
        time_start,
        time_end,
        point_count: view.len(),
        voltage: stats(&view, MeasurementKind::Voltage),
        current: stats(&view, MeasurementKind::Current),
        power: stats(&view, MeasurementKind::Power),
        energy_kwh: if table.has_phase(phase) {
            phase_energy_kwh(&view, phase)
        } else {
            0.0
        },
    }
}
