use chrono::NaiveDateTime;

use crate::data::datetime::{elapsed_dhms_label, elapsed_seconds_label, points_label};
use crate::processing::filter::{self, FilteredView};
use crate::processing::smoothing::SmoothingMode;
use crate::processing::statistics::{
    self, energy_label, no_data_label, phase_energy_kwh, total_energy_kwh, ColumnStatistics,
    EnergyAggregation,
};
use crate::state::sample_table::{Column, MeasurementKind, Phase, SampleTable};
use crate::state::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecomputeOptions {
    /// Trend line mode, `None` when the trend line is off.
    pub smoothing: Option<SmoothingMode>,
    pub energy: EnergyAggregation,
}

/// One visible phase of a comparison view.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTrace {
    pub phase: Phase,
    pub column: Column,
    pub values: Vec<f64>,
    pub smoothed: Option<Vec<f64>>,
    pub statistics: Option<ColumnStatistics>,
    /// Power views only.
    pub energy_kwh: Option<f64>,
}

/// Everything a renderer needs for one comparison view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub kind: MeasurementKind,
    pub time_start: NaiveDateTime,
    pub time_end: NaiveDateTime,
    pub timestamps: Vec<NaiveDateTime>,
    pub traces: Vec<PhaseTrace>,
    /// Power views only.
    pub total_energy_kwh: Option<f64>,
    pub smoothing: Option<SmoothingMode>,
}

impl ViewModel {
    pub fn point_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn elapsed_seconds(&self) -> i64 {
        (self.time_end - self.time_start).num_seconds()
    }

    pub fn points_label(&self) -> String {
        points_label(self.point_count())
    }

    pub fn elapsed_label(&self) -> String {
        elapsed_seconds_label(self.elapsed_seconds())
    }

    pub fn elapsed_dhms_label(&self) -> String {
        elapsed_dhms_label(self.elapsed_seconds())
    }

    /// Extremum labels of the last visible phase with data.
    pub fn max_label(&self) -> String {
        self.last_statistics()
            .map(|s| s.max_label())
            .unwrap_or_else(|| no_data_label("Max"))
    }

    pub fn min_label(&self) -> String {
        self.last_statistics()
            .map(|s| s.min_label())
            .unwrap_or_else(|| no_data_label("Min"))
    }

    pub fn energy_label(&self) -> Option<String> {
        self.total_energy_kwh.map(energy_label)
    }

    fn last_statistics(&self) -> Option<&ColumnStatistics> {
        self.traces.iter().rev().find_map(|t| t.statistics.as_ref())
    }
}

/// Filter the table with `selection` and derive statistics, energy and trend
/// lines for every visible phase the table carries.
pub fn recompute(
    table: &SampleTable,
    selection: &Selection,
    options: &RecomputeOptions,
) -> ViewModel {
    let view = filter::filter(table, selection);
    let kind = selection.kind();
    tracing::debug!(
        kind = %kind,
        rows = view.len(),
        of = table.len(),
        "recomputed filtered view"
    );

    let traces = selection
        .visible_phases()
        .iter()
        .filter(|p| table.has_phase(**p))
        .map(|p| build_trace(&view, kind, *p, options))
        .collect();

    let total_energy_kwh = (kind == MeasurementKind::Power)
        .then(|| total_energy_kwh(&view, selection.visible_phases(), options.energy));

    ViewModel {
        kind,
        time_start: selection.time_start(),
        time_end: selection.time_end(),
        timestamps: view.timestamps(),
        traces,
        total_energy_kwh,
        smoothing: options.smoothing,
    }
}

fn build_trace(
    view: &FilteredView<'_>,
    kind: MeasurementKind,
    phase: Phase,
    options: &RecomputeOptions,
) -> PhaseTrace {
    let column = Column::new(kind, phase);
    let values = view.column(column);
    let smoothed = options.smoothing.map(|mode| mode.apply(&values));
    let energy_kwh = (kind == MeasurementKind::Power).then(|| phase_energy_kwh(view, phase));

    PhaseTrace {
        phase,
        column,
        statistics: statistics::statistics(view, column),
        values,
        smoothed,
        energy_kwh,
    }
}
