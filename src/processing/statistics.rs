use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::data::datetime::{format_marker, seconds_between};
use crate::processing::filter::FilteredView;
use crate::state::sample_table::{Column, MeasurementKind, Phase, PhaseSet};

/// Watt-seconds in one kilowatt-hour.
pub const WATT_SECONDS_PER_KWH: f64 = 3_600_000.0;

/// Text shown in place of a number when the view is empty.
pub const NO_DATA: &str = "--";

/// Statistics of one column over a filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    pub column: Column,
    pub count: usize,
    pub mean: f64,
    pub max_value: f64,
    /// Timestamp of the first row reaching `max_value`.
    pub max_timestamp: NaiveDateTime,
    pub min_value: f64,
    /// Timestamp of the first row reaching `min_value`.
    pub min_timestamp: NaiveDateTime,
}

impl ColumnStatistics {
    /// Compute over the finite values of `column`. `None` when there are none.
    pub fn compute(view: &FilteredView<'_>, column: Column) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut max: Option<(f64, NaiveDateTime)> = None;
        let mut min: Option<(f64, NaiveDateTime)> = None;

        for sample in view.iter() {
            let Some(v) = sample.value(column) else { continue };
            if !v.is_finite() {
                continue;
            }
            count += 1;
            sum += v;
            // Strict comparisons keep the earliest row on ties.
            if max.map_or(true, |(m, _)| v > m) {
                max = Some((v, sample.timestamp));
            }
            if min.map_or(true, |(m, _)| v < m) {
                min = Some((v, sample.timestamp));
            }
        }

        let (max_value, max_timestamp) = max?;
        let (min_value, min_timestamp) = min?;
        Some(Self {
            column,
            count,
            mean: sum / count as f64,
            max_value,
            max_timestamp,
            min_value,
            min_timestamp,
        })
    }

    /// `Max: 231.45 (05/03 14:22:10)`
    pub fn max_label(&self) -> String {
        extremum_label("Max", self.max_value, self.max_timestamp)
    }

    /// `Min: 198.02 (05/03 03:10:00)`
    pub fn min_label(&self) -> String {
        extremum_label("Min", self.min_value, self.min_timestamp)
    }

    /// `Voltage Average: 230.12 V`, power with no decimals.
    pub fn average_label(&self) -> String {
        average_label(self.column.kind, Some(self.mean))
    }

    /// `Avg Phase 1: 230.12`, the annotation drawn next to the average line.
    pub fn average_annotation(&self) -> String {
        format!("Avg {}: {:.2}", self.column.phase, self.mean)
    }

    /// `Voltage Max: 231.45 V (05/03 14:22:10)`
    pub fn kind_max_label(&self) -> String {
        format!(
            "{} Max: {:.2} {} ({})",
            self.column.kind.label(),
            self.max_value,
            self.column.kind.unit(),
            format_marker(self.max_timestamp)
        )
    }

    /// `Power Min: 12.00 W (05/03 03:10:00)`
    pub fn kind_min_label(&self) -> String {
        format!(
            "{} Min: {:.2} {} ({})",
            self.column.kind.label(),
            self.min_value,
            self.column.kind.unit(),
            format_marker(self.min_timestamp)
        )
    }
}

pub fn statistics(view: &FilteredView<'_>, column: Column) -> Option<ColumnStatistics> {
    ColumnStatistics::compute(view, column)
}

fn extremum_label(name: &str, value: f64, ts: NaiveDateTime) -> String {
    format!("{name}: {value:.2} ({})", format_marker(ts))
}

/// `Max: --` style label for an empty view.
pub fn no_data_label(name: &str) -> String {
    format!("{name}: {NO_DATA}")
}

/// Average label for `kind`, or `--` when there is no data.
pub fn average_label(kind: MeasurementKind, mean: Option<f64>) -> String {
    match mean {
        Some(m) => format!(
            "{} Average: {:.*} {}",
            kind.label(),
            kind.average_decimals(),
            m,
            kind.unit()
        ),
        None => format!("{} Average: {NO_DATA}", kind.label()),
    }
}

/// `Energy: 12.34 kWh`
pub fn energy_label(kwh: f64) -> String {
    format!("Energy: {kwh:.2} kWh")
}

/// Trapezoidal integral of power (W) over time, in kWh.
///
/// Power is taken as linear between consecutive samples. Fewer than two
/// samples integrate to zero. Rows are used in the given order; out-of-order
/// timestamps contribute negative intervals rather than being reordered.
pub fn trapezoidal_energy_kwh(timestamps: &[NaiveDateTime], power: &[f64]) -> f64 {
    let n = timestamps.len().min(power.len());
    if n < 2 {
        return 0.0;
    }

    let watt_seconds: f64 = (0..n - 1)
        .map(|i| {
            let dt = seconds_between(timestamps[i], timestamps[i + 1]);
            (power[i] + power[i + 1]) / 2.0 * dt
        })
        .sum();
    watt_seconds / WATT_SECONDS_PER_KWH
}

/// Energy of one phase's power column over the view.
pub fn phase_energy_kwh(view: &FilteredView<'_>, phase: Phase) -> f64 {
    let power = view.column(Column::new(MeasurementKind::Power, phase));
    trapezoidal_energy_kwh(&view.timestamps(), &power)
}

/// How per-phase energies combine into a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyAggregation {
    /// Phases 1-3 are summed; a visible phase 4 is an aggregate meter and its
    /// energy replaces that sum.
    #[default]
    AggregateReplaces,
    /// Every visible phase is summed.
    SumAll,
}

/// Total energy over the visible phases the table carries, walked in phase order.
pub fn total_energy_kwh(
    view: &FilteredView<'_>,
    visible: &PhaseSet,
    aggregation: EnergyAggregation,
) -> f64 {
    let mut total = 0.0;
    for phase in visible.iter().filter(|p| view.table().has_phase(**p)) {
        let energy = phase_energy_kwh(view, *phase);
        if phase.is_aggregate() && aggregation == EnergyAggregation::AggregateReplaces {
            total = energy;
        } else {
            total += energy;
        }
    }
    total
}
