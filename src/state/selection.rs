use chrono::NaiveDateTime;

use crate::state::sample_table::{MeasurementKind, Phase, PhaseSet, SampleTable};

/// The time window, value window and phase visibility driving every derived view.
///
/// Both bound pairs are kept ordered low <= high. Setters swap reversed bounds
/// instead of rejecting them, so downstream code never sees an inverted window.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    time_start: NaiveDateTime,
    time_end: NaiveDateTime,
    value_min: f64,
    value_max: f64,
    visible_phases: PhaseSet,
    kind: MeasurementKind,
}

impl Selection {
    pub fn new(
        time_start: NaiveDateTime,
        time_end: NaiveDateTime,
        value_min: f64,
        value_max: f64,
        visible_phases: PhaseSet,
        kind: MeasurementKind,
    ) -> Self {
        let mut selection = Self {
            time_start,
            time_end,
            value_min,
            value_max,
            visible_phases,
            kind,
        };
        selection.normalize();
        selection
    }

    /// Full-range defaults: the whole time span, the global value range of
    /// `kind` over every carried phase, and all carried phases visible.
    /// `None` for an empty table.
    pub fn full_range(table: &SampleTable, kind: MeasurementKind) -> Option<Self> {
        let (start, end) = table.time_bounds()?;
        let phases = table.phases();
        let domain = table.value_domain(kind, &phases)?;
        Some(Self::new(start, end, domain.from, domain.to, phases, kind))
    }

    fn normalize(&mut self) {
        if self.time_start > self.time_end {
            std::mem::swap(&mut self.time_start, &mut self.time_end);
        }
        if self.value_min > self.value_max {
            std::mem::swap(&mut self.value_min, &mut self.value_max);
        }
    }

    pub fn time_start(&self) -> NaiveDateTime {
        self.time_start
    }

    pub fn time_end(&self) -> NaiveDateTime {
        self.time_end
    }

    pub fn value_min(&self) -> f64 {
        self.value_min
    }

    pub fn value_max(&self) -> f64 {
        self.value_max
    }

    pub fn visible_phases(&self) -> &PhaseSet {
        &self.visible_phases
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn set_time_window(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        self.time_start = start;
        self.time_end = end;
        self.normalize();
    }

    pub fn set_time_start(&mut self, start: NaiveDateTime) {
        self.time_start = start;
        self.normalize();
    }

    pub fn set_time_end(&mut self, end: NaiveDateTime) {
        self.time_end = end;
        self.normalize();
    }

    pub fn set_value_window(&mut self, min: f64, max: f64) {
        self.value_min = min;
        self.value_max = max;
        self.normalize();
    }

    pub fn set_visible_phases(&mut self, phases: PhaseSet) {
        self.visible_phases = phases;
    }

    pub fn set_phase_visible(&mut self, phase: Phase, visible: bool) {
        if visible {
            self.visible_phases.insert(phase);
        } else {
            self.visible_phases.remove(&phase);
        }
    }

    pub fn is_phase_visible(&self, phase: Phase) -> bool {
        self.visible_phases.contains(&phase)
    }

    pub fn set_kind(&mut self, kind: MeasurementKind) {
        self.kind = kind;
    }

    pub fn contains_time(&self, t: NaiveDateTime) -> bool {
        self.time_start <= t && t <= self.time_end
    }

    pub fn contains_value(&self, v: f64) -> bool {
        self.value_min <= v && v <= self.value_max
    }
}
